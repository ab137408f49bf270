//! The read/write/notify facade over a backing object.

use crate::model::backend::ModelBackend;
use crate::model::value::{FieldType, FieldValue};
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Notification that one named field was written.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeEvent {
    pub name: String,
    pub old_value: Option<FieldValue>,
    pub new_value: Option<FieldValue>,
}

type Listener = Rc<dyn Fn(&ChangeEvent)>;

struct ModelInner {
    backend: RefCell<Box<dyn ModelBackend>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_subscription: Cell<u64>,
}

/// Shared handle to a backing model.
///
/// Cloning the handle shares the same backing object and listener list.
/// A `FormModel` lives on one thread: all reads, writes and notifications
/// happen on the thread that owns the form.
///
/// Change dispatch is synchronous. A listener must not write the field it is
/// being notified about, since nothing guards against that recursion.
#[derive(Clone)]
pub struct FormModel {
    inner: Rc<ModelInner>,
}

impl FormModel {
    pub fn new(backend: impl ModelBackend) -> Self {
        Self {
            inner: Rc::new(ModelInner {
                backend: RefCell::new(Box::new(backend)),
                listeners: RefCell::new(Vec::new()),
                next_subscription: Cell::new(1),
            }),
        }
    }

    /// Current value of `name`, or `None` when it is null or cannot be read.
    pub fn get_value(&self, name: &str) -> Option<FieldValue> {
        match self.inner.backend.borrow().get(name) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(field = %name, error = %error, "model read failed");
                None
            }
        }
    }

    /// Write `value` to `name` and notify every listener once.
    ///
    /// A failed write is logged and leaves the model unchanged; no
    /// notification is sent for it.
    pub fn set_value(&self, name: &str, value: Option<FieldValue>) {
        let old_value = self.get_value(name);
        let written = self.inner.backend.borrow_mut().set(name, value.clone());
        if let Err(error) = written {
            tracing::warn!(field = %name, error = %error, "model write failed");
            return;
        }
        self.notify(&ChangeEvent {
            name: name.to_string(),
            old_value,
            new_value: value,
        });
    }

    /// Type of the backing field, or `None` when it cannot be determined.
    pub fn backing_type(&self, name: &str) -> Option<FieldType> {
        match self.inner.backend.borrow().type_of(name) {
            Ok(field_type) => Some(field_type),
            Err(error) => {
                tracing::warn!(field = %name, error = %error, "model type lookup failed");
                None
            }
        }
    }

    /// Borrow the backing object as `T`.
    ///
    /// For [`SerdeBackend<T>`](crate::model::SerdeBackend) this is the bound
    /// struct; for [`MapBackend`](crate::model::MapBackend) it is the map itself.
    pub fn backing<T: 'static>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.inner.backend.borrow(), |backend| {
            backend.as_any().downcast_ref::<T>()
        })
        .ok()
    }

    /// Register a change listener. It stays active until the returned
    /// [`Subscription`] is dropped or revoked.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + 'static,
    {
        let id = self.inner.next_subscription.get();
        self.inner.next_subscription.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            id,
            model: Rc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Whether both handles point at the same backing model.
    pub fn ptr_eq(&self, other: &FormModel) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self, event: &ChangeEvent) {
        // Snapshot so listeners may subscribe or unsubscribe while being notified.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for FormModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormModel")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

/// Handle for one registered change listener.
///
/// Dropping the handle unsubscribes the listener.
#[must_use = "dropping a Subscription unsubscribes its listener immediately"]
pub struct Subscription {
    id: u64,
    model: Weak<ModelInner>,
}

impl Subscription {
    /// Revoke the listener now.
    pub fn unsubscribe(self) {}

    /// False once the model itself is gone.
    pub fn is_active(&self) -> bool {
        self.model
            .upgrade()
            .is_some_and(|inner| inner.listeners.borrow().iter().any(|(id, _)| *id == self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.model.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::backend::MapBackend;

    fn model() -> FormModel {
        FormModel::new(
            MapBackend::new()
                .with_field("name", FieldType::Text)
                .with_value("age", 30i64),
        )
    }

    fn recording(model: &FormModel) -> (Rc<RefCell<Vec<ChangeEvent>>>, Subscription) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let subscription = model.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (events, subscription)
    }

    #[test]
    fn unknown_field_reads_as_none() {
        let model = model();
        assert_eq!(model.get_value("nope"), None);
        assert_eq!(model.backing_type("nope"), None);
    }

    #[test]
    fn set_then_get_round_trips_and_notifies_once() {
        let model = model();
        let (events, _subscription) = recording(&model);

        model.set_value("name", Some("Ada".into()));

        assert_eq!(model.get_value("name"), Some(FieldValue::from("Ada")));
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "name");
        assert_eq!(events[0].old_value, None);
        assert_eq!(events[0].new_value, Some(FieldValue::from("Ada")));
    }

    #[test]
    fn failed_write_does_not_notify() {
        let model = model();
        let (events, _subscription) = recording(&model);

        model.set_value("age", Some("old".into()));
        model.set_value("missing", Some("x".into()));

        assert!(events.borrow().is_empty());
        assert_eq!(model.get_value("age"), Some(FieldValue::Integer(30)));
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let model = model();
        let (events, subscription) = recording(&model);
        assert_eq!(model.listener_count(), 1);
        assert!(subscription.is_active());

        subscription.unsubscribe();
        model.set_value("name", Some("Ada".into()));

        assert_eq!(model.listener_count(), 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn listener_may_unsubscribe_during_dispatch() {
        let model = model();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let inner_slot = Rc::clone(&slot);
        let subscription = model.subscribe(move |_| {
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(subscription);

        model.set_value("name", Some("Ada".into()));

        assert_eq!(model.listener_count(), 0);
    }

    #[test]
    fn clones_share_backing_and_listeners() {
        let model = model();
        let other = model.clone();
        let (events, _subscription) = recording(&model);

        other.set_value("name", Some("Grace".into()));

        assert!(model.ptr_eq(&other));
        assert_eq!(model.get_value("name"), Some(FieldValue::from("Grace")));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn backing_downcasts_to_backend_object() {
        let model = model();
        let map = model.backing::<MapBackend>();
        assert!(map.is_some());
        assert!(model.backing::<String>().is_none());
    }
}
