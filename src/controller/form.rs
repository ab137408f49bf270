//! The form: sections, one model, change dispatch and error aggregation.

use crate::config::FormConfig;
use crate::controller::field::FieldController;
use crate::controller::section::{find_element, SectionController};
use crate::controller::tasks::{TaskInbox, TaskOutcome, TaskReporter};
use crate::controller::view::{ViewFactory, ViewIdAllocator};
use crate::model::{ChangeEvent, FormModel, Subscription};
use crate::validation::{PerFieldValidationErrorDisplay, ValidationError, ValidationErrorDisplay};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Owns the ordered sections of a form, its [`FormModel`] and the strategy
/// used to display validation errors.
///
/// The form listens to its model: when a field is written, the field with
/// that name refreshes its display state. Exactly one such listener is
/// active per form at any time.
pub struct FormController {
    model: FormModel,
    sections: Rc<RefCell<Vec<SectionController>>>,
    display: Box<dyn ValidationErrorDisplay>,
    config: FormConfig,
    view_ids: Arc<ViewIdAllocator>,
    subscription: Option<Subscription>,
    tasks: TaskInbox,
}

impl FormController {
    pub fn new(model: FormModel) -> Self {
        let mut form = Self {
            model,
            sections: Rc::new(RefCell::new(Vec::new())),
            display: Box::new(PerFieldValidationErrorDisplay::default()),
            config: FormConfig::default(),
            view_ids: ViewIdAllocator::global(),
            subscription: None,
            tasks: TaskInbox::new(),
        };
        form.register_model_listener();
        form
    }

    /// Replace the configuration and rebind every field to it.
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        for section in self.sections.borrow().iter() {
            section.bind(&self.model, config);
        }
        self
    }

    /// Use `view_ids` instead of the process-wide allocator.
    pub fn with_view_ids(mut self, view_ids: Arc<ViewIdAllocator>) -> Self {
        self.view_ids = view_ids;
        self
    }

    pub fn model(&self) -> &FormModel {
        &self.model
    }

    pub fn config(&self) -> FormConfig {
        self.config
    }

    pub fn sections(&self) -> Ref<'_, Vec<SectionController>> {
        self.sections.borrow()
    }

    pub fn get_section(&self, name: &str) -> Option<Ref<'_, SectionController>> {
        Ref::filter_map(self.sections.borrow(), |sections| {
            sections.iter().find(|section| section.name() == name)
        })
        .ok()
    }

    /// Append a section; its fields are bound to this form's model.
    pub fn add_section(&mut self, section: SectionController) {
        let position = self.sections.borrow().len();
        self.add_section_at(section, position);
    }

    /// Insert a section at `position`, clamped to the end of the list.
    pub fn add_section_at(&mut self, section: SectionController, position: usize) {
        section.bind(&self.model, self.config);
        let mut sections = self.sections.borrow_mut();
        if position > sections.len() {
            tracing::warn!(
                section = %section.name(),
                position,
                len = sections.len(),
                "section position out of range, appending"
            );
        }
        let position = position.min(sections.len());
        sections.insert(position, section);
    }

    /// Append a field to the named section.
    ///
    /// Returns `None` (and drops the field) when there is no such section.
    pub fn add_element(&mut self, section_name: &str, field: FieldController) -> Option<Rc<FieldController>> {
        let mut sections = self.sections.borrow_mut();
        let Some(section) = sections.iter_mut().find(|s| s.name() == section_name) else {
            tracing::warn!(section = %section_name, field = %field.name(), "no such section");
            return None;
        };
        field.bind(&self.model, self.config);
        Some(section.add_element(field))
    }

    /// First field named `name`, scanning sections then fields in declared order.
    pub fn get_element(&self, name: &str) -> Option<Rc<FieldController>> {
        find_element(&self.sections.borrow(), name).cloned()
    }

    /// Total number of fields, not counting sections.
    pub fn number_of_elements(&self) -> usize {
        self.sections.borrow().iter().map(SectionController::len).sum()
    }

    /// Refresh every field from the current model values.
    pub fn refresh_elements(&self) {
        for section in self.sections.borrow().iter() {
            section.refresh();
        }
    }

    /// Validate every field.
    ///
    /// Errors come back in section order, then field order, then rule order.
    pub fn validate_input(&self) -> Vec<ValidationError> {
        tracing::debug!("running form validation");
        let sections = self.sections.borrow();
        let errors: Vec<ValidationError> = sections
            .iter()
            .flat_map(|section| section.elements())
            .filter_map(|field| field.as_validatable())
            .flat_map(|field| field.validate_input())
            .collect();
        tracing::debug!(errors = errors.len(), "form validation finished");
        errors
    }

    pub fn is_valid_input(&self) -> bool {
        self.validate_input().is_empty()
    }

    /// Validate and hand every error to the display strategy.
    pub fn show_validation_errors(&mut self) {
        let errors = self.validate_input();
        let sections = self.sections.borrow();
        self.display.show_errors(&sections, &errors);
    }

    /// Clear every displayed error through the display strategy.
    pub fn reset_validation_errors(&mut self) {
        let sections = self.sections.borrow();
        self.display.reset_errors(&sections);
    }

    /// Swap the display strategy; the latest one wins.
    pub fn set_validation_errors_display_method(
        &mut self,
        display: impl ValidationErrorDisplay + 'static,
    ) {
        self.display = Box::new(display);
    }

    /// Re-validate one field and display only its errors.
    ///
    /// The field's previous error is cleared first. Returns the new errors;
    /// an unknown name is a lookup miss and yields none.
    pub fn revalidate_field(&mut self, name: &str) -> Vec<ValidationError> {
        let sections = self.sections.borrow();
        let Some(field) = find_element(&sections, name) else {
            tracing::warn!(field = %name, "cannot revalidate field not on this form");
            return Vec::new();
        };
        field.set_error(None);
        let errors = field
            .as_validatable()
            .map(|field| field.validate_input())
            .unwrap_or_default();
        self.display.show_errors(&sections, &errors);
        errors
    }

    /// Build a view for every section and field, in display order.
    ///
    /// Each controller keeps its view id across rebuilds. The model listener
    /// is re-registered once at the end, replacing the previous one.
    pub fn recreate_views<V: ViewFactory>(&mut self, factory: &mut V) -> Vec<V::Handle> {
        let mut handles = Vec::new();
        {
            let sections = self.sections.borrow();
            for section in sections.iter() {
                section.bind(&self.model, self.config);
                let id = section.view_id().unwrap_or_else(|| {
                    let id = self.view_ids.next_id();
                    section.set_view_id(id);
                    id
                });
                handles.push(factory.create_section_view(section, id));

                for field in section.elements() {
                    let id = field.view_id().unwrap_or_else(|| {
                        let id = self.view_ids.next_id();
                        field.set_view_id(id);
                        id
                    });
                    field.refresh();
                    handles.push(factory.create_field_view(field, id));
                }
            }
        }
        self.register_model_listener();
        handles
    }

    /// (Re)register this form's change listener on the model.
    ///
    /// The previous subscription is revoked before the new one is made, so
    /// the form never holds more than one listener.
    pub fn register_model_listener(&mut self) {
        drop(self.subscription.take());
        let sections = Rc::downgrade(&self.sections);
        self.subscription = Some(
            self.model
                .subscribe(move |event| dispatch_change(&sections, event)),
        );
        tracing::debug!(listeners = self.model.listener_count(), "model listener registered");
    }

    /// Sender for collaborator tasks working on this form's fields.
    pub fn task_reporter(&self) -> TaskReporter {
        self.tasks.reporter()
    }

    /// Apply every collaborator outcome reported so far.
    ///
    /// A completed task refreshes its field. A failed task clears the
    /// field's value and re-validates the field. Returns how many outcomes
    /// were processed.
    pub fn process_task_outcomes(&mut self) -> usize {
        let outcomes = self.tasks.drain();
        for outcome in &outcomes {
            let Some(field) = self.get_element(outcome.field()) else {
                tracing::warn!(field = %outcome.field(), "task outcome for field not on this form");
                continue;
            };
            match outcome {
                TaskOutcome::Completed { .. } => field.refresh(),
                TaskOutcome::Failed { field: name, reason } => {
                    tracing::warn!(field = %name, reason = %reason, "collaborator task failed, clearing value");
                    field.set_value(None);
                    self.revalidate_field(name);
                }
            }
        }
        outcomes.len()
    }
}

fn dispatch_change(sections: &Weak<RefCell<Vec<SectionController>>>, event: &ChangeEvent) {
    let Some(sections) = sections.upgrade() else {
        return;
    };
    let field = find_element(&sections.borrow(), &event.name).cloned();
    match field {
        Some(field) => field.model_changed(),
        None => tracing::warn!(field = %event.name, "model changed a field not on this form"),
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("sections", &self.sections.borrow().len())
            .field("elements", &self.number_of_elements())
            .field("config", &self.config)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
