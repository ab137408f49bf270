//! Hooks for the view-rendering collaborator and view identifiers.

use crate::controller::field::FieldController;
use crate::controller::section::SectionController;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Identifier for a rendered view, in `1..=ViewId::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewId(u32);

impl ViewId {
    /// Largest id handed out. Ids with the high byte set are reserved for
    /// statically assigned resources.
    pub const MAX: u32 = 0x00FF_FFFF;

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#08x}", self.0)
    }
}

static GLOBAL_VIEW_IDS: Lazy<Arc<ViewIdAllocator>> = Lazy::new(|| Arc::new(ViewIdAllocator::new()));

/// Monotonic view-id counter that wraps from [`ViewId::MAX`] back to 1.
///
/// Safe to share between threads. Forms use the process-wide
/// [`ViewIdAllocator::global`] instance unless one is injected.
#[derive(Debug)]
pub struct ViewIdAllocator {
    next: AtomicU32,
}

impl ViewIdAllocator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// Start counting at `seed`, clamped into `1..=ViewId::MAX`.
    pub fn starting_at(seed: u32) -> Self {
        Self {
            next: AtomicU32::new(seed.clamp(1, ViewId::MAX)),
        }
    }

    pub fn global() -> Arc<ViewIdAllocator> {
        Arc::clone(&GLOBAL_VIEW_IDS)
    }

    pub fn next_id(&self) -> ViewId {
        let mut current = self.next.load(Ordering::Relaxed);
        loop {
            let following = if current >= ViewId::MAX { 1 } else { current + 1 };
            match self.next.compare_exchange_weak(
                current,
                following,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return ViewId(current),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for ViewIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns controllers into renderable handles.
///
/// The form calls this during [`FormController::recreate_views`](crate::controller::FormController::recreate_views),
/// sections first, each followed by its fields.
pub trait ViewFactory {
    type Handle;

    fn create_section_view(&mut self, section: &SectionController, id: ViewId) -> Self::Handle;

    fn create_field_view(&mut self, field: &FieldController, id: ViewId) -> Self::Handle;
}
