//! Completion reports from long-running collaborator work.
//!
//! Work such as decoding an attached image runs off the form's thread. It
//! must not touch field state directly; instead it reports back through a
//! [`TaskReporter`], and the form applies the outcome on its own thread in
//! [`FormController::process_task_outcomes`](crate::controller::FormController::process_task_outcomes).

use std::sync::mpsc::{self, Receiver, Sender};

/// How a collaborator task for one field ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The resource behind the field's value is ready.
    Completed { field: String },

    /// The resource could not be loaded; the field's value is unusable.
    Failed { field: String, reason: String },
}

impl TaskOutcome {
    pub fn field(&self) -> &str {
        match self {
            Self::Completed { field } | Self::Failed { field, .. } => field,
        }
    }
}

/// Sending half handed to collaborator tasks. Cheap to clone, `Send`.
#[derive(Clone, Debug)]
pub struct TaskReporter {
    tx: Sender<TaskOutcome>,
}

impl TaskReporter {
    pub fn completed(&self, field: impl Into<String>) {
        self.send(TaskOutcome::Completed {
            field: field.into(),
        });
    }

    pub fn failed(&self, field: impl Into<String>, reason: impl Into<String>) {
        self.send(TaskOutcome::Failed {
            field: field.into(),
            reason: reason.into(),
        });
    }

    pub fn send(&self, outcome: TaskOutcome) {
        if self.tx.send(outcome).is_err() {
            tracing::debug!("form is gone, dropping task outcome");
        }
    }
}

/// Receiving half owned by the form.
#[derive(Debug)]
pub(crate) struct TaskInbox {
    tx: Sender<TaskOutcome>,
    rx: Receiver<TaskOutcome>,
}

impl TaskInbox {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub(crate) fn reporter(&self) -> TaskReporter {
        TaskReporter {
            tx: self.tx.clone(),
        }
    }

    /// Everything reported so far, in arrival order.
    pub(crate) fn drain(&self) -> Vec<TaskOutcome> {
        self.rx.try_iter().collect()
    }
}
