//! Change notifications emitted after each committed mutation.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::Account;

/// A committed ledger change. `timestamp` is the time the change was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum TaskEvent {
    TaskAdded {
        user: Account,
        task_id: u64,
        description: String,
        timestamp: i64,
    },
    TaskEdited {
        user: Account,
        task_id: u64,
        new_description: String,
        timestamp: i64,
    },
    TaskStatusToggled {
        user: Account,
        task_id: u64,
        completed: bool,
        timestamp: i64,
    },
    TaskDeleted {
        user: Account,
        task_id: u64,
        timestamp: i64,
    },
}

impl TaskEvent {
    pub fn user(&self) -> &Account {
        match self {
            TaskEvent::TaskAdded { user, .. }
            | TaskEvent::TaskEdited { user, .. }
            | TaskEvent::TaskStatusToggled { user, .. }
            | TaskEvent::TaskDeleted { user, .. } => user,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaskEvent::TaskAdded { .. } => "TaskAdded",
            TaskEvent::TaskEdited { .. } => "TaskEdited",
            TaskEvent::TaskStatusToggled { .. } => "TaskStatusToggled",
            TaskEvent::TaskDeleted { .. } => "TaskDeleted",
        }
    }

    /// Route this event to the matching observer method.
    pub fn dispatch(&self, observer: &dyn TaskObserver) {
        match self {
            TaskEvent::TaskAdded {
                user,
                task_id,
                description,
                timestamp,
            } => observer.task_added(user, *task_id, description, *timestamp),
            TaskEvent::TaskEdited {
                user,
                task_id,
                new_description,
                timestamp,
            } => observer.task_edited(user, *task_id, new_description, *timestamp),
            TaskEvent::TaskStatusToggled {
                user,
                task_id,
                completed,
                timestamp,
            } => observer.task_status_toggled(user, *task_id, *completed, *timestamp),
            TaskEvent::TaskDeleted {
                user,
                task_id,
                timestamp,
            } => observer.task_deleted(user, *task_id, *timestamp),
        }
    }
}

/// Notification sink, one method per event.
///
/// Every method defaults to building the matching [`TaskEvent`] and handing it
/// to [`TaskObserver::on_event`], so sinks that treat events uniformly only
/// implement that one. Observers run synchronously on the mutating thread
/// after the change is committed, one event at a time in apply order. They
/// must not block or call back into the ledger.
pub trait TaskObserver: Send + Sync {
    fn on_event(&self, _event: &TaskEvent) {}

    fn task_added(&self, user: &Account, task_id: u64, description: &str, timestamp: i64) {
        self.on_event(&TaskEvent::TaskAdded {
            user: user.clone(),
            task_id,
            description: description.to_string(),
            timestamp,
        });
    }

    fn task_edited(&self, user: &Account, task_id: u64, new_description: &str, timestamp: i64) {
        self.on_event(&TaskEvent::TaskEdited {
            user: user.clone(),
            task_id,
            new_description: new_description.to_string(),
            timestamp,
        });
    }

    fn task_status_toggled(&self, user: &Account, task_id: u64, completed: bool, timestamp: i64) {
        self.on_event(&TaskEvent::TaskStatusToggled {
            user: user.clone(),
            task_id,
            completed,
            timestamp,
        });
    }

    fn task_deleted(&self, user: &Account, task_id: u64, timestamp: i64) {
        self.on_event(&TaskEvent::TaskDeleted {
            user: user.clone(),
            task_id,
            timestamp,
        });
    }
}

/// Default capacity of the in-memory event log
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1024;

/// Bounded in-memory record of emitted events, oldest dropped first.
#[derive(Debug)]
pub struct EventLog {
    capacity: usize,
    events: Mutex<VecDeque<TaskEvent>>,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(VecDeque::new()),
        }
    }

    /// All retained events, oldest first
    pub fn events(&self) -> Vec<TaskEvent> {
        self.lock().iter().cloned().collect()
    }

    /// Retained events emitted on behalf of `user`, oldest first
    pub fn events_for(&self, user: &Account) -> Vec<TaskEvent> {
        self.lock()
            .iter()
            .filter(|e| e.user() == user)
            .cloned()
            .collect()
    }

    // Pushes and reads never leave the deque half-updated, so a poisoned
    // guard is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<TaskEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_LOG_CAPACITY)
    }
}

impl TaskObserver for EventLog {
    fn on_event(&self, event: &TaskEvent) {
        let mut events = self.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TaskObserver for TracingObserver {
    fn task_added(&self, user: &Account, task_id: u64, description: &str, timestamp: i64) {
        tracing::info!(%user, task_id, description, timestamp, "TaskAdded");
    }

    fn task_edited(&self, user: &Account, task_id: u64, new_description: &str, timestamp: i64) {
        tracing::info!(%user, task_id, new_description, timestamp, "TaskEdited");
    }

    fn task_status_toggled(&self, user: &Account, task_id: u64, completed: bool, timestamp: i64) {
        tracing::info!(%user, task_id, completed, timestamp, "TaskStatusToggled");
    }

    fn task_deleted(&self, user: &Account, task_id: u64, timestamp: i64) {
        tracing::info!(%user, task_id, timestamp, "TaskDeleted");
    }
}
