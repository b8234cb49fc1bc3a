//! Per-account task ledger
//!
//! Every account owns an append-only sequence of tasks where `tasks[i].id == i`.
//! Tasks are never removed: deletion only sets the `deleted` flag, after which
//! the task is frozen but still readable.
//!
//! All state lives behind one `RwLock`, so mutations apply in a single global
//! order and reads always see a fully applied state. Reads hand out owned
//! copies. Observers are called after the write lock has been released, in
//! the order the mutations were applied, and must not call back into the ledger.

pub mod clock;
pub mod events;
pub mod webhook;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TodoError};

use clock::{Clock, SystemClock};
use events::{TaskEvent, TaskObserver};

/// Maximum description length, in characters
pub const MAX_DESCRIPTION_LEN: usize = 500;

const TASK_NOT_FOUND: &str = "Task does not exist";
const TASK_DELETED: &str = "Task is deleted";

/// Opaque account identity. The ledger compares it by value and never
/// inspects its format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Account(String);

impl Account {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Index within the owning account's sequence
    pub id: u64,
    pub description: String,
    pub completed: bool,
    /// Soft-delete flag, never reset once set
    pub deleted: bool,
    /// Creation time (seconds since epoch)
    pub timestamp: i64,
}

/// Counters for one account, read under a single lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: u64,
    pub active: u64,
    pub completed: u64,
}

impl TaskStats {
    pub fn deleted(&self) -> u64 {
        self.total - self.active
    }
}

/// Point-in-time copy of every account's tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub accounts: BTreeMap<Account, Vec<Task>>,
}

/// Check a description against the add/edit rules.
pub fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(TodoError::invalid_input("Description cannot be empty"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(TodoError::invalid_input("Description too long"));
    }
    Ok(())
}

fn task_index(tasks: &[Task], task_id: u64) -> Result<usize> {
    usize::try_from(task_id)
        .ok()
        .filter(|&i| i < tasks.len())
        .ok_or_else(|| TodoError::not_found(TASK_NOT_FOUND))
}

/// The task ledger
pub struct TaskLedger {
    accounts: RwLock<HashMap<Account, Vec<Task>>>,
    clock: Arc<dyn Clock>,
    observers: Vec<Arc<dyn TaskObserver>>,
    // Taken before the write lock is released; serialises notification in
    // apply order.
    dispatch: Mutex<()>,
}

type AccountsGuard<'a> = RwLockWriteGuard<'a, HashMap<Account, Vec<Task>>>;

impl Default for TaskLedger {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl TaskLedger {
    /// Create an empty ledger
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            clock,
            observers: Vec::new(),
            dispatch: Mutex::new(()),
        }
    }

    /// Rebuild a ledger from a snapshot, checking the id invariant.
    /// Fails with `Storage` when ids don't match positions.
    pub fn from_snapshot(snapshot: LedgerSnapshot, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut accounts = HashMap::with_capacity(snapshot.accounts.len());
        for (account, tasks) in snapshot.accounts {
            for (i, task) in tasks.iter().enumerate() {
                if task.id != i as u64 {
                    return Err(TodoError::storage(format!(
                        "Snapshot for {} has task id {} at index {}",
                        account, task.id, i
                    )));
                }
            }
            if !tasks.is_empty() {
                accounts.insert(account, tasks);
            }
        }
        Ok(Self {
            accounts: RwLock::new(accounts),
            clock,
            observers: Vec::new(),
            dispatch: Mutex::new(()),
        })
    }

    /// Register a notification sink
    pub fn with_observer(mut self, observer: Arc<dyn TaskObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    // Mutations validate before writing, so a poisoned guard never holds a
    // partially applied change.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Account, Vec<Task>>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> AccountsGuard<'_> {
        self.accounts.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Release the write lock and notify observers of the committed change.
    ///
    /// The dispatch lock is acquired while `accounts` is still held, so the
    /// next writer cannot start notifying until this event has been
    /// delivered. Readers are unblocked before observers run.
    fn publish(&self, accounts: AccountsGuard<'_>, event: TaskEvent) {
        let _dispatch = self.dispatch.lock().unwrap_or_else(PoisonError::into_inner);
        drop(accounts);
        for observer in &self.observers {
            event.dispatch(observer.as_ref());
        }
    }

    /// Look up a live (not deleted) task for mutation.
    fn live_task<'a>(
        accounts: &'a mut HashMap<Account, Vec<Task>>,
        acct: &Account,
        task_id: u64,
    ) -> Result<&'a mut Task> {
        let tasks = accounts
            .get_mut(acct)
            .ok_or_else(|| TodoError::not_found(TASK_NOT_FOUND))?;
        let index = task_index(tasks, task_id)?;
        let task = &mut tasks[index];
        if task.deleted {
            return Err(TodoError::invalid_state(TASK_DELETED));
        }
        Ok(task)
    }

    /// Append a new task for `acct`, returning its id.
    pub fn add_task(&self, acct: &Account, description: &str) -> Result<u64> {
        validate_description(description)?;

        let mut accounts = self.write();
        let now = self.clock.now();
        let tasks = accounts.entry(acct.clone()).or_default();
        let id = tasks.len() as u64;
        tasks.push(Task {
            id,
            description: description.to_string(),
            completed: false,
            deleted: false,
            timestamp: now,
        });

        let event = TaskEvent::TaskAdded {
            user: acct.clone(),
            task_id: id,
            description: description.to_string(),
            timestamp: now,
        };
        self.publish(accounts, event);
        Ok(id)
    }

    /// Replace the description of a live task.
    pub fn edit_task(&self, acct: &Account, task_id: u64, new_description: &str) -> Result<()> {
        let mut accounts = self.write();
        let task = Self::live_task(&mut accounts, acct, task_id)?;
        validate_description(new_description)?;
        task.description = new_description.to_string();

        let event = TaskEvent::TaskEdited {
            user: acct.clone(),
            task_id,
            new_description: new_description.to_string(),
            timestamp: self.clock.now(),
        };
        self.publish(accounts, event);
        Ok(())
    }

    /// Flip `completed` on a live task, returning the new value.
    pub fn toggle_task_status(&self, acct: &Account, task_id: u64) -> Result<bool> {
        let mut accounts = self.write();
        let task = Self::live_task(&mut accounts, acct, task_id)?;
        task.completed = !task.completed;
        let completed = task.completed;

        let event = TaskEvent::TaskStatusToggled {
            user: acct.clone(),
            task_id,
            completed,
            timestamp: self.clock.now(),
        };
        self.publish(accounts, event);
        Ok(completed)
    }

    /// Mark a live task deleted. Irreversible.
    pub fn soft_delete_task(&self, acct: &Account, task_id: u64) -> Result<()> {
        let mut accounts = self.write();
        let task = Self::live_task(&mut accounts, acct, task_id)?;
        task.deleted = true;

        let event = TaskEvent::TaskDeleted {
            user: acct.clone(),
            task_id,
            timestamp: self.clock.now(),
        };
        self.publish(accounts, event);
        Ok(())
    }

    /// Snapshot of one task, deleted or not.
    pub fn get_task(&self, acct: &Account, task_id: u64) -> Result<Task> {
        let accounts = self.read();
        let tasks = accounts
            .get(acct)
            .ok_or_else(|| TodoError::not_found(TASK_NOT_FOUND))?;
        let index = task_index(tasks, task_id)?;
        Ok(tasks[index].clone())
    }

    /// All tasks for `acct` including deleted ones, in id order.
    pub fn get_all_tasks(&self, acct: &Account) -> Vec<Task> {
        self.read().get(acct).cloned().unwrap_or_default()
    }

    /// Non-deleted tasks for `acct`, in id order.
    pub fn get_active_tasks(&self, acct: &Account) -> Vec<Task> {
        self.read()
            .get(acct)
            .map(|tasks| tasks.iter().filter(|t| !t.deleted).cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_task_count(&self, acct: &Account) -> u64 {
        self.stats(acct).total
    }

    pub fn get_active_task_count(&self, acct: &Account) -> u64 {
        self.stats(acct).active
    }

    pub fn get_completed_task_count(&self, acct: &Account) -> u64 {
        self.stats(acct).completed
    }

    /// All three counters for `acct`, consistent with each other.
    pub fn stats(&self, acct: &Account) -> TaskStats {
        let accounts = self.read();
        let Some(tasks) = accounts.get(acct) else {
            return TaskStats {
                total: 0,
                active: 0,
                completed: 0,
            };
        };
        let mut stats = TaskStats {
            total: tasks.len() as u64,
            active: 0,
            completed: 0,
        };
        for task in tasks.iter().filter(|t| !t.deleted) {
            stats.active += 1;
            if task.completed {
                stats.completed += 1;
            }
        }
        stats
    }

    /// Public read of any account's tasks (deleted included). Not keyed by
    /// caller identity.
    pub fn get_user_tasks(&self, other: &Account) -> Vec<Task> {
        self.get_all_tasks(other)
    }

    /// Accounts holding at least one task, sorted.
    pub fn accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.read().keys().cloned().collect();
        accounts.sort();
        accounts
    }

    /// Consistent copy of the whole ledger
    pub fn snapshot(&self) -> LedgerSnapshot {
        let accounts = self.read();
        LedgerSnapshot {
            accounts: accounts
                .iter()
                .map(|(account, tasks)| (account.clone(), tasks.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::clock::ManualClock;
    use super::events::EventLog;
    use super::*;

    const T0: i64 = 1_700_000_000;

    fn ledger() -> (TaskLedger, Arc<ManualClock>, Arc<EventLog>) {
        let clock = Arc::new(ManualClock::new(T0));
        let log = Arc::new(EventLog::default());
        let ledger = TaskLedger::new(clock.clone()).with_observer(log.clone());
        (ledger, clock, log)
    }

    fn user1() -> Account {
        Account::new("0x1111111111111111111111111111111111111111")
    }

    fn user2() -> Account {
        Account::new("0x2222222222222222222222222222222222222222")
    }

    fn descriptions(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.description.as_str()).collect()
    }

    #[test]
    fn test_add_task_sets_initial_fields() {
        let (ledger, _, _) = ledger();
        let id = ledger.add_task(&user1(), "Complete assignment").unwrap();
        assert_eq!(id, 0);

        let task = ledger.get_task(&user1(), 0).unwrap();
        assert_eq!(task.id, 0);
        assert_eq!(task.description, "Complete assignment");
        assert!(!task.completed);
        assert!(!task.deleted);
        assert_eq!(task.timestamp, T0);
    }

    #[test]
    fn test_add_task_emits_event() {
        let (ledger, _, log) = ledger();
        ledger.add_task(&user1(), "Study for exam").unwrap();

        let events = log.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            TaskEvent::TaskAdded {
                user: user1(),
                task_id: 0,
                description: "Study for exam".to_string(),
                timestamp: T0,
            }
        );
    }

    #[test]
    fn test_ids_are_sequential_per_account() {
        let (ledger, _, _) = ledger();
        for n in 0..5 {
            assert_eq!(ledger.add_task(&user1(), &format!("Task {}", n)).unwrap(), n);
        }
        assert_eq!(ledger.add_task(&user2(), "Other").unwrap(), 0);

        assert_eq!(ledger.get_task_count(&user1()), 5);
        let ids: Vec<u64> = ledger.get_all_tasks(&user1()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_description_length_boundaries() {
        let (ledger, _, log) = ledger();
        assert!(matches!(
            ledger.add_task(&user1(), ""),
            Err(TodoError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.add_task(&user1(), "   \t "),
            Err(TodoError::InvalidInput(_))
        ));
        let err = ledger.add_task(&user1(), &"x".repeat(501)).unwrap_err();
        assert_eq!(err.to_string(), "Description too long");

        assert!(ledger.add_task(&user1(), &"x".repeat(500)).is_ok());
        // multi-byte characters count once
        assert!(ledger.add_task(&user1(), &"é".repeat(500)).is_ok());

        assert_eq!(ledger.get_task_count(&user1()), 2);
        assert_eq!(log.events().len(), 2);
    }

    #[test]
    fn test_edit_task_replaces_description_only() {
        let (ledger, clock, log) = ledger();
        ledger.add_task(&user1(), "Original description").unwrap();
        ledger.toggle_task_status(&user1(), 0).unwrap();
        clock.advance(60);

        ledger.edit_task(&user1(), 0, "Updated description").unwrap();
        let task = ledger.get_task(&user1(), 0).unwrap();
        assert_eq!(task.description, "Updated description");
        assert!(task.completed);
        assert!(!task.deleted);
        assert_eq!(task.timestamp, T0);

        assert_eq!(
            log.events().last().unwrap(),
            &TaskEvent::TaskEdited {
                user: user1(),
                task_id: 0,
                new_description: "Updated description".to_string(),
                timestamp: T0 + 60,
            }
        );
    }

    #[test]
    fn test_edit_errors() {
        let (ledger, _, _) = ledger();
        ledger.add_task(&user1(), "Original").unwrap();

        let err = ledger.edit_task(&user1(), 999, "New").unwrap_err();
        assert!(matches!(err, TodoError::NotFound(_)));
        assert_eq!(err.to_string(), "Task does not exist");

        assert!(matches!(
            ledger.edit_task(&user1(), 0, ""),
            Err(TodoError::InvalidInput(_))
        ));

        ledger.soft_delete_task(&user1(), 0).unwrap();
        let err = ledger.edit_task(&user1(), 0, "New").unwrap_err();
        assert!(matches!(err, TodoError::InvalidState(_)));
        assert_eq!(err.to_string(), "Task is deleted");
    }

    #[test]
    fn test_failed_operations_emit_nothing() {
        let (ledger, _, log) = ledger();
        ledger.add_task(&user1(), "Task").unwrap();
        let _ = ledger.edit_task(&user1(), 0, "");
        let _ = ledger.toggle_task_status(&user1(), 7);
        let _ = ledger.add_task(&user1(), "");
        assert_eq!(log.events().len(), 1);
        assert_eq!(ledger.get_task(&user1(), 0).unwrap().description, "Task");
    }

    #[test]
    fn test_toggle_twice_restores_incomplete() {
        let (ledger, _, log) = ledger();
        ledger.add_task(&user1(), "Task to toggle").unwrap();

        assert!(ledger.toggle_task_status(&user1(), 0).unwrap());
        assert!(ledger.get_task(&user1(), 0).unwrap().completed);
        assert!(!ledger.toggle_task_status(&user1(), 0).unwrap());

        let task = ledger.get_task(&user1(), 0).unwrap();
        assert!(!task.completed);
        assert!(!task.deleted);

        match log.events().last().unwrap() {
            TaskEvent::TaskStatusToggled { completed, .. } => assert!(!completed),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_deleted_task_is_frozen_but_readable() {
        let (ledger, _, _) = ledger();
        ledger.add_task(&user1(), "Task to delete").unwrap();
        ledger.soft_delete_task(&user1(), 0).unwrap();

        for result in [
            ledger.edit_task(&user1(), 0, "x"),
            ledger.toggle_task_status(&user1(), 0).map(|_| ()),
            ledger.soft_delete_task(&user1(), 0),
        ] {
            assert!(matches!(result, Err(TodoError::InvalidState(_))));
        }

        let task = ledger.get_task(&user1(), 0).unwrap();
        assert!(task.deleted);
        assert_eq!(task.description, "Task to delete");
    }

    #[test]
    fn test_delete_middle_task_scenario() {
        let (ledger, _, _) = ledger();
        for d in ["Task 1", "Task 2", "Task 3"] {
            ledger.add_task(&user1(), d).unwrap();
        }
        ledger.soft_delete_task(&user1(), 1).unwrap();

        let active = ledger.get_active_tasks(&user1());
        assert_eq!(descriptions(&active), vec!["Task 1", "Task 3"]);
        assert_eq!(active[1].id, 2);
        assert_eq!(ledger.get_task_count(&user1()), 3);
        assert_eq!(ledger.get_active_task_count(&user1()), 2);

        let all = ledger.get_all_tasks(&user1());
        assert_eq!(all.len(), 3);
        assert!(all[1].deleted);
    }

    #[test]
    fn test_completed_count_excludes_deleted() {
        let (ledger, _, _) = ledger();
        ledger.add_task(&user1(), "Task 1").unwrap();
        ledger.add_task(&user1(), "Task 2").unwrap();
        ledger.toggle_task_status(&user1(), 0).unwrap();
        ledger.toggle_task_status(&user1(), 1).unwrap();
        assert_eq!(ledger.get_completed_task_count(&user1()), 2);

        ledger.soft_delete_task(&user1(), 1).unwrap();
        let stats = ledger.stats(&user1());
        assert_eq!(stats.completed, 1);
        assert!(stats.completed <= stats.active && stats.active <= stats.total);
        assert_eq!(stats.deleted(), 1);
    }

    #[test]
    fn test_empty_account_reads() {
        let (ledger, _, _) = ledger();
        assert!(ledger.get_all_tasks(&user1()).is_empty());
        assert!(ledger.get_active_tasks(&user1()).is_empty());
        assert_eq!(ledger.get_task_count(&user1()), 0);
        assert!(matches!(
            ledger.get_task(&user1(), 0),
            Err(TodoError::NotFound(_))
        ));
    }

    #[test]
    fn test_accounts_are_isolated() {
        let (ledger, _, _) = ledger();
        ledger.add_task(&user1(), "User1 Task").unwrap();
        ledger.add_task(&user2(), "User2 Task 1").unwrap();
        ledger.add_task(&user2(), "User2 Task 2").unwrap();

        assert_eq!(ledger.get_all_tasks(&user1()).len(), 1);
        assert_eq!(ledger.get_all_tasks(&user2()).len(), 2);

        // id 1 exists only for user2
        let err = ledger.get_task(&user1(), 1).unwrap_err();
        assert_eq!(err.to_string(), "Task does not exist");
        assert!(matches!(
            ledger.toggle_task_status(&user1(), 1),
            Err(TodoError::NotFound(_))
        ));
        assert!(!ledger.get_task(&user2(), 1).unwrap().completed);
    }

    #[test]
    fn test_other_account_cannot_touch_task() {
        let (ledger, _, _) = ledger();
        ledger.add_task(&user1(), "User1 Task").unwrap();
        let stranger = Account::new("0x3333333333333333333333333333333333333333");

        assert!(matches!(
            ledger.toggle_task_status(&stranger, 0),
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(
            ledger.soft_delete_task(&stranger, 0),
            Err(TodoError::NotFound(_))
        ));
        assert!(!ledger.get_task(&user1(), 0).unwrap().deleted);
        // failed owned calls must not create an empty account entry
        assert_eq!(ledger.accounts(), vec![user1()]);
    }

    #[test]
    fn test_get_user_tasks_crosses_accounts() {
        let (ledger, _, _) = ledger();
        ledger.add_task(&user2(), "User2 Task").unwrap();
        ledger.add_task(&user2(), "Gone").unwrap();
        ledger.soft_delete_task(&user2(), 1).unwrap();

        let tasks = ledger.get_user_tasks(&user2());
        assert_eq!(descriptions(&tasks), vec!["User2 Task", "Gone"]);
        assert!(ledger.get_user_tasks(&user1()).is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (ledger, clock, _) = ledger();
        ledger.add_task(&user1(), "A").unwrap();
        ledger.add_task(&user1(), "B").unwrap();
        ledger.soft_delete_task(&user1(), 0).unwrap();
        ledger.add_task(&user2(), "C").unwrap();

        let snapshot = ledger.snapshot();
        let restored = TaskLedger::from_snapshot(snapshot.clone(), clock).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.add_task(&user1(), "D").unwrap(), 2);
    }

    #[test]
    fn test_from_snapshot_rejects_gapped_ids() {
        let mut snapshot = LedgerSnapshot::default();
        snapshot.accounts.insert(
            user1(),
            vec![Task {
                id: 1,
                description: "bad".to_string(),
                completed: false,
                deleted: false,
                timestamp: T0,
            }],
        );
        let result = TaskLedger::from_snapshot(snapshot, Arc::new(ManualClock::new(T0)));
        assert!(matches!(result, Err(TodoError::Storage(_))));
    }

    #[test]
    fn test_concurrent_adds_get_distinct_ids() {
        let (ledger, _, log) = ledger();
        let ledger = Arc::new(ledger);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| ledger.add_task(&user1(), &format!("t{}-{}", t, i)).unwrap())
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..400).collect::<Vec<u64>>());
        assert_eq!(ledger.get_task_count(&user1()), 400);
        assert_eq!(log.events().len(), 400);
    }

    #[test]
    fn test_concurrent_toggles_notify_in_apply_order() {
        let (ledger, _, log) = ledger();
        let ledger = Arc::new(ledger);
        ledger.add_task(&user1(), "Flip me").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        ledger.toggle_task_status(&user1(), 0).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Replaying the log must alternate true/false and end on the stored value.
        let toggles: Vec<bool> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                TaskEvent::TaskStatusToggled { completed, .. } => Some(*completed),
                _ => None,
            })
            .collect();
        assert_eq!(toggles.len(), 200);
        for (i, completed) in toggles.iter().enumerate() {
            assert_eq!(*completed, i % 2 == 0, "event {} out of order", i);
        }
        assert_eq!(
            toggles.last().copied(),
            Some(ledger.get_task(&user1(), 0).unwrap().completed)
        );
    }

    #[test]
    fn test_racing_delete_and_edit_resolve_in_order() {
        let (ledger, _, _) = ledger();
        let ledger = Arc::new(ledger);
        ledger.add_task(&user1(), "Race").unwrap();

        let a = {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || ledger.soft_delete_task(&user1(), 0).is_ok())
        };
        let b = {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || ledger.edit_task(&user1(), 0, "Edited").is_ok())
        };
        let deleted = a.join().unwrap();
        let edited = b.join().unwrap();

        // delete always lands; the edit either preceded it or saw the deleted flag
        assert!(deleted);
        let task = ledger.get_task(&user1(), 0).unwrap();
        assert!(task.deleted);
        if edited {
            assert_eq!(task.description, "Edited");
        } else {
            assert_eq!(task.description, "Race");
        }
    }
}
