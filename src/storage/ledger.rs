//! Ledger snapshot persistence
//! Stores every account's tasks in `<data dir>/ledger.toml`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::{load_toml, save_toml};
use crate::error::{Result, TodoError};
use crate::ledger::clock::Clock;
use crate::ledger::events::{TaskEvent, TaskObserver};
use crate::ledger::{LedgerSnapshot, TaskLedger};

/// Get the ledger.toml path
pub fn ledger_path(data_dir: &Path) -> PathBuf {
    data_dir.join("ledger.toml")
}

/// Load a snapshot; a missing file is an empty ledger
pub fn load_snapshot(path: &Path) -> Result<LedgerSnapshot> {
    if !path.exists() {
        return Ok(LedgerSnapshot::default());
    }
    load_toml(path)
}

pub fn save_snapshot(path: &Path, snapshot: &LedgerSnapshot) -> Result<()> {
    save_toml(path, snapshot)
}

/// Open the ledger stored at `path`
pub fn open_ledger(path: &Path, clock: Arc<dyn Clock>) -> Result<TaskLedger> {
    let snapshot = load_snapshot(path)?;
    TaskLedger::from_snapshot(snapshot, clock)
}

/// Write the current ledger state to `path`
pub fn flush(ledger: &TaskLedger, path: &Path) -> Result<()> {
    save_snapshot(path, &ledger.snapshot())
}

/// Wakes the snapshot saver on every committed change.
struct PersistObserver {
    wake: Arc<Notify>,
}

impl TaskObserver for PersistObserver {
    fn on_event(&self, _event: &TaskEvent) {
        self.wake.notify_one();
    }
}

/// Background writer that snapshots the ledger after changes.
///
/// Bursts of changes coalesce into one write. Write failures are logged and
/// retried on the next change; they never undo a committed mutation.
pub struct SnapshotSaver {
    path: PathBuf,
    wake: Arc<Notify>,
}

/// Running saver, returned by [`SnapshotSaver::spawn`].
pub struct SaverHandle {
    stop: Arc<Notify>,
    task: JoinHandle<()>,
    ledger: Arc<TaskLedger>,
    path: PathBuf,
}

async fn save_in_background(path: PathBuf, snapshot: LedgerSnapshot) -> Result<()> {
    tokio::task::spawn_blocking(move || save_snapshot(&path, &snapshot))
        .await
        .map_err(|e| TodoError::storage(format!("ledger save task failed: {}", e)))?
}

impl SnapshotSaver {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            wake: Arc::new(Notify::new()),
        }
    }

    /// Observer to register on the ledger
    pub fn observer(&self) -> Arc<dyn TaskObserver> {
        Arc::new(PersistObserver {
            wake: Arc::clone(&self.wake),
        })
    }

    /// Start the saver loop on the current runtime
    pub fn spawn(self, ledger: Arc<TaskLedger>) -> SaverHandle {
        let SnapshotSaver { path, wake } = self;
        let stop = Arc::new(Notify::new());
        let task = {
            let stop = Arc::clone(&stop);
            let ledger = Arc::clone(&ledger);
            let path = path.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        biased;
                        _ = stop.notified() => break,
                        _ = wake.notified() => {}
                    }
                    // A save in flight is awaited here, so `stop` is only seen
                    // once it has finished.
                    match save_in_background(path.clone(), ledger.snapshot()).await {
                        Ok(()) => tracing::debug!(path = %path.display(), "ledger saved"),
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "failed to save ledger")
                        }
                    }
                }
            })
        };
        SaverHandle {
            stop,
            task,
            ledger,
            path,
        }
    }
}

impl SaverHandle {
    /// Stop the saver, wait for any write in progress, then write the final
    /// state. Nothing else may write the file concurrently.
    pub async fn shutdown(self) -> Result<()> {
        self.stop.notify_one();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "ledger saver stopped abnormally");
        }
        save_in_background(self.path, self.ledger.snapshot()).await
    }
}
