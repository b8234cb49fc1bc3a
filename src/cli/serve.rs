//! `serve` command: run the REST API over the persisted ledger

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use super::Context;
use crate::api::{self, state::AppState};
use crate::error::{Result, TodoError};
use crate::ledger::clock::SystemClock;
use crate::ledger::events::{EventLog, TracingObserver};
use crate::ledger::webhook::WebhookObserver;
use crate::storage::{self, ledger as ledger_store};

/// Run the API server until Ctrl+C
pub async fn execute(
    ctx: Context,
    host: Option<IpAddr>,
    port: Option<u16>,
    no_persist: bool,
) -> Result<()> {
    let config = &ctx.config;
    let host: IpAddr = match host {
        Some(h) => h,
        None => config
            .server
            .host
            .parse()
            .map_err(|_| TodoError::config(format!("server.host is not an IP: {}", config.server.host)))?,
    };
    let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));
    let persist = config.storage.persist && !no_persist;

    let path = ledger_store::ledger_path(&ctx.data_dir);
    let clock = Arc::new(SystemClock);
    let ledger = if persist {
        storage::ensure_data_dir(&ctx.data_dir)?;
        let ledger = ledger_store::open_ledger(&path, clock)?;
        tracing::info!(
            path = %path.display(),
            accounts = ledger.accounts().len(),
            "ledger loaded"
        );
        ledger
    } else {
        tracing::info!("persistence disabled, ledger is in-memory");
        crate::ledger::TaskLedger::new(clock)
    };

    let events = Arc::new(EventLog::default());
    let mut ledger = ledger
        .with_observer(events.clone())
        .with_observer(Arc::new(TracingObserver));

    if let Some(url) = config.webhook_url()? {
        tracing::info!(%url, "forwarding events to webhook");
        ledger = ledger.with_observer(Arc::new(WebhookObserver::new(
            url,
            config.webhook.secret.clone(),
        )));
    }

    let saver = persist.then(|| ledger_store::SnapshotSaver::new(path.clone()));
    if let Some(saver) = &saver {
        ledger = ledger.with_observer(saver.observer());
    }
    let ledger = Arc::new(ledger);
    let saver_handle = saver.map(|s| s.spawn(Arc::clone(&ledger)));

    let default_account = ctx.resolve_account()?;
    match &default_account {
        Some(account) => tracing::info!(%account, "default caller"),
        None => tracing::warn!("no default account: requests must send X-Account"),
    }
    let mut known = config.known_accounts()?;
    if let Some(account) = &default_account {
        if !known.contains(account) {
            known.insert(0, account.clone());
        }
    }
    let state = AppState::new(Arc::clone(&ledger), events).with_accounts(default_account, known);

    let served = api::start_server(addr, state).await;

    if let Some(handle) = saver_handle {
        handle.shutdown().await?;
        tracing::info!(path = %path.display(), "ledger flushed");
    }
    served.map_err(TodoError::from)
}
