//! Health and event-log handlers

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::api::state::{AppState, Caller};
use crate::ledger::events::TaskEvent;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub accounts: usize,
    pub default_account: bool,
    pub events_retained: usize,
    pub uptime_secs: i64,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub success: bool,
    pub events: Vec<TaskEvent>,
    pub count: usize,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        accounts: state.ledger.accounts().len(),
        default_account: state.default_account.is_some(),
        events_retained: state.events.events().len(),
        uptime_secs: (now - state.started_at).num_seconds(),
        timestamp: now.to_rfc3339(),
    })
}

/// GET /api/events
/// Recent change notifications for the caller, oldest first
pub async fn list_events(State(state): State<AppState>, Caller(account): Caller) -> Json<EventsResponse> {
    let events = state.events.events_for(&account);
    Json(EventsResponse {
        success: true,
        count: events.len(),
        events,
    })
}
