//! Shared state for the Web API server, and caller resolution.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Utc};

use super::error::ApiError;
use crate::address::parse_address;
use crate::ledger::events::EventLog;
use crate::ledger::{Account, TaskLedger};

/// Header naming the caller account
pub const ACCOUNT_HEADER: &str = "x-account";

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<TaskLedger>,
    pub events: Arc<EventLog>,
    /// Caller used when a request carries no `X-Account` header
    pub default_account: Option<Account>,
    /// Accounts offered to clients for switching
    pub known_accounts: Vec<Account>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(ledger: Arc<TaskLedger>, events: Arc<EventLog>) -> Self {
        Self {
            ledger,
            events,
            default_account: None,
            known_accounts: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn with_accounts(mut self, default: Option<Account>, known: Vec<Account>) -> Self {
        self.default_account = default;
        self.known_accounts = known;
        self
    }
}

/// The account a request acts for: the `X-Account` header, else the
/// configured default.
#[derive(Debug, Clone)]
pub struct Caller(pub Account);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        if let Some(value) = parts.headers.get(ACCOUNT_HEADER) {
            let raw = value
                .to_str()
                .map_err(|_| ApiError::bad_request("Invalid account address"))?;
            let account = parse_address(raw).map_err(ApiError::from)?;
            return Ok(Caller(account));
        }

        state
            .default_account
            .clone()
            .map(Caller)
            .ok_or_else(|| ApiError::bad_request("No account available"))
    }
}
