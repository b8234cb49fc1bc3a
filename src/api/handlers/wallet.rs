//! Account/wallet handlers

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::api::state::{AppState, Caller};
use crate::ledger::Account;

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub connected: bool,
    pub account: Account,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub address: Account,
    pub task_count: u64,
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub success: bool,
    pub accounts: Vec<AccountEntry>,
}

/// GET /api/wallet/connect
/// The account requests are currently acting for
pub async fn connect(Caller(account): Caller) -> Json<ConnectResponse> {
    Json(ConnectResponse {
        connected: true,
        account,
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// GET /api/accounts
/// Configured accounts a client may switch between
pub async fn list_accounts(State(state): State<AppState>) -> Json<AccountsResponse> {
    let accounts = state
        .known_accounts
        .iter()
        .map(|account| AccountEntry {
            address: account.clone(),
            task_count: state.ledger.get_task_count(account),
            is_default: state.default_account.as_ref() == Some(account),
        })
        .collect();
    Json(AccountsResponse {
        success: true,
        accounts,
    })
}
