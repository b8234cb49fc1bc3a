//! Stats API handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::state::{AppState, Caller};
use crate::ledger::Account;

/// Task counters
#[derive(Debug, Serialize)]
pub struct StatsDto {
    pub total: u64,
    pub active: u64,
    pub completed: u64,
    pub deleted: u64,
}

/// Stats response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub account: Account,
    pub stats: StatsDto,
}

/// GET /api/stats/count
pub async fn get_counts(State(state): State<AppState>, Caller(account): Caller) -> Json<StatsResponse> {
    let stats = state.ledger.stats(&account);
    Json(StatsResponse {
        success: true,
        account,
        stats: StatsDto {
            total: stats.total,
            active: stats.active,
            completed: stats.completed,
            deleted: stats.deleted(),
        },
    })
}
