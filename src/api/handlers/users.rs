//! Public per-address reads

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::address::parse_address;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::ledger::{Account, Task};

#[derive(Debug, Default, Deserialize)]
pub struct UserTasksQuery {
    /// Drop deleted tasks
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTasksResponse {
    pub success: bool,
    pub user_address: Account,
    pub tasks: Vec<Task>,
    pub count: usize,
}

/// GET /api/users/{address}/tasks
/// Any account's tasks, regardless of who is asking
pub async fn get_user_tasks(
    State(state): State<AppState>,
    Path(address): Path<String>,
    query: Result<Query<UserTasksQuery>, QueryRejection>,
) -> ApiResult<Json<UserTasksResponse>> {
    let Query(query) = query?;
    let account =
        parse_address(&address).map_err(|_| ApiError::bad_request("Invalid account address"))?;

    let mut tasks = state.ledger.get_user_tasks(&account);
    if query.active {
        tasks.retain(|t| !t.deleted);
    }

    Ok(Json(UserTasksResponse {
        success: true,
        user_address: account,
        count: tasks.len(),
        tasks,
    }))
}
