//! Task API handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::{AppState, Caller};
use crate::ledger::{self, Account, Task};

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Task list query parameters
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    /// Include deleted tasks
    #[serde(default)]
    pub all: bool,
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub account: Account,
    pub tasks: Vec<Task>,
    pub count: usize,
}

/// Single task response
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub task: Task,
}

/// Create/edit request body
#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    pub description: Option<String>,
}

/// Mutation response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub success: bool,
    pub task_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    pub message: String,
}

// ============================================================================
// Helper functions
// ============================================================================

/// Parse a `{id}` path segment
fn parse_task_id(raw: &str) -> ApiResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ApiError::bad_request("Invalid task ID"))
}

/// Pull the description out of a request body, with the ledger's rules
/// checked up front so a bad body never reaches it.
fn take_description(body: Result<Json<DescriptionRequest>, JsonRejection>) -> ApiResult<String> {
    let Json(body) = body?;
    let description = body
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Description is required"))?;
    ledger::validate_description(&description)?;
    Ok(description)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/tasks
/// Active tasks for the caller (`?all=true` includes deleted ones)
pub async fn list_tasks(
    State(state): State<AppState>,
    Caller(account): Caller,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> ApiResult<Json<TaskListResponse>> {
    let Query(query) = query?;
    let tasks = if query.all {
        state.ledger.get_all_tasks(&account)
    } else {
        state.ledger.get_active_tasks(&account)
    };
    Ok(Json(TaskListResponse {
        success: true,
        count: tasks.len(),
        account,
        tasks,
    }))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Caller(account): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = parse_task_id(&id)?;
    let task = state.ledger.get_task(&account, task_id)?;
    Ok(Json(TaskResponse {
        success: true,
        task,
    }))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    Caller(account): Caller,
    body: Result<Json<DescriptionRequest>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let description = take_description(body)?;
    let task_id = state.ledger.add_task(&account, &description)?;
    Ok(Json(MutationResponse {
        success: true,
        task_id,
        completed: None,
        message: "Task added successfully".to_string(),
    }))
}

/// PUT /api/tasks/{id}
pub async fn edit_task(
    State(state): State<AppState>,
    Caller(account): Caller,
    Path(id): Path<String>,
    body: Result<Json<DescriptionRequest>, JsonRejection>,
) -> ApiResult<Json<MutationResponse>> {
    let task_id = parse_task_id(&id)?;
    let description = take_description(body)?;
    state.ledger.edit_task(&account, task_id, &description)?;
    Ok(Json(MutationResponse {
        success: true,
        task_id,
        completed: None,
        message: "Task updated successfully".to_string(),
    }))
}

/// PATCH /api/tasks/{id}/toggle
pub async fn toggle_task(
    State(state): State<AppState>,
    Caller(account): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationResponse>> {
    let task_id = parse_task_id(&id)?;
    let completed = state.ledger.toggle_task_status(&account, task_id)?;
    Ok(Json(MutationResponse {
        success: true,
        task_id,
        completed: Some(completed),
        message: "Task status toggled successfully".to_string(),
    }))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Caller(account): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationResponse>> {
    let task_id = parse_task_id(&id)?;
    state.ledger.soft_delete_task(&account, task_id)?;
    Ok(Json(MutationResponse {
        success: true,
        task_id,
        completed: None,
        message: "Task deleted successfully".to_string(),
    }))
}
