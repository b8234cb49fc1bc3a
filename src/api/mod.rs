//! Web API module

pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{OriginalUri, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Create the API router
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Accounts API
        .route("/wallet/connect", get(handlers::wallet::connect))
        .route("/accounts", get(handlers::wallet::list_accounts))
        // Tasks API
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/tasks/{id}",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::edit_task)
                .delete(handlers::tasks::delete_task),
        )
        .route("/tasks/{id}/toggle", patch(handlers::tasks::toggle_task))
        // Stats API
        .route("/stats/count", get(handlers::stats::get_counts))
        // Public reads
        .route(
            "/users/{address}/tasks",
            get(handlers::users::get_user_tasks),
        )
        .route("/events", get(handlers::health::list_events))
}

#[derive(Serialize)]
struct NotFoundBody {
    success: bool,
    error: &'static str,
    path: String,
}

async fn route_not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            success: false,
            error: "Route not found",
            path: uri.path().to_string(),
        }),
    )
}

/// Log one line per request
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Create the full router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", create_api_router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_request))
        .layer(cors)
}

/// Start the API server on an already bound listener
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Bind `addr` and start the API server
pub async fn start_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("todo-ledger API: http://{}/api", listener.local_addr()?);
    serve(listener, state).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
