//! In-memory todo service over HTTP.
//!
//! # Overview
//! Clients create, list, update, complete, and uncomplete todos, and read
//! average completion times per priority. Listing supports filtering,
//! sorting, and pagination. Nothing is persisted across restarts.
//!
//! # Design
//! - [`store::TodoStore`] owns the records; [`store::InMemoryTodoStore`] is
//!   the only backend and is injected into the service.
//! - [`service::TodoService`] holds the business rules: priority from due
//!   date, done/undone bookkeeping, listing, metrics.
//! - [`routes`] is the axum layer: validation and error-to-status mapping.

pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod routes;
pub mod service;
pub mod store;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::routes::AppState;
use crate::service::TodoService;

pub use error::{ApiErrorResponse, TodoError};
pub use model::{Todo, TodoInput, TodoMetrics, TodoPage};

/// Router over a fresh, empty in-memory store with default settings.
pub fn app() -> Router {
    router(TodoService::in_memory(), &ServerConfig::default())
}

pub fn router(service: AppState, config: &ServerConfig) -> Router {
    let router = routes::todo_routes()
        .with_state(service)
        .layer(TraceLayer::new_for_http());
    if config.cors_allow_any {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serves until ctrl-c.
pub async fn serve(listener: TcpListener, config: &ServerConfig) -> Result<(), std::io::Error> {
    let app = router(TodoService::in_memory(), config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
