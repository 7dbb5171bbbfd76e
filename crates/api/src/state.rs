use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The event bus is constructed exactly once in `main` and
/// passed here rather than living in a global slot, so tests can build
/// isolated instances and no module reload can ever duplicate it.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: atelier_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus feeding the SSE stream endpoints.
    pub event_bus: Arc<atelier_events::EventBus>,
}
