use std::sync::Arc;

use toolforge_webhook::WebhookClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: toolforge_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Shared webhook delivery client; `submit` calls are independent, so
    /// one instance serves every form session.
    pub webhook: Arc<WebhookClient>,
}
