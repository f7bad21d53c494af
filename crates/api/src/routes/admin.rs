//! Route definitions for the admin dashboard (all admin-only).
//!
//! ```text
//! GET    /tools                      admin_list_tools (incl. inactive)
//! POST   /tools                      create_tool
//! PUT    /tools/{id}                 update_tool
//! DELETE /tools/{id}                 delete_tool
//! DELETE /tools/{id}/submissions     purge_tool_submissions
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::tools;
use crate::state::AppState;

/// Admin routes -- mounted at `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/tools",
            get(tools::admin_list_tools).post(tools::create_tool),
        )
        .route(
            "/tools/{id}",
            axum::routing::put(tools::update_tool).delete(tools::delete_tool),
        )
        .route(
            "/tools/{id}/submissions",
            delete(tools::purge_tool_submissions),
        )
}
