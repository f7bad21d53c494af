//! Route definitions for the public tool catalogue.
//!
//! ```text
//! GET  /                      list_tools (active only)
//! GET  /{slug}                get_tool_by_slug
//! POST /{slug}/submissions    submit_tool (dynamic form pipeline)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{submissions, tools};
use crate::state::AppState;

/// Public tool routes -- mounted at `/tools`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tools::list_tools))
        .route("/{slug}", get(tools::get_tool_by_slug))
        .route("/{slug}/submissions", post(submissions::submit_tool))
}
