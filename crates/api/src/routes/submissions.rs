//! Route definitions for the submission history.
//!
//! ```text
//! GET    /                    list_submissions (paginated, ?tool_id=)
//! GET    /{id}                get_submission
//! DELETE /{id}                delete_submission
//! POST   /{id}/regenerate     regenerate_submission
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Submission history routes -- mounted at `/submissions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(submissions::list_submissions))
        .route(
            "/{id}",
            get(submissions::get_submission).delete(submissions::delete_submission),
        )
        .route("/{id}/regenerate", post(submissions::regenerate_submission))
}
