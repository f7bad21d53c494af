pub mod admin;
pub mod auth;
pub mod health;
pub mod submissions;
pub mod tools;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/me                             profile (requires auth)
///
/// /tools                               public catalogue (active tools)
/// /tools/{slug}                        tool detail by slug
/// /tools/{slug}/submissions            dynamic form submit (optional auth)
///
/// /submissions                         history, paginated (auth)
/// /submissions/{id}                    get, delete (auth, owner)
/// /submissions/{id}/regenerate         re-run stored payload (auth, owner)
///
/// /admin/tools                         list incl. inactive, create (admin)
/// /admin/tools/{id}                    update, delete (admin)
/// /admin/tools/{id}/submissions        purge history (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tools", tools::router())
        .nest("/submissions", submissions::router())
        .nest("/admin", admin::router())
}
