//! Handlers for the tool catalogue: public listing and admin CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use toolforge_core::error::CoreError;
use toolforge_core::types::DbId;
use toolforge_db::models::tool::{CreateTool, Tool, UpdateTool};
use toolforge_db::repositories::{SubmissionRepo, ToolRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a tool exists, returning the full row.
pub(crate) async fn ensure_tool_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Tool> {
    ToolRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Tool", id }))
}

// ---------------------------------------------------------------------------
// GET /tools
// ---------------------------------------------------------------------------

/// List active tools for the public catalogue, in display order.
pub async fn list_tools(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = ToolRepo::list_active(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed tools");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /tools/{slug}
// ---------------------------------------------------------------------------

/// Get a single tool by its public slug.
pub async fn get_tool_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tool = ToolRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tool '{slug}' not found")))?;
    Ok(Json(DataResponse { data: tool }))
}

// ===========================================================================
// ADMIN HANDLERS
// ===========================================================================

// ---------------------------------------------------------------------------
// GET /admin/tools
// ---------------------------------------------------------------------------

/// List every tool regardless of status.
pub async fn admin_list_tools(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = ToolRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /admin/tools
// ---------------------------------------------------------------------------

/// Create a new tool.
pub async fn create_tool(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTool>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let created = ToolRepo::create(&state.pool, &input).await?;
    tracing::info!(
        id = created.id,
        name = %created.name,
        actor = user.user_id,
        "Tool created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PUT /admin/tools/{id}
// ---------------------------------------------------------------------------

/// Update an existing tool.
pub async fn update_tool(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTool>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_tool_exists(&state.pool, id).await?;

    let updated = ToolRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tool", id }))?;
    tracing::info!(id = updated.id, actor = user.user_id, "Tool updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /admin/tools/{id}
// ---------------------------------------------------------------------------

/// Delete a tool. History records keep their denormalized tool name.
pub async fn delete_tool(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_tool_exists(&state.pool, id).await?;
    ToolRepo::delete(&state.pool, id).await?;
    tracing::info!(id, actor = user.user_id, "Tool deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// DELETE /admin/tools/{id}/submissions
// ---------------------------------------------------------------------------

/// Purge all submission history for a tool (maintenance).
pub async fn purge_tool_submissions(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_tool_exists(&state.pool, id).await?;
    let removed = SubmissionRepo::delete_by_tool(&state.pool, id).await?;
    tracing::info!(tool_id = id, removed, actor = user.user_id, "Tool history purged");
    Ok(Json(DataResponse { data: removed }))
}
