//! Handlers for form submission and the submission history.
//!
//! `submit_tool` is the server side of the dynamic form pipeline: it builds
//! a form config from the Tool record, runs the controller (validation,
//! webhook delivery, best-effort persistence), and maps the outcome onto
//! HTTP.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use toolforge_core::error::CoreError;
use toolforge_core::form::{FieldSpec, FormConfig, FormValues, ValidationRules};
use toolforge_core::roles::ROLE_ADMIN;
use toolforge_core::types::DbId;
use toolforge_db::models::submission::Submission;
use toolforge_db::models::tool::Tool;
use toolforge_db::repositories::{SubmissionRepo, ToolRepo};
use toolforge_forms::{FormSession, SubmissionSink};

use crate::error::{AppError, AppResult};
use crate::handlers::tools::ensure_tool_exists;
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::persistence::PgSubmissionSink;
use crate::query::HistoryParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a form config from a Tool record.
///
/// Validation is synthesized as `{required}` only -- richer rules (length,
/// bounds, patterns) exist only in hand-built configs, never on Tool
/// records.
fn form_config_from_tool(tool: &Tool) -> FormConfig {
    let fields = tool
        .form_fields()
        .into_iter()
        .map(|f| FieldSpec {
            validation: Some(ValidationRules::required_only(f.required)),
            name: f.name,
            label: f.label,
            field_type: f.field_type,
            placeholder: f.placeholder,
            required: f.required,
            options: f.options,
        })
        .collect();

    FormConfig {
        fields,
        webhook_url: tool.webhook_url.clone(),
        result_title: Some(format!("Your AI-Generated {} is Ready", tool.name)),
        tool_id: Some(tool.id),
        tool_name: Some(tool.name.clone()),
        messages: None,
    }
}

/// Fetch a submission, enforcing that the caller owns it (admins see all).
async fn ensure_owned_submission(
    pool: &sqlx::PgPool,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Submission> {
    let submission = SubmissionRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Submission",
                id,
            })
        })?;

    let owned = submission.user_id == Some(auth.user_id);
    if !owned && auth.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not your submission".into(),
        )));
    }
    Ok(submission)
}

// ---------------------------------------------------------------------------
// POST /tools/{slug}/submissions
// ---------------------------------------------------------------------------

/// Run the dynamic form pipeline for a tool.
///
/// The body is the raw field-name→value map. Anonymous callers can submit;
/// history is persisted only for signed-in users. Validation failures map
/// to 422 with a per-field message map, webhook failures to 502.
pub async fn submit_tool(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let tool = ToolRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tool '{slug}' not found")))?;
    let config = form_config_from_tool(&tool);

    let mut session = FormSession::new(config, Arc::clone(&state.webhook));
    if let Some(user) = &auth {
        let sink = PgSubmissionSink::new(state.pool.clone(), user.user_id);
        session = session.with_sink(Arc::new(sink) as Arc<dyn SubmissionSink>);
    }

    session.seed(&body);
    let display = session.submit().await?;

    tracing::info!(
        tool_id = tool.id,
        user_id = auth.as_ref().map(|u| u.user_id),
        "Form submitted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: display })))
}

// ---------------------------------------------------------------------------
// POST /submissions/{id}/regenerate
// ---------------------------------------------------------------------------

/// Re-run a stored submission's payload against its tool's webhook.
///
/// The stored payload was validated when first submitted, so validation is
/// skipped; no new history record is written.
pub async fn regenerate_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let submission = ensure_owned_submission(&state.pool, &auth, id).await?;
    let tool = ensure_tool_exists(&state.pool, submission.tool_id).await?;

    let payload: FormValues = serde_json::from_value(submission.form_data.clone())
        .map_err(|e| AppError::InternalError(format!("Stored form data is unreadable: {e}")))?;

    let mut session = FormSession::new(form_config_from_tool(&tool), Arc::clone(&state.webhook));
    session.restore_payload(payload);
    let display = session.regenerate().await?;

    tracing::info!(submission_id = id, tool_id = tool.id, "Submission regenerated");
    Ok(Json(DataResponse { data: display }))
}

// ---------------------------------------------------------------------------
// GET /submissions
// ---------------------------------------------------------------------------

/// The caller's submission history, newest first, optionally filtered by
/// tool.
pub async fn list_submissions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<impl IntoResponse> {
    let (page, per_page) = params.resolve();
    let items = SubmissionRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.tool_id,
        per_page,
        params.offset(),
    )
    .await?;
    let total = SubmissionRepo::count_for_user(&state.pool, auth.user_id, params.tool_id).await?;

    Ok(Json(PaginatedResponse::new(items, total, page, per_page)))
}

// ---------------------------------------------------------------------------
// GET /submissions/{id}
// ---------------------------------------------------------------------------

/// One history record.
pub async fn get_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let submission = ensure_owned_submission(&state.pool, &auth, id).await?;
    Ok(Json(DataResponse { data: submission }))
}

// ---------------------------------------------------------------------------
// DELETE /submissions/{id}
// ---------------------------------------------------------------------------

/// Delete one of the caller's history records.
pub async fn delete_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_owned_submission(&state.pool, &auth, id).await?;
    SubmissionRepo::delete(&state.pool, id).await?;
    tracing::info!(submission_id = id, user_id = auth.user_id, "Submission deleted");
    Ok(StatusCode::NO_CONTENT)
}
