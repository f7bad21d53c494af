//! Submission history entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolforge_core::types::{DbId, Timestamp};

/// Submission lifecycle states.
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_FAILED: &str = "failed";

/// A row from the `tool_submissions` table: one completed form interaction
/// and the result the webhook returned for it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    /// Absent for anonymous submissions (persistence requires a user, but
    /// the column allows orphaning on user deletion).
    pub user_id: Option<DbId>,
    pub tool_id: DbId,
    /// Denormalized so history survives tool renames/deletes.
    pub tool_name: String,
    pub form_data: serde_json::Value,
    pub result: serde_json::Value,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending a submission record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmission {
    pub user_id: Option<DbId>,
    pub tool_id: DbId,
    pub tool_name: String,
    pub form_data: serde_json::Value,
    pub result: serde_json::Value,
}
