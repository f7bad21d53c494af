//! Repository for the `tool_submissions` table.

use sqlx::PgPool;
use toolforge_core::types::DbId;

use crate::models::submission::{CreateSubmission, Submission, STATUS_SUCCESS};

const COLUMNS: &str = "id, user_id, tool_id, tool_name, form_data, result, \
     status, created_at, updated_at";

/// Provides history operations for tool submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Append a completed submission. The row is created in the `success`
    /// state; the store assigns id and timestamps.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubmission,
    ) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO tool_submissions \
                (user_id, tool_id, tool_name, form_data, result, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(input.user_id)
            .bind(input.tool_id)
            .bind(&input.tool_name)
            .bind(&input.form_data)
            .bind(&input.result)
            .bind(STATUS_SUCCESS)
            .fetch_one(pool)
            .await
    }

    /// Find a submission by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tool_submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's submissions, newest first, optionally filtered by tool.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        tool_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tool_submissions \
             WHERE user_id = $1 AND ($2::bigint IS NULL OR tool_id = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(user_id)
            .bind(tool_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total submissions for a user, with the same optional tool filter as
    /// [`list_for_user`](Self::list_for_user).
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        tool_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tool_submissions \
             WHERE user_id = $1 AND ($2::bigint IS NULL OR tool_id = $2)",
        )
        .bind(user_id)
        .bind(tool_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Delete one submission by ID. Ownership is checked at the handler
    /// layer. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tool_submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Purge all history for a tool (admin maintenance). Returns the number
    /// of rows removed.
    pub async fn delete_by_tool(pool: &PgPool, tool_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tool_submissions WHERE tool_id = $1")
            .bind(tool_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
