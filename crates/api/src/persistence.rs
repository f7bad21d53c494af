//! Submission sink backed by the `tool_submissions` table.

use serde_json::json;
use toolforge_core::types::DbId;
use toolforge_db::models::submission::CreateSubmission;
use toolforge_db::repositories::SubmissionRepo;
use toolforge_db::DbPool;
use toolforge_forms::{SubmissionRecord, SubmissionSink};

/// Writes successful submissions to PostgreSQL on behalf of one user.
///
/// Constructed per request; the form controller spawns the write and never
/// awaits it, so a failure here is logged upstream, not surfaced.
pub struct PgSubmissionSink {
    pool: DbPool,
    user_id: DbId,
}

impl PgSubmissionSink {
    pub fn new(pool: DbPool, user_id: DbId) -> Self {
        Self { pool, user_id }
    }
}

#[async_trait::async_trait]
impl SubmissionSink for PgSubmissionSink {
    async fn record(&self, record: SubmissionRecord) -> anyhow::Result<()> {
        let input = CreateSubmission {
            user_id: Some(self.user_id),
            tool_id: record.tool_id,
            tool_name: record.tool_name,
            form_data: json!(record.form_data),
            result: record.result,
        };
        let created = SubmissionRepo::create(&self.pool, &input).await?;
        tracing::debug!(id = created.id, tool_id = created.tool_id, "Submission recorded");
        Ok(())
    }
}
