//! Best-effort history persistence.
//!
//! The controller forwards successful submissions to a [`SubmissionSink`]
//! as a fire-and-forget side effect: the write is spawned after the success
//! state is already established, and a failure is logged, never surfaced.

use serde::Serialize;
use toolforge_core::form::FormValues;
use toolforge_core::types::DbId;

/// One completed form interaction, ready to append to the history store.
///
/// The store assigns id, status, and timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    pub tool_id: DbId,
    pub tool_name: String,
    pub form_data: FormValues,
    pub result: serde_json::Value,
}

/// External submission record store.
///
/// Implementations are multi-writer and own durability; the controller
/// never awaits the write before reporting success.
#[async_trait::async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn record(&self, record: SubmissionRecord) -> anyhow::Result<()>;
}
