//! Tool catalogue entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toolforge_core::form::{FieldOption, FieldType};
use toolforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// Tool lifecycle states shown in the catalogue.
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMING_SOON: &str = "coming_soon";
pub const STATUS_BETA: &str = "beta";

/// A row from the `tools` table.
///
/// `fields` is the JSONB-stored input list; decode it with
/// [`Tool::form_fields`] before building a form config.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tool {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub icon: Option<String>,
    pub status: String,
    pub webhook_url: String,
    pub fields: serde_json::Value,
    pub features: Option<serde_json::Value>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One input definition as stored on a Tool record.
///
/// Deliberately narrower than a full field spec: a Tool record only carries
/// a `required` flag; richer validation rules exist only in hand-built
/// form configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl Tool {
    /// Decode the JSONB field list. A malformed list is a configuration
    /// defect; it decodes to an empty form rather than failing the page.
    pub fn form_fields(&self) -> Vec<ToolField> {
        serde_json::from_value(self.fields.clone()).unwrap_or_default()
    }
}

/// DTO for creating a new tool.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTool {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 120))]
    pub slug: String,
    pub description: String,
    pub category: String,
    pub icon: Option<String>,
    pub status: Option<String>,
    #[validate(url)]
    pub webhook_url: String,
    pub fields: Option<serde_json::Value>,
    pub features: Option<serde_json::Value>,
    pub sort_order: Option<i32>,
}

/// DTO for updating an existing tool. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTool {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub status: Option<String>,
    #[validate(url)]
    pub webhook_url: Option<String>,
    pub fields: Option<serde_json::Value>,
    pub features: Option<serde_json::Value>,
    pub sort_order: Option<i32>,
}
