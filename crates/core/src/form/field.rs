//! Field specification types and the typed value model.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// The closed set of renderable input kinds.
///
/// Each variant selects both a rendering strategy and a value-coercion rule:
/// `Checkbox` carries a boolean, `Number` a parsed float, everything else a
/// raw string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Select,
    Checkbox,
}

/// One choice in a `select` field, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

/// Caller-supplied predicate applied after the built-in rules.
pub type CustomValidator = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;

/// Declarative validation rule set for one field.
///
/// Numeric bounds (`min`/`max`) are only meaningful for `Number` fields,
/// length bounds and `pattern` only for string-typed fields. Invalid
/// configuration (e.g. `min > max`, a malformed `pattern`) is a defect of
/// the config owner and is not rejected here.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
    /// Opaque predicate; not serializable, supplied only by hand-built configs.
    #[serde(skip)]
    pub custom: Option<CustomValidator>,
}

impl fmt::Debug for ValidationRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRules")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("pattern", &self.pattern)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl ValidationRules {
    /// Rules that only mark the field required, as synthesized from a Tool
    /// record (richer rules come from hand-built configs only).
    pub fn required_only(required: bool) -> Self {
        Self {
            required,
            ..Self::default()
        }
    }
}

/// Declarative description of one input within a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Unique key within the form; used verbatim as the payload key.
    pub name: String,
    /// Display text, also interpolated into validation messages.
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    /// Present iff `field_type == Select`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

/// Override strings for the form's idle/error display states.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormMessages {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Aggregate configuration for one dynamic form.
///
/// Constructed once per form instance and immutable for its lifetime;
/// changes to the backing Tool record are not reflected until a new
/// config is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Ordered field list; order is render order.
    pub fields: Vec<FieldSpec>,
    /// Absolute URL the payload is POSTed to.
    pub webhook_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_title: Option<String>,
    /// Correlation identifiers for history persistence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<FormMessages>,
}

/// A single field's semantic value.
///
/// Serialized untagged so the wire payload is the raw name→value map the
/// webhook expects (no envelope, no type tags).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// String view of the value; numbers and booleans are rendered.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Bool(b) => Cow::Owned(b.to_string()),
        }
    }

    /// Numeric view: a number as-is, or a string that parses as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }

    /// True for the empty string; numbers and booleans are never empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

/// Mapping from field name to its current value for one form instance.
pub type FormValues = BTreeMap<String, FieldValue>;

/// Build the initial value map for a field list: `""` for every field
/// except checkboxes, which default to `false`.
pub fn default_values(fields: &[FieldSpec]) -> FormValues {
    fields
        .iter()
        .map(|f| {
            let value = match f.field_type {
                FieldType::Checkbox => FieldValue::Bool(false),
                _ => FieldValue::Text(String::new()),
            };
            (f.name.clone(), value)
        })
        .collect()
}
