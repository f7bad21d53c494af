//! Dynamic form engine: field specifications, compiled validation schemas,
//! and the webhook result-display model.
//!
//! A form is described by a [`FormConfig`] -- an ordered list of
//! [`FieldSpec`]s plus the webhook destination. [`schema::generate_schema`]
//! compiles the field list into a [`schema::FormSchema`] which validates a
//! [`FormValues`] map. The webhook's JSON response is resolved once at the
//! display boundary into a [`result::ResultContent`].

pub mod field;
pub mod result;
pub mod schema;

pub use field::{
    default_values, FieldOption, FieldSpec, FieldType, FieldValue, FormConfig, FormMessages,
    FormValues, ValidationRules,
};
pub use result::ResultContent;
pub use schema::{generate_schema, validate_form_data, FormSchema, ValidationOutcome};
