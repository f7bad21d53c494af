//! Schema generation and validation -- pure logic, no I/O.
//!
//! [`generate_schema`] deterministically compiles a field list into a
//! [`FormSchema`]. Generation is total: malformed configuration (e.g. an
//! unparseable regex) never fails the build -- the offending rule is dropped
//! with a warning, since a config defect must not make user input
//! unvalidatable.

use std::collections::BTreeMap;

use regex::Regex;

use super::field::{CustomValidator, FieldSpec, FieldType, FieldValue, FormValues};

/// Compiled validation rules for one form, in field order.
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

/// Aggregated result of one validation pass.
///
/// `errors` maps field name to a human-readable message -- at most one per
/// field, rebuilt fresh on every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationOutcome {
    fn ok() -> Self {
        Self {
            valid: true,
            errors: BTreeMap::new(),
        }
    }
}

struct FieldRule {
    name: String,
    label: String,
    required: bool,
    kind: RuleKind,
    custom: Option<CustomValidator>,
}

enum RuleKind {
    Text {
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<Regex>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Select {
        allowed: Vec<String>,
    },
    Checkbox,
}

/// Compile a field list into a [`FormSchema`].
pub fn generate_schema(fields: &[FieldSpec]) -> FormSchema {
    let rules = fields.iter().map(compile_field).collect();
    FormSchema { rules }
}

/// Validate a value map against a schema.
///
/// Free-function form of [`FormSchema::safe_validate`], matching the
/// generate/validate pairing callers use.
pub fn validate_form_data(values: &FormValues, schema: &FormSchema) -> ValidationOutcome {
    schema.safe_validate(values)
}

impl FormSchema {
    /// Validate every field, collecting one error per offending field.
    ///
    /// Fields are never short-circuited: a failure in one field does not
    /// suppress checks on the others. Keys in `values` with no matching
    /// field spec are ignored.
    pub fn safe_validate(&self, values: &FormValues) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::ok();
        for rule in &self.rules {
            if let Some(message) = check_field(rule, values.get(&rule.name)) {
                outcome.errors.insert(rule.name.clone(), message);
            }
        }
        outcome.valid = outcome.errors.is_empty();
        outcome
    }

    /// Validate a single field (blur-time check). `None` means the field
    /// is valid or unknown to this schema.
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Option<String> {
        let rule = self.rules.iter().find(|r| r.name == name)?;
        check_field(rule, values.get(name))
    }
}

fn compile_field(spec: &FieldSpec) -> FieldRule {
    let rules = spec.validation.clone().unwrap_or_default();
    let required = rules.required || spec.required;

    let kind = match spec.field_type {
        FieldType::Text | FieldType::Textarea => RuleKind::Text {
            min_length: rules.min_length,
            max_length: rules.max_length,
            pattern: rules.pattern.as_deref().and_then(|p| compile_pattern(spec, p)),
        },
        FieldType::Number => RuleKind::Number {
            min: rules.min,
            max: rules.max,
        },
        FieldType::Select => RuleKind::Select {
            allowed: spec
                .options
                .iter()
                .flatten()
                .map(|o| o.value.clone())
                .collect(),
        },
        FieldType::Checkbox => RuleKind::Checkbox,
    };

    FieldRule {
        name: spec.name.clone(),
        label: spec.label.clone(),
        required,
        kind,
        custom: rules.custom,
    }
}

/// Compile a configured pattern, anchored to match the full string.
fn compile_pattern(spec: &FieldSpec, pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(field = %spec.name, pattern, error = %e, "Dropping unparseable pattern rule");
            None
        }
    }
}

/// Evaluate one field's rule chain, returning the first violation message.
fn check_field(rule: &FieldRule, value: Option<&FieldValue>) -> Option<String> {
    let message = match &rule.kind {
        RuleKind::Text {
            min_length,
            max_length,
            pattern,
        } => check_text(rule, value, *min_length, *max_length, pattern.as_ref()),
        RuleKind::Number { min, max } => check_number(rule, value, *min, *max),
        RuleKind::Select { allowed } => check_select(rule, value, allowed),
        RuleKind::Checkbox => None,
    };
    if message.is_some() {
        return message;
    }
    check_custom(rule, value)
}

fn check_text(
    rule: &FieldRule,
    value: Option<&FieldValue>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<&Regex>,
) -> Option<String> {
    let text = value.map(FieldValue::as_text);
    let text = text.as_deref().unwrap_or("");

    if text.is_empty() {
        // Absent/empty is valid for optional fields; "required" and
        // "optional" are mutually exclusive terminal modifiers.
        if !rule.required {
            return None;
        }
        return Some(match min_length {
            Some(min) => min_length_message(&rule.label, min),
            None => required_message(&rule.label),
        });
    }

    let char_count = text.chars().count();
    if let Some(min) = min_length {
        if char_count < min {
            return Some(min_length_message(&rule.label, min));
        }
    }
    if let Some(max) = max_length {
        if char_count > max {
            return Some(format!(
                "{} must be no more than {max} characters",
                rule.label
            ));
        }
    }
    if let Some(re) = pattern {
        if !re.is_match(text) {
            return Some(format!("{} format is invalid", rule.label));
        }
    }
    None
}

fn check_number(
    rule: &FieldRule,
    value: Option<&FieldValue>,
    min: Option<f64>,
    max: Option<f64>,
) -> Option<String> {
    let value = match value {
        None => {
            return rule.required.then(|| required_message(&rule.label));
        }
        Some(v) if v.is_empty() => {
            return rule.required.then(|| required_message(&rule.label));
        }
        Some(v) => v,
    };

    // Coercion runs before any other rule.
    let Some(n) = value.as_number() else {
        return Some(format!("{} must be a number", rule.label));
    };

    if let Some(min) = min {
        if n < min {
            return Some(format!("{} must be at least {min}", rule.label));
        }
    }
    if let Some(max) = max {
        if n > max {
            return Some(format!("{} must be no more than {max}", rule.label));
        }
    }
    None
}

fn check_select(rule: &FieldRule, value: Option<&FieldValue>, allowed: &[String]) -> Option<String> {
    let value = match value {
        None => {
            return rule.required.then(|| required_message(&rule.label));
        }
        Some(v) if v.is_empty() => {
            return rule.required.then(|| required_message(&rule.label));
        }
        Some(v) => v,
    };

    // Closed enumeration: unknown values are rejected, not coerced.
    let text = value.as_text();
    if allowed.iter().any(|a| a == text.as_ref()) {
        None
    } else {
        Some(format!(
            "{} must be one of the available options",
            rule.label
        ))
    }
}

fn check_custom(rule: &FieldRule, value: Option<&FieldValue>) -> Option<String> {
    let custom = rule.custom.as_ref()?;
    // A checkbox absent from the map is an unchecked checkbox.
    let fallback = FieldValue::Bool(false);
    let value = match value {
        Some(v) => v,
        None if matches!(rule.kind, RuleKind::Checkbox) => &fallback,
        None => return None,
    };
    if custom(value) {
        None
    } else {
        Some(format!("{} is invalid", rule.label))
    }
}

fn required_message(label: &str) -> String {
    format!("{label} is required")
}

fn min_length_message(label: &str, min: usize) -> String {
    format!("{label} must be at least {min} characters")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::field::{FieldOption, ValidationRules};
    use std::sync::Arc;

    fn field(name: &str, field_type: FieldType, rules: ValidationRules) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            label: name.to_string(),
            field_type,
            placeholder: None,
            required: false,
            validation: Some(rules),
            options: None,
        }
    }

    fn text_value(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn values(pairs: &[(&str, FieldValue)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn required_text_fails_missing_field() {
        let schema = generate_schema(&[field(
            "idea",
            FieldType::Text,
            ValidationRules::required_only(true),
        )]);
        let outcome = schema.safe_validate(&FormValues::new());
        assert!(!outcome.valid);
        assert_eq!(outcome.errors["idea"], "idea is required");
    }

    #[test]
    fn required_text_fails_empty_string() {
        let schema = generate_schema(&[field(
            "idea",
            FieldType::Text,
            ValidationRules::required_only(true),
        )]);
        let outcome = schema.safe_validate(&values(&[("idea", text_value(""))]));
        assert!(!outcome.valid);
        assert_eq!(outcome.errors["idea"], "idea is required");
    }

    #[test]
    fn optional_text_passes_when_absent_or_empty() {
        let schema = generate_schema(&[field(
            "notes",
            FieldType::Text,
            ValidationRules {
                min_length: Some(5),
                ..Default::default()
            },
        )]);
        assert!(schema.safe_validate(&FormValues::new()).valid);
        assert!(schema.safe_validate(&values(&[("notes", text_value(""))])).valid);
    }

    #[test]
    fn min_length_message_wins_over_required() {
        let schema = generate_schema(&[field(
            "bio",
            FieldType::Textarea,
            ValidationRules {
                required: true,
                min_length: Some(10),
                ..Default::default()
            },
        )]);
        let outcome = schema.safe_validate(&values(&[("bio", text_value(""))]));
        assert_eq!(outcome.errors["bio"], "bio must be at least 10 characters");

        let outcome = schema.safe_validate(&values(&[("bio", text_value("short"))]));
        assert_eq!(outcome.errors["bio"], "bio must be at least 10 characters");
    }

    #[test]
    fn max_length_enforced() {
        let schema = generate_schema(&[field(
            "title",
            FieldType::Text,
            ValidationRules {
                max_length: Some(3),
                ..Default::default()
            },
        )]);
        let outcome = schema.safe_validate(&values(&[("title", text_value("hello"))]));
        assert_eq!(
            outcome.errors["title"],
            "title must be no more than 3 characters"
        );
    }

    #[test]
    fn pattern_requires_full_string_match() {
        let schema = generate_schema(&[field(
            "code",
            FieldType::Text,
            ValidationRules {
                pattern: Some("[a-z]+".to_string()),
                ..Default::default()
            },
        )]);
        assert!(schema.safe_validate(&values(&[("code", text_value("abc"))])).valid);

        let outcome = schema.safe_validate(&values(&[("code", text_value("abc123"))]));
        assert_eq!(outcome.errors["code"], "code format is invalid");
    }

    #[test]
    fn unparseable_pattern_is_dropped_not_fatal() {
        let schema = generate_schema(&[field(
            "code",
            FieldType::Text,
            ValidationRules {
                pattern: Some("([unclosed".to_string()),
                ..Default::default()
            },
        )]);
        // Generation stayed total and the value passes the remaining rules.
        assert!(schema.safe_validate(&values(&[("code", text_value("anything"))])).valid);
    }

    #[test]
    fn number_bounds() {
        let schema = generate_schema(&[field(
            "age",
            FieldType::Number,
            ValidationRules {
                min: Some(18.0),
                max: Some(100.0),
                ..Default::default()
            },
        )]);

        let outcome = schema.safe_validate(&values(&[("age", FieldValue::Number(10.0))]));
        assert_eq!(outcome.errors["age"], "age must be at least 18");

        let outcome = schema.safe_validate(&values(&[("age", FieldValue::Number(150.0))]));
        assert_eq!(outcome.errors["age"], "age must be no more than 100");

        assert!(schema.safe_validate(&values(&[("age", FieldValue::Number(25.0))])).valid);
    }

    #[test]
    fn number_coerces_from_string_before_bounds() {
        let schema = generate_schema(&[field(
            "age",
            FieldType::Number,
            ValidationRules {
                min: Some(18.0),
                ..Default::default()
            },
        )]);
        assert!(schema.safe_validate(&values(&[("age", text_value("21"))])).valid);

        let outcome = schema.safe_validate(&values(&[("age", text_value("ten"))]));
        assert_eq!(outcome.errors["age"], "age must be a number");
    }

    #[test]
    fn optional_number_passes_when_empty() {
        let schema = generate_schema(&[field(
            "age",
            FieldType::Number,
            ValidationRules {
                min: Some(18.0),
                ..Default::default()
            },
        )]);
        assert!(schema.safe_validate(&values(&[("age", text_value(""))])).valid);
    }

    #[test]
    fn select_rejects_unknown_value() {
        let mut spec = field("kind", FieldType::Select, ValidationRules::required_only(true));
        spec.options = Some(vec![FieldOption {
            label: "Content".to_string(),
            value: "content".to_string(),
        }]);
        let schema = generate_schema(&[spec]);

        assert!(schema.safe_validate(&values(&[("kind", text_value("content"))])).valid);

        let outcome = schema.safe_validate(&values(&[("kind", text_value("unknown"))]));
        assert_eq!(
            outcome.errors["kind"],
            "kind must be one of the available options"
        );
    }

    #[test]
    fn required_checkbox_is_a_no_op() {
        let schema = generate_schema(&[field(
            "agree",
            FieldType::Checkbox,
            ValidationRules::required_only(true),
        )]);
        // Both values are valid, as is absence (treated as unchecked).
        assert!(schema.safe_validate(&values(&[("agree", FieldValue::Bool(false))])).valid);
        assert!(schema.safe_validate(&values(&[("agree", FieldValue::Bool(true))])).valid);
        assert!(schema.safe_validate(&FormValues::new()).valid);
    }

    #[test]
    fn checkbox_custom_validator_applies() {
        let schema = generate_schema(&[field(
            "agree",
            FieldType::Checkbox,
            ValidationRules {
                custom: Some(Arc::new(|v| *v == FieldValue::Bool(true))),
                ..Default::default()
            },
        )]);
        assert!(schema.safe_validate(&values(&[("agree", FieldValue::Bool(true))])).valid);

        let outcome = schema.safe_validate(&values(&[("agree", FieldValue::Bool(false))]));
        assert_eq!(outcome.errors["agree"], "agree is invalid");
    }

    #[test]
    fn errors_are_collected_across_fields_not_short_circuited() {
        let schema = generate_schema(&[
            field("a", FieldType::Text, ValidationRules::required_only(true)),
            field("b", FieldType::Text, ValidationRules::required_only(true)),
        ]);
        let outcome = schema.safe_validate(&FormValues::new());
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors.contains_key("a"));
        assert!(outcome.errors.contains_key("b"));
    }

    #[test]
    fn mutating_one_field_only_flags_that_field() {
        let fields = vec![
            field("idea", FieldType::Text, ValidationRules::required_only(true)),
            field(
                "age",
                FieldType::Number,
                ValidationRules {
                    required: true,
                    min: Some(18.0),
                    max: Some(100.0),
                    ..Default::default()
                },
            ),
        ];
        let schema = generate_schema(&fields);

        let good = values(&[
            ("idea", text_value("sell snow")),
            ("age", FieldValue::Number(25.0)),
        ]);
        assert!(schema.safe_validate(&good).valid);

        let mut bad = good.clone();
        bad.insert("age".to_string(), FieldValue::Number(150.0));
        let outcome = schema.safe_validate(&bad);
        assert!(!outcome.valid);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors.contains_key("age"));
        assert!(!outcome.errors.contains_key("idea"));
    }

    #[test]
    fn validate_field_checks_one_field_only() {
        let schema = generate_schema(&[
            field("idea", FieldType::Text, ValidationRules::required_only(true)),
            field("notes", FieldType::Text, ValidationRules::required_only(true)),
        ]);
        let vals = values(&[("idea", text_value(""))]);

        assert_eq!(
            schema.validate_field("idea", &vals),
            Some("idea is required".to_string())
        );
        assert_eq!(schema.validate_field("unknown", &vals), None);
    }

    #[test]
    fn top_level_required_flag_is_honored() {
        // Tool records set `required` on the field, not inside `validation`.
        let mut spec = field("idea", FieldType::Text, ValidationRules::default());
        spec.required = true;
        let schema = generate_schema(&[spec]);

        let outcome = schema.safe_validate(&FormValues::new());
        assert_eq!(outcome.errors["idea"], "idea is required");
    }
}
