//! Declarative response schemas
//!
//! Every resource declares the shape its payload is supposed to have. A
//! [`Schema`] walks a decoded `serde_json::Value` and reports every field
//! that deviates as a [`SchemaIssue`] with a dotted path, the expected kind
//! and what was actually received. Validation never stops at the first
//! problem: a backend contract drift should surface as one complete report.

use crate::core::error::SchemaIssue;
use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Pointer to a lazily-initialized schema, used for nested objects
pub type SchemaRef = fn() -> &'static Schema;

/// The kind of value a field is declared to hold
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    /// ISO calendar date, `YYYY-MM-DD`
    Date,
    /// RFC 3339 timestamp
    DateTime,
    /// Homogeneous array of the inner kind
    Array(Box<FieldKind>),
    /// Nested object validated against another schema
    Object(SchemaRef),
    /// Accepted as-is, never validated
    Any,
}

impl FieldKind {
    /// Human-readable name used in the `expected` half of an issue
    pub fn expected_name(&self) -> String {
        match self {
            FieldKind::String => "string".to_string(),
            FieldKind::Integer => "integer".to_string(),
            FieldKind::Float => "number".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Date => "date (YYYY-MM-DD)".to_string(),
            FieldKind::DateTime => "datetime (RFC 3339)".to_string(),
            FieldKind::Array(inner) => format!("array of {}", inner.expected_name()),
            FieldKind::Object(schema) => format!("object ({})", schema().label()),
            FieldKind::Any => "any".to_string(),
        }
    }
}

/// One declared field of a schema
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Whether the key must be present
    pub required: bool,
    /// Whether an explicit `null` is acceptable
    pub nullable: bool,
}

/// Declared shape of one resource payload
///
/// Built once per resource through the builder methods and stored in a
/// `OnceLock`, so validation works against `&'static Schema` everywhere.
///
/// # Example
///
/// ```rust,ignore
/// static SCHEMA: OnceLock<Schema> = OnceLock::new();
/// SCHEMA.get_or_init(|| {
///     Schema::object("bank")
///         .field("id", FieldKind::Integer)
///         .field("beneficiary_name", FieldKind::String)
///         .nullable("swift_code", FieldKind::String)
/// });
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    label: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Start an object schema with the given label
    pub fn object(label: &'static str) -> Self {
        Self {
            label,
            fields: Vec::new(),
        }
    }

    /// Required, non-null field
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: true,
            nullable: false,
        });
        self
    }

    /// Required field whose value may be an explicit `null`
    pub fn nullable(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: true,
            nullable: true,
        });
        self
    }

    /// Field that may be absent entirely (and null when present)
    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: false,
            nullable: true,
        });
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validate a payload against this schema, collecting every issue
    pub fn validate(&self, value: &Value) -> Result<(), Vec<SchemaIssue>> {
        self.validate_at("", value)
    }

    /// Validate with paths rooted at `path` (e.g. `data` or `data[3]`)
    pub fn validate_at(&self, path: &str, value: &Value) -> Result<(), Vec<SchemaIssue>> {
        let mut issues = Vec::new();
        self.check_object(path, value, &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    fn check_object(&self, path: &str, value: &Value, issues: &mut Vec<SchemaIssue>) {
        let Some(object) = value.as_object() else {
            issues.push(SchemaIssue::new(
                path,
                format!("object ({})", self.label),
                json_type_name(value),
            ));
            return;
        };

        // Unknown extra keys are tolerated; backends grow fields freely.
        for spec in &self.fields {
            let field_path = join_path(path, spec.name);
            match object.get(spec.name) {
                None => {
                    if spec.required {
                        issues.push(SchemaIssue::new(
                            field_path,
                            spec.kind.expected_name(),
                            "missing",
                        ));
                    }
                }
                Some(Value::Null) => {
                    if !spec.nullable {
                        issues.push(SchemaIssue::new(
                            field_path,
                            spec.kind.expected_name(),
                            "null",
                        ));
                    }
                }
                Some(found) => check_kind(&spec.kind, &field_path, found, issues),
            }
        }
    }
}

fn check_kind(kind: &FieldKind, path: &str, value: &Value, issues: &mut Vec<SchemaIssue>) {
    match kind {
        FieldKind::Any => {}
        FieldKind::String => {
            if !value.is_string() {
                issues.push(SchemaIssue::new(
                    path,
                    kind.expected_name(),
                    json_type_name(value),
                ));
            }
        }
        FieldKind::Integer => {
            if value.as_i64().is_none() && value.as_u64().is_none() {
                issues.push(SchemaIssue::new(
                    path,
                    kind.expected_name(),
                    json_type_name(value),
                ));
            }
        }
        FieldKind::Float => {
            if !value.is_number() {
                issues.push(SchemaIssue::new(
                    path,
                    kind.expected_name(),
                    json_type_name(value),
                ));
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                issues.push(SchemaIssue::new(
                    path,
                    kind.expected_name(),
                    json_type_name(value),
                ));
            }
        }
        FieldKind::Date => match value.as_str() {
            Some(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => {}
            Some(s) => {
                issues.push(SchemaIssue::new(
                    path,
                    kind.expected_name(),
                    format!("string \"{}\"", s),
                ));
            }
            None => {
                issues.push(SchemaIssue::new(
                    path,
                    kind.expected_name(),
                    json_type_name(value),
                ));
            }
        },
        FieldKind::DateTime => match value.as_str() {
            Some(s) if DateTime::parse_from_rfc3339(s).is_ok() => {}
            Some(s) => {
                issues.push(SchemaIssue::new(
                    path,
                    kind.expected_name(),
                    format!("string \"{}\"", s),
                ));
            }
            None => {
                issues.push(SchemaIssue::new(
                    path,
                    kind.expected_name(),
                    json_type_name(value),
                ));
            }
        },
        FieldKind::Array(inner) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_kind(inner, &format!("{}[{}]", path, i), item, issues);
                }
            }
            None => {
                issues.push(SchemaIssue::new(
                    path,
                    kind.expected_name(),
                    json_type_name(value),
                ));
            }
        },
        FieldKind::Object(schema) => {
            schema().check_object(path, value, issues);
        }
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

/// JSON type name as reported in the `received` half of an issue
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
