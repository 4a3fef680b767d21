//! Response envelopes shared by every resource family
//!
//! Reads come back as `{status, data, current_page, total, total_pages}`
//! (lists) or `{status, data}` (details); mutations acknowledge with
//! `{status, message, id?}`. The splitting helpers here check the envelope
//! itself and hand the `data` payload on for per-resource schema validation,
//! reporting envelope problems in the same path/expected/received shape as
//! field-level violations.

use crate::core::error::SchemaIssue;
use crate::core::schema::json_type_name;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a list read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> ListPage<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }
}

/// Acknowledgement returned by create and update endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    /// Id of the created or updated record, when the backend reports one
    pub id: Option<i64>,
    pub message: String,
}

// =============================================================================
// Raw envelope splitting
// =============================================================================

#[derive(Debug)]
pub(crate) struct RawListEnvelope<'a> {
    pub status: bool,
    pub items: &'a [Value],
    pub current_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub message: Option<&'a str>,
}

#[derive(Debug)]
pub(crate) struct RawDetailEnvelope<'a> {
    pub status: bool,
    pub data: &'a Value,
    pub message: Option<&'a str>,
}

#[derive(Debug)]
pub(crate) struct RawMutationEnvelope {
    pub status: bool,
    pub outcome: MutationOutcome,
}

/// Split a list response into envelope parts, checking the envelope shape
///
/// A parsed `status: false` short-circuits the shape checks: rejection
/// envelopes routinely omit `data` and the pagination counters, and the
/// rejection itself is the answer.
pub(crate) fn split_list(value: &Value) -> Result<RawListEnvelope<'_>, Vec<SchemaIssue>> {
    let Some(object) = value.as_object() else {
        return Err(vec![envelope_root_issue(value)]);
    };

    let mut issues = Vec::new();
    let status = take_bool(object, "status", &mut issues);
    if status == Some(false) {
        return Ok(RawListEnvelope {
            status: false,
            items: &[],
            current_page: 0,
            total: 0,
            total_pages: 0,
            message: object.get("message").and_then(Value::as_str),
        });
    }
    let items = match object.get("data") {
        Some(Value::Array(items)) => Some(items.as_slice()),
        Some(other) => {
            issues.push(SchemaIssue::new("data", "array", json_type_name(other)));
            None
        }
        None => {
            issues.push(SchemaIssue::new("data", "array", "missing"));
            None
        }
    };
    let current_page = take_integer(object, "current_page", &mut issues);
    let total = take_integer(object, "total", &mut issues);
    let total_pages = take_integer(object, "total_pages", &mut issues);

    if !issues.is_empty() {
        return Err(issues);
    }
    Ok(RawListEnvelope {
        status: status.unwrap_or_default(),
        items: items.unwrap_or_default(),
        current_page: current_page.unwrap_or_default(),
        total: total.unwrap_or_default(),
        total_pages: total_pages.unwrap_or_default(),
        message: object.get("message").and_then(Value::as_str),
    })
}

/// Split a detail response into envelope parts, checking the envelope shape
///
/// As with lists, a parsed `status: false` wins over any missing `data`.
pub(crate) fn split_detail(value: &Value) -> Result<RawDetailEnvelope<'_>, Vec<SchemaIssue>> {
    let Some(object) = value.as_object() else {
        return Err(vec![envelope_root_issue(value)]);
    };

    let mut issues = Vec::new();
    let status = take_bool(object, "status", &mut issues);
    if status == Some(false) {
        return Ok(RawDetailEnvelope {
            status: false,
            data: &Value::Null,
            message: object.get("message").and_then(Value::as_str),
        });
    }
    let data = match object.get("data") {
        Some(data @ Value::Object(_)) => Some(data),
        Some(other) => {
            issues.push(SchemaIssue::new("data", "object", json_type_name(other)));
            None
        }
        None => {
            issues.push(SchemaIssue::new("data", "object", "missing"));
            None
        }
    };

    if !issues.is_empty() {
        return Err(issues);
    }
    Ok(RawDetailEnvelope {
        status: status.unwrap_or_default(),
        data: data.unwrap_or(&Value::Null),
        message: object.get("message").and_then(Value::as_str),
    })
}

/// Split a mutation acknowledgement, checking the envelope shape
///
/// `status: false` tolerates a missing `message`; the caller substitutes a
/// fallback when the backend rejects without saying why.
pub(crate) fn split_mutation(value: &Value) -> Result<RawMutationEnvelope, Vec<SchemaIssue>> {
    let Some(object) = value.as_object() else {
        return Err(vec![envelope_root_issue(value)]);
    };

    let mut issues = Vec::new();
    let status = take_bool(object, "status", &mut issues);
    if status == Some(false) {
        return Ok(RawMutationEnvelope {
            status: false,
            outcome: MutationOutcome {
                id: None,
                message: object
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
        });
    }
    let message = match object.get("message") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.push(SchemaIssue::new("message", "string", json_type_name(other)));
            None
        }
        None => {
            issues.push(SchemaIssue::new("message", "string", "missing"));
            None
        }
    };
    let id = match object.get("id") {
        None | Some(Value::Null) => None,
        Some(v) => match v.as_i64() {
            Some(id) => Some(id),
            None => {
                issues.push(SchemaIssue::new("id", "integer", json_type_name(v)));
                None
            }
        },
    };

    if !issues.is_empty() {
        return Err(issues);
    }
    Ok(RawMutationEnvelope {
        status: status.unwrap_or_default(),
        outcome: MutationOutcome {
            id,
            message: message.unwrap_or_default(),
        },
    })
}

fn envelope_root_issue(value: &Value) -> SchemaIssue {
    SchemaIssue::new("", "object (response envelope)", json_type_name(value))
}

fn take_bool(
    object: &serde_json::Map<String, Value>,
    key: &str,
    issues: &mut Vec<SchemaIssue>,
) -> Option<bool> {
    match object.get(key) {
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            issues.push(SchemaIssue::new(key, "boolean", json_type_name(other)));
            None
        }
        None => {
            issues.push(SchemaIssue::new(key, "boolean", "missing"));
            None
        }
    }
}

fn take_integer(
    object: &serde_json::Map<String, Value>,
    key: &str,
    issues: &mut Vec<SchemaIssue>,
) -> Option<u64> {
    match object.get(key) {
        Some(v) if v.as_u64().is_some() => v.as_u64(),
        Some(other) => {
            issues.push(SchemaIssue::new(key, "integer", json_type_name(other)));
            None
        }
        None => {
            issues.push(SchemaIssue::new(key, "integer", "missing"));
            None
        }
    }
}
