//! Endpoint path templates
//!
//! Backend routes are configured as templates like `/bank/:id` or
//! `/grn/:grn_id/inspection/:id`. Placeholders use the `:name` form and are
//! filled either from explicit values (reads) or by pulling the matching
//! fields out of a mutation body, in which case the consumed fields are
//! removed so they are not sent twice.

use crate::core::error::ConfigError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").unwrap())
}

/// A configured route with optional `:name` placeholders
///
/// Values are inserted verbatim; callers pass ids and other path-safe
/// segments, not arbitrary text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    raw: String,
}

impl EndpointTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        placeholder_regex()
            .captures_iter(&self.raw)
            .map(|caps| caps.get(1).unwrap().as_str())
            .collect()
    }

    pub fn has_placeholders(&self) -> bool {
        placeholder_regex().is_match(&self.raw)
    }

    /// Fill every placeholder from explicit name/value pairs
    pub fn fill(&self, values: &[(&str, &str)]) -> Result<String, ConfigError> {
        let re = placeholder_regex();
        let mut out = String::with_capacity(self.raw.len());
        let mut last = 0;
        for caps in re.captures_iter(&self.raw) {
            let whole = caps.get(0).unwrap();
            let name = caps.get(1).unwrap().as_str();
            let value = values
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
                .ok_or_else(|| ConfigError::MissingPathParam {
                    template: self.raw.clone(),
                    name: name.to_string(),
                })?;
            out.push_str(&self.raw[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }
        out.push_str(&self.raw[last..]);
        Ok(out)
    }

    /// Fill placeholders from a mutation body, removing each consumed field
    ///
    /// `/bank/:id` against `{"id": 42, "bank_name": "..."}` yields `/bank/42`
    /// and leaves the body without `id`. Only strings and numbers can become
    /// path segments; anything else (including `null`) counts as missing.
    pub(crate) fn fill_from_object(
        &self,
        body: &mut serde_json::Map<String, Value>,
    ) -> Result<String, ConfigError> {
        let re = placeholder_regex();
        let mut out = String::with_capacity(self.raw.len());
        let mut last = 0;
        for caps in re.captures_iter(&self.raw) {
            let whole = caps.get(0).unwrap();
            let name = caps.get(1).unwrap().as_str();
            let segment = body
                .remove(name)
                .as_ref()
                .and_then(render_segment)
                .ok_or_else(|| ConfigError::MissingPathParam {
                    template: self.raw.clone(),
                    name: name.to_string(),
                })?;
            out.push_str(&self.raw[last..whole.start()]);
            out.push_str(&segment);
            last = whole.end();
        }
        out.push_str(&self.raw[last..]);
        Ok(out)
    }
}

fn render_segment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholders_in_order() {
        let template = EndpointTemplate::new("/grn/:grn_id/inspection/:id");
        assert_eq!(template.placeholders(), vec!["grn_id", "id"]);
        assert!(template.has_placeholders());
        assert!(!EndpointTemplate::new("/bank").has_placeholders());
    }

    #[test]
    fn test_fill_replaces_every_placeholder() {
        let template = EndpointTemplate::new("/grn/:grn_id/inspection/:id");
        let path = template.fill(&[("grn_id", "7"), ("id", "42")]).unwrap();
        assert_eq!(path, "/grn/7/inspection/42");
    }

    #[test]
    fn test_fill_missing_value_errors() {
        let template = EndpointTemplate::new("/bank/:id");
        let err = template.fill(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPathParam { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_fill_from_object_strips_consumed_fields() {
        let template = EndpointTemplate::new("/customer-contact-manager/:id");
        let mut body = json!({
            "id": 42,
            "first_name": "Nadia",
            "phone": "+31-20-555-0144",
        })
        .as_object()
        .unwrap()
        .clone();

        let path = template.fill_from_object(&mut body).unwrap();
        assert_eq!(path, "/customer-contact-manager/42");
        assert!(body.get("id").is_none());
        assert_eq!(body.get("first_name").unwrap(), "Nadia");
    }

    #[test]
    fn test_fill_from_object_accepts_string_segments() {
        let template = EndpointTemplate::new("/spare/:part_no/stock");
        let mut body = json!({ "part_no": "KX-180" }).as_object().unwrap().clone();
        assert_eq!(
            template.fill_from_object(&mut body).unwrap(),
            "/spare/KX-180/stock"
        );
    }

    #[test]
    fn test_fill_from_object_rejects_null_segment() {
        let template = EndpointTemplate::new("/bank/:id");
        let mut body = json!({ "id": null }).as_object().unwrap().clone();
        let err = template.fill_from_object(&mut body).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPathParam { .. }));
    }

    #[test]
    fn test_template_without_placeholders_passes_through() {
        let template = EndpointTemplate::new("/logistic-request");
        assert_eq!(template.fill(&[]).unwrap(), "/logistic-request");
        let mut body = json!({ "reference_no": "LR-912" })
            .as_object()
            .unwrap()
            .clone();
        assert_eq!(
            template.fill_from_object(&mut body).unwrap(),
            "/logistic-request"
        );
        assert_eq!(body.len(), 1);
    }
}
