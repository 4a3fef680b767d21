//! Query parameter taxonomy and serialization
//!
//! List endpoints accept three shapes of parameter:
//!
//! - **flat** pairs (`page=2`, `customer_id=7`)
//! - **search** pairs, emitted in bracket notation (`search[vessel_name]=Aurora`)
//! - **array** pairs, emitted comma-joined under a single key (`status_ids=1,4,9`)
//!
//! [`QueryParams`] keeps the three groups explicit instead of sniffing them
//! out of an untyped bag, and serializes them canonically: keys are sorted
//! within each group, groups are emitted flat, then search, then arrays.
//! Because serialization is deterministic, the serialized string doubles as
//! the cache identity for a read (see [`crate::cache`]).
//!
//! Null-ish values never reach the wire: empty strings and empty arrays are
//! omitted entirely, so `search[vessel_name]=` style noise cannot occur.

use std::collections::BTreeMap;
use url::form_urlencoded;

/// A single query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    fn render(&self) -> String {
        match self {
            ParamValue::Str(s) => s.clone(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(x) => x.to_string(),
            ParamValue::Bool(b) => b.to_string(),
        }
    }

    /// Empty strings count as "not provided"
    fn is_blank(&self) -> bool {
        matches!(self, ParamValue::Str(s) if s.is_empty())
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(i: u32) -> Self {
        ParamValue::Int(i as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// Parameters for a list read, grouped by wire shape
///
/// # Example
///
/// ```rust,ignore
/// let params = QueryParams::new()
///     .page(2)
///     .per_page(25)
///     .flat("customer_id", 7)
///     .search("vessel_name", "Aurora")
///     .array("status_ids", [1, 4, 9]);
///
/// assert_eq!(
///     params.to_query_string(),
///     "customer_id=7&page=2&per_page=25&search%5Bvessel_name%5D=Aurora&status_ids=1%2C4%2C9"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    flat: BTreeMap<String, ParamValue>,
    search: BTreeMap<String, ParamValue>,
    arrays: BTreeMap<String, Vec<ParamValue>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flat key/value pair
    pub fn flat(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.flat.insert(key.into(), value.into());
        self
    }

    /// Add a search criterion, serialized as `search[key]=value`
    pub fn search(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.search.insert(key.into(), value.into());
        self
    }

    /// Add an array-valued key, serialized comma-joined under one key
    pub fn array<V>(mut self, key: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<ParamValue>,
    {
        self.arrays
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Shorthand for the `page` flat parameter
    pub fn page(self, page: u32) -> Self {
        self.flat("page", page)
    }

    /// Shorthand for the `per_page` flat parameter
    pub fn per_page(self, per_page: u32) -> Self {
        self.flat("per_page", per_page)
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.search.is_empty() && self.arrays.is_empty()
    }

    /// Remove a flat key, if present
    pub fn remove_flat(&mut self, key: &str) -> Option<ParamValue> {
        self.flat.remove(key)
    }

    /// Serialize to a canonical percent-encoded query string (no leading `?`)
    ///
    /// Two parameter sets that compare equal always serialize identically;
    /// the result is what keys the read cache.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        for (key, value) in &self.flat {
            if value.is_blank() {
                continue;
            }
            serializer.append_pair(key, &value.render());
        }

        for (key, value) in &self.search {
            if value.is_blank() {
                continue;
            }
            serializer.append_pair(&format!("search[{}]", key), &value.render());
        }

        for (key, values) in &self.arrays {
            let rendered: Vec<String> = values
                .iter()
                .filter(|v| !v.is_blank())
                .map(ParamValue::render)
                .collect();
            if rendered.is_empty() {
                continue;
            }
            serializer.append_pair(key, &rendered.join(","));
        }

        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decode a query string back into pairs for assertion
    fn decode(qs: &str) -> Vec<(String, String)> {
        form_urlencoded::parse(qs.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_flat_pairs() {
        let qs = QueryParams::new()
            .flat("customer_id", 7)
            .page(2)
            .to_query_string();
        assert_eq!(decode(&qs), vec![
            ("customer_id".to_string(), "7".to_string()),
            ("page".to_string(), "2".to_string()),
        ]);
    }

    #[test]
    fn test_search_uses_bracket_notation() {
        let qs = QueryParams::new()
            .search("vessel_name", "Aurora")
            .to_query_string();
        assert_eq!(decode(&qs), vec![(
            "search[vessel_name]".to_string(),
            "Aurora".to_string(),
        )]);
        // brackets are percent-encoded on the wire
        assert!(qs.contains("search%5Bvessel_name%5D=Aurora"));
    }

    #[test]
    fn test_arrays_join_with_commas() {
        let qs = QueryParams::new()
            .array("status_ids", [1, 4, 9])
            .to_query_string();
        assert_eq!(decode(&qs), vec![(
            "status_ids".to_string(),
            "1,4,9".to_string(),
        )]);
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let qs = QueryParams::new()
            .flat("customer_id", 7)
            .flat("remark", "")
            .search("vessel_name", "")
            .array("status_ids", Vec::<i64>::new())
            .to_query_string();
        assert_eq!(decode(&qs), vec![(
            "customer_id".to_string(),
            "7".to_string(),
        )]);
    }

    #[test]
    fn test_blank_array_elements_are_dropped() {
        let qs = QueryParams::new()
            .array("tags", ["engine", "", "deck"])
            .to_query_string();
        assert_eq!(decode(&qs), vec![(
            "tags".to_string(),
            "engine,deck".to_string(),
        )]);
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let qs = QueryParams::new()
            .search("maker", "Bolt & Nut Co")
            .to_query_string();
        assert!(qs.contains("Bolt+%26+Nut+Co") || qs.contains("Bolt%20%26%20Nut%20Co"));
        assert_eq!(decode(&qs)[0].1, "Bolt & Nut Co");
    }

    #[test]
    fn test_serialization_is_canonical() {
        // Same pairs, inserted in a different order
        let a = QueryParams::new()
            .flat("per_page", 25)
            .search("part_no", "KX-180")
            .flat("page", 1)
            .array("status_ids", [4, 1]);
        let b = QueryParams::new()
            .array("status_ids", [4, 1])
            .flat("page", 1)
            .flat("per_page", 25)
            .search("part_no", "KX-180");
        assert_eq!(a.to_query_string(), b.to_query_string());
    }

    #[test]
    fn test_groups_emit_in_fixed_order() {
        let qs = QueryParams::new()
            .array("a_ids", [1])
            .search("a_name", "x")
            .flat("z_flag", true)
            .to_query_string();
        let keys: Vec<String> = decode(&qs).into_iter().map(|(k, _)| k).collect();
        // flat before search before arrays, regardless of key spelling
        assert_eq!(keys, vec!["z_flag", "search[a_name]", "a_ids"]);
    }

    #[test]
    fn test_bool_and_float_rendering() {
        let qs = QueryParams::new()
            .flat("include_closed", true)
            .flat("min_weight", 2.5)
            .to_query_string();
        assert_eq!(decode(&qs), vec![
            ("include_closed".to_string(), "true".to_string()),
            ("min_weight".to_string(), "2.5".to_string()),
        ]);
    }

    #[test]
    fn test_empty_params_serialize_to_empty_string() {
        assert_eq!(QueryParams::new().to_query_string(), "");
        assert!(QueryParams::new().is_empty());
    }

    #[test]
    fn test_repeated_key_last_write_wins() {
        let qs = QueryParams::new()
            .flat("page", 1)
            .flat("page", 3)
            .to_query_string();
        assert_eq!(decode(&qs), vec![("page".to_string(), "3".to_string())]);
    }
}
