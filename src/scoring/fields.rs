//! Defensive field access over untyped post documents
//!
//! Generator output is never validated before scoring, so every lookup
//! substitutes an empty default when the field is missing, null, or of the
//! wrong type.

use serde_json::{Map, Value};
use std::sync::OnceLock;

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

/// Read-only view over a JSON value with get-or-default accessors
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Wrap a value; anything but an object reads as empty
    pub fn of(value: &'a Value) -> Self {
        Self {
            map: value.as_object().unwrap_or_else(|| empty_map()),
        }
    }

    pub fn empty() -> Self {
        Self { map: empty_map() }
    }

    /// Raw value, if present
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    /// Nested object, or an empty view
    pub fn obj(&self, key: &str) -> Fields<'a> {
        self.map.get(key).map(Fields::of).unwrap_or_else(Fields::empty)
    }

    /// First key holding an object, or an empty view
    pub fn obj_any(&self, keys: &[&str]) -> Fields<'a> {
        keys.iter()
            .find_map(|k| self.map.get(*k).filter(|v| v.is_object()))
            .map(Fields::of)
            .unwrap_or_else(Fields::empty)
    }

    /// Array items, or an empty slice
    pub fn list(&self, key: &str) -> &'a [Value] {
        match self.map.get(key) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// String value, or ""
    pub fn text(&self, key: &str) -> &'a str {
        self.map.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// First non-empty string among `keys`, or ""
    pub fn text_any(&self, keys: &[&str]) -> &'a str {
        keys.iter()
            .map(|k| self.text(k))
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }

    /// Truthiness of the field (missing reads as false)
    pub fn truthy(&self, key: &str) -> bool {
        self.map.get(key).is_some_and(truthy)
    }

    /// Strict boolean `true`
    pub fn is_true(&self, key: &str) -> bool {
        matches!(self.map.get(key), Some(Value::Bool(true)))
    }
}

/// JSON truthiness: null, false, 0, "", [] and {} are falsy
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Non-empty string entries of a list, skipping anything else
pub fn strings(items: &[Value]) -> impl Iterator<Item = &str> {
    items
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_and_mistyped_fields_default() {
        let doc = json!({"content": "not an object", "tags": {"a": 1}});
        let f = Fields::of(&doc);
        assert!(f.obj("content").raw("title").is_none());
        assert!(f.list("tags").is_empty());
        assert_eq!(f.text("missing"), "");
        assert!(!f.truthy("missing"));
    }

    #[test]
    fn test_non_object_root_is_empty() {
        let doc = json!([1, 2, 3]);
        assert!(Fields::of(&doc).raw("content").is_none());
        let null = Value::Null;
        assert!(Fields::of(&null).list("x").is_empty());
    }

    fn title_of(doc: &Value) -> &str {
        Fields::of(doc).obj("content").text("title")
    }

    #[test]
    fn test_view_borrows_from_local_document() {
        let doc = json!({"content": {"title": "Local"}});
        assert_eq!(title_of(&doc), "Local");
        let other = json!(7);
        assert_eq!(title_of(&other), "");
    }

    #[test]
    fn test_truthiness() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!([])));
        assert!(!truthy(&json!({})));
        assert!(truthy(&json!("x")));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!([0])));
    }

    #[test]
    fn test_fallback_keys() {
        let doc = json!({"schema_data": {"json_ld": [{}]}, "body": "text"});
        let f = Fields::of(&doc);
        assert_eq!(f.obj_any(&["schema", "schema_data"]).list("json_ld").len(), 1);
        assert_eq!(f.text_any(&["markdown_body", "body"]), "text");
    }

    #[test]
    fn test_strings_skips_non_strings() {
        let items = vec![json!("a"), json!(3), json!(""), json!("b")];
        assert_eq!(strings(&items).collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
