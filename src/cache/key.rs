//! Cache key generation
//!
//! Keys are `{prefix}{query}` optionally followed by `:{options}` where the
//! options object is encoded as canonical JSON (object keys sorted at every
//! depth), so two logically identical option sets always produce one key.

use serde_json::Value;
use std::fmt;

/// A fully namespaced cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a query and an optional options object.
    ///
    /// `None` and JSON `null` options both produce the bare `{prefix}{query}` key.
    pub fn new(prefix: &str, query: &str, options: Option<&Value>) -> Self {
        match options {
            Some(opts) if !opts.is_null() => {
                Self(format!("{}{}:{}", prefix, query, canonical_json(opts)))
            }
            _ => Self(format!("{}{}", prefix, query)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize a JSON value with object keys sorted recursively
pub fn canonical_json(value: &Value) -> String {
    canonicalize(value).to_string()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_key_without_options() {
        assert_eq!(CacheKey::new("search:", "rust", None).as_str(), "search:rust");
        assert_eq!(
            CacheKey::new("search:", "rust", Some(&Value::Null)).as_str(),
            "search:rust"
        );
    }

    #[test]
    fn test_options_suffix() {
        let opts = json!({"focusMode": "webSearch", "optimizationMode": "speed"});
        assert_eq!(
            CacheKey::new("search:", "rust", Some(&opts)).as_str(),
            r#"search:rust:{"focusMode":"webSearch","optimizationMode":"speed"}"#
        );
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a: Value =
            serde_json::from_str(r#"{"b": 1, "a": {"y": [1, {"d": 0, "c": 0}], "x": null}}"#)
                .unwrap();
        let b: Value =
            serde_json::from_str(r#"{"a": {"x": null, "y": [1, {"c": 0, "d": 0}]}, "b": 1}"#)
                .unwrap();
        assert_eq!(
            CacheKey::new("p:", "q", Some(&a)),
            CacheKey::new("p:", "q", Some(&b))
        );
    }

    #[test]
    fn test_array_order_is_significant() {
        let a = json!({"engines": ["bing", "google"]});
        let b = json!({"engines": ["google", "bing"]});
        assert_ne!(
            CacheKey::new("p:", "q", Some(&a)),
            CacheKey::new("p:", "q", Some(&b))
        );
    }
}
