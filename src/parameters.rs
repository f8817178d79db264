//! Parameter bags attached to query nodes, scorers and retrieval calls.
//!
//! Values are JSON values so nested blocks (e.g. the available-parts report)
//! fit in the same type. Key order carries no meaning.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SkeinError};

/// An ordered-irrelevant map from parameter name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: Map<String, Value>,
}

impl Parameters {
    /// Create an empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object.
    pub fn parse_json(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(values) => Ok(Parameters { values }),
            other => Err(SkeinError::configuration(format!(
                "parameters must be a JSON object, got {other}"
            ))),
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw value lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Numeric lookup. Integers, floats and numeric strings are accepted.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Unsigned integer lookup.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.values.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// String lookup. Numbers and booleans are not coerced.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.as_str()
    }

    /// Boolean lookup. The strings `"true"`/`"false"` are accepted.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Nested parameter block lookup.
    pub fn get_map(&self, key: &str) -> Option<Parameters> {
        self.values.get(key)?.as_object().map(|values| Parameters {
            values: values.clone(),
        })
    }

    pub fn get_f64_or(&self, key: &str, default: f64) -> f64 {
        self.get_f64(key).unwrap_or(default)
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// Numeric lookup that fails when the key is missing or not numeric.
    pub fn require_f64(&self, key: &str) -> Result<f64> {
        self.get_f64(key).ok_or_else(|| {
            SkeinError::configuration(format!("missing required numeric parameter: {key}"))
        })
    }

    /// Copy every entry of `other` into `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Parameters) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// A merged copy: `self` overridden by `other`.
    pub fn merged(&self, other: &Parameters) -> Parameters {
        let mut merged = self.clone();
        merged.merge(other);
        merged
    }

    /// Sorted parameter names.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

impl From<Parameters> for Value {
    fn from(parameters: Parameters) -> Self {
        parameters.into_value()
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.values.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let p = Parameters::new()
            .with("mu", 1500)
            .with("lambda", 0.4)
            .with("part", "postings")
            .with("norm", false)
            .with("width", "3");

        assert_eq!(p.get_f64("mu"), Some(1500.0));
        assert_eq!(p.get_u64("mu"), Some(1500));
        assert_eq!(p.get_f64("lambda"), Some(0.4));
        assert_eq!(p.get_str("part"), Some("postings"));
        assert_eq!(p.get_bool("norm"), Some(false));
        assert_eq!(p.get_u64("width"), Some(3));
        assert_eq!(p.get_f64("missing"), None);
        assert_eq!(p.get_f64_or("missing", 2.5), 2.5);
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Parameters::new().with("mu", 1500).with("b", 0.75);
        let overrides = Parameters::new().with("mu", 2000);
        base.merge(&overrides);

        assert_eq!(base.get_u64("mu"), Some(2000));
        assert_eq!(base.get_f64("b"), Some(0.75));
    }

    #[test]
    fn test_require_reports_configuration_error() {
        let p = Parameters::new();
        assert!(matches!(
            p.require_f64("collectionLength"),
            Err(SkeinError::Configuration(_))
        ));
    }

    #[test]
    fn test_parse_json() {
        let p =
            Parameters::parse_json(r#"{"requestedDocuments": 10, "part": "postings"}"#).unwrap();
        assert_eq!(p.get_u64("requestedDocuments"), Some(10));
        assert!(Parameters::parse_json("[1, 2]").is_err());
    }
}
