//! The parameter bag handed to the resolver.
//!
//! # Design
//! Values are `serde_json::Value` in an insertion-ordered map, so callers can
//! build bags with `json!` and query strings come out in first-seen order.
//! The reserved `headers` entry is pulled out at construction and kept as a
//! lower-cased, deduplicated header list; everything else stays in the map
//! until the resolver decides whether it is a path, query or body parameter.

use serde_json::{Map, Value};

use crate::error::BuildError;
use crate::http::set_header;

/// Keys that steer resolution and never reach the query string or body.
pub(crate) const RESERVED_KEYS: &[&str] = &["method", "url", "baseUrl", "data", "headers"];

/// Named request parameters plus caller-supplied headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: Map<String, Value>,
    headers: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a JSON object, splitting off its `headers` entry.
    ///
    /// Header values may be strings, numbers or booleans; `null` entries are
    /// dropped. Anything else is rejected.
    pub fn from_value(value: Value) -> Result<Self, BuildError> {
        let mut values = match value {
            Value::Object(values) => values,
            other => {
                return Err(BuildError::InvalidParameters(format!(
                    "expected a JSON object, got {}",
                    kind_of(&other)
                )))
            }
        };
        let mut headers = Vec::new();
        match values.shift_remove("headers") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (name, value) in map {
                    let value = match value {
                        Value::Null => continue,
                        Value::String(s) => s,
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(BuildError::InvalidParameters(format!(
                                "header {name} must be a scalar, got {}",
                                kind_of(&other)
                            )))
                        }
                    };
                    set_header(&mut headers, &name, value);
                }
            }
            Some(other) => {
                return Err(BuildError::InvalidParameters(format!(
                    "headers must be an object, got {}",
                    kind_of(&other)
                )))
            }
        }
        Ok(Self { values, headers })
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name, value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Remove an entry, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub(crate) fn into_parts(self) -> (Map<String, Value>, Vec<(String, String)>) {
        (self.values, self.headers)
    }
}

impl TryFrom<Value> for Parameters {
    type Error = BuildError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Parameters::from_value(value)
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
