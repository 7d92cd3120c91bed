//! Decoded response bodies.

use serde_json::{Map, Value};

/// A response body after best-effort decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Zero-length (or whitespace-only) body, e.g. `204 No Content`.
    Empty,
    Json(Value),
    /// Body that was not valid JSON, kept verbatim.
    Text(String),
}

impl Payload {
    /// Decode a body: empty stays empty, JSON is parsed, anything else is text.
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The whole body as a JSON value. Empty becomes `{}`, text a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::Object(Map::new()),
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// The `data` member when present and non-null, else the whole body,
    /// else `{}`.
    pub fn into_data(self) -> Value {
        match self {
            Self::Json(Value::Object(mut map)) => match map.remove("data") {
                Some(data) if !data.is_null() => data,
                Some(data) => {
                    map.insert("data".to_string(), data);
                    Value::Object(map)
                }
                None => Value::Object(map),
            },
            Self::Json(Value::Null) => Value::Object(Map::new()),
            other => other.into_value(),
        }
    }
}
