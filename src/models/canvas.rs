use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Server-assigned identifier of a canvas object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    /// Encode a counter value as an object id.
    pub fn from_counter(n: u64) -> Self {
        ObjectId(format!("obj-{}", n))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one live connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The field set of a canvas object, kept as the JSON object the client sent.
///
/// Unknown shape types and extra fields are stored verbatim; rendering is the
/// client's concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ObjectPayload(pub Map<String, Value>);

impl ObjectPayload {
    /// Shallow merge: every field in `updates` overwrites the stored one,
    /// fields not mentioned are retained.
    pub fn merge(&mut self, updates: &ObjectPayload) {
        for (key, value) in updates.0.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn kind(&self) -> ShapeKind {
        match self.0.get("type").and_then(Value::as_str) {
            Some("rect") => ShapeKind::Rect,
            Some("note") => ShapeKind::Note,
            Some("line") => ShapeKind::Line,
            Some(other) => ShapeKind::Other(other.to_string()),
            None => ShapeKind::Untyped,
        }
    }
}

impl From<Value> for ObjectPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => ObjectPayload(map),
            _ => ObjectPayload::default(),
        }
    }
}

/// Shape classification of a payload's `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// `x`, `y`, `width`, `height`, `color`
    Rect,
    /// `x`, `y`, `text`
    Note,
    /// `points`: ordered coordinate pairs
    Line,
    Other(String),
    Untyped,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Rect => write!(f, "rect"),
            ShapeKind::Note => write!(f, "note"),
            ShapeKind::Line => write!(f, "line"),
            ShapeKind::Other(t) => write!(f, "{}", t),
            ShapeKind::Untyped => write!(f, "untyped"),
        }
    }
}

/// Pointer position in canvas coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_overwrites_and_retains() {
        let mut payload = ObjectPayload::from(json!({"type": "rect", "x": 10, "y": 10, "color": "red"}));
        payload.merge(&ObjectPayload::from(json!({"x": 50, "width": 180})));

        assert_eq!(
            payload,
            ObjectPayload::from(json!({"type": "rect", "x": 50, "y": 10, "color": "red", "width": 180}))
        );
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(ObjectPayload::from(json!({"type": "rect"})).kind(), ShapeKind::Rect);
        assert_eq!(ObjectPayload::from(json!({"type": "note"})).kind(), ShapeKind::Note);
        assert_eq!(ObjectPayload::from(json!({"type": "line", "points": [[0, 0], [1, 1]]})).kind(), ShapeKind::Line);
        assert_eq!(
            ObjectPayload::from(json!({"type": "star"})).kind(),
            ShapeKind::Other("star".to_string())
        );
        assert_eq!(ObjectPayload::from(json!({"x": 1})).kind(), ShapeKind::Untyped);
    }

    #[test]
    fn test_payload_must_be_object() {
        assert!(serde_json::from_value::<ObjectPayload>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<ObjectPayload>(json!("rect")).is_err());
        assert!(serde_json::from_value::<ObjectPayload>(json!({"type": "rect"})).is_ok());
    }
}
