//! Content records and the create-content payload
//!
//! A submitted `content` value is accepted when it is truthy: absent,
//! `null`, `false`, `0` and `""` are all rejected as missing. Truthy
//! non-string values are stored as their JSON text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use super::ValidationError;

/// A stored content record. `id` and `created_at` are assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ContentRecord {
    pub id: i32,
    pub content: String,
    #[serde(serialize_with = "crate::clock::serialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Validated, non-empty content text ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBody(String);

impl ContentBody {
    /// Validate content text.
    ///
    /// # Example
    /// ```
    /// use quill_server::models::ContentBody;
    ///
    /// assert!(ContentBody::new("Hello").is_ok());
    /// assert!(ContentBody::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Required { field: "content" });
        }
        Ok(Self(s.to_owned()))
    }

    /// Validate the raw `content` member of a request body.
    pub fn from_json(value: Option<&Value>) -> Result<Self, ValidationError> {
        let missing = ValidationError::Required { field: "content" };

        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Err(missing),
            Some(Value::String(s)) => Self::new(s),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(missing),
            Some(other) => Ok(Self(other.to_string())),
        }
    }

    /// Get the content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ContentBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn accepts_text() {
        let body = ContentBody::from_json(Some(&json!("Hello"))).unwrap();
        assert_eq!(body.as_str(), "Hello");
    }

    #[test]
    fn whitespace_is_not_empty() {
        assert!(ContentBody::from_json(Some(&json!("   "))).is_ok());
    }

    #[test]
    fn rejects_falsy_values() {
        for value in [json!(null), json!(""), json!(false), json!(0), json!(0.0)] {
            let err = ContentBody::from_json(Some(&value)).unwrap_err();
            assert_eq!(err, ValidationError::Required { field: "content" }, "{value}");
        }
        assert!(ContentBody::from_json(None).is_err());
    }

    #[test]
    fn truthy_non_strings_become_json_text() {
        assert_eq!(ContentBody::from_json(Some(&json!(42))).unwrap().as_str(), "42");
        assert_eq!(ContentBody::from_json(Some(&json!(true))).unwrap().as_str(), "true");
        assert_eq!(
            ContentBody::from_json(Some(&json!({"a": 1}))).unwrap().as_str(),
            r#"{"a":1}"#
        );
    }

    #[test]
    fn record_serializes_with_millisecond_timestamp() {
        let record = ContentRecord {
            id: 1,
            content: "Hello".into(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 34, 5).unwrap(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "content": "Hello", "created_at": "2026-10-16T09:34:05.000Z"})
        );
    }
}
