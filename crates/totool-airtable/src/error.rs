//! Error types for Airtable operations

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Result type for Airtable operations
pub type Result<T> = std::result::Result<T, AirtableError>;

/// Errors returned by the Airtable client
#[derive(Error, Debug)]
pub enum AirtableError {
    /// The API answered with an error body
    #[error("{error_type}: {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    /// Too many requests for this base or token
    #[error("RATE_LIMIT_REACHED: rate limit exceeded")]
    RateLimited,

    /// Configured base URL is not a valid URL
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Network or HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AirtableError {
    /// Build an error from a non-success response
    ///
    /// Airtable reports errors either as `{"error": "NOT_FOUND"}` or as
    /// `{"error": {"type": "...", "message": "..."}}`.
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 429 {
            return Self::RateLimited;
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            error: Value,
        }

        let fallback = || match status {
            401 => "AUTHENTICATION_REQUIRED".to_string(),
            403 => "INVALID_PERMISSIONS".to_string(),
            404 => "NOT_FOUND".to_string(),
            _ => format!("HTTP_{status}"),
        };

        let (error_type, message) = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                error: Value::String(error_type),
            }) => (error_type, format!("request failed with status {status}")),
            Ok(ErrorBody {
                error: Value::Object(error),
            }) => (
                error
                    .get("type")
                    .and_then(Value::as_str)
                    .map_or_else(fallback, str::to_string),
                error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("no message")
                    .to_string(),
            ),
            _ => (fallback(), body.trim().to_string()),
        };

        Self::Api {
            status,
            error_type,
            message,
        }
    }

    /// Airtable error code, e.g. `NOT_FOUND`
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Api { error_type, .. } => Some(error_type),
            Self::RateLimited => Some("RATE_LIMIT_REACHED"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_error_body() {
        let err = AirtableError::from_response(404, r#"{"error":"NOT_FOUND"}"#);
        assert_eq!(err.error_type(), Some("NOT_FOUND"));
        assert!(err.to_string().starts_with("NOT_FOUND"));
    }

    #[test]
    fn test_object_error_body() {
        let err = AirtableError::from_response(
            422,
            r#"{"error":{"type":"INVALID_VALUE_FOR_COLUMN","message":"Field \"Count\" cannot accept the provided value"}}"#,
        );
        assert_eq!(err.error_type(), Some("INVALID_VALUE_FOR_COLUMN"));
        assert!(err.to_string().contains("cannot accept"));
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status() {
        let err = AirtableError::from_response(401, "Unauthorized");
        assert_eq!(err.error_type(), Some("AUTHENTICATION_REQUIRED"));

        let err = AirtableError::from_response(502, "");
        assert_eq!(err.error_type(), Some("HTTP_502"));
    }

    #[test]
    fn test_rate_limit() {
        let err = AirtableError::from_response(429, r#"{"errors":[]}"#);
        assert!(matches!(err, AirtableError::RateLimited));
    }
}
