//! Error types for Notion operations

use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotionError>;

#[derive(Error, Debug)]
pub enum NotionError {
    /// Error object returned by the API
    #[error("{message} ({status} {code})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Notion API token is required")]
    MissingToken,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ErrorObject {
    code: String,
    message: String,
}

impl NotionError {
    /// Build an error from a non-success response
    ///
    /// Notion answers with `{"object": "error", "status", "code", "message"}`.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorObject>(body) {
            Ok(ErrorObject { code, message }) => Self::Api {
                status,
                code,
                message,
            },
            Err(_) => Self::Api {
                status,
                code: "unknown".to_string(),
                message: if body.trim().is_empty() {
                    format!("request failed with status {status}")
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_object() {
        let err = NotionError::from_response(
            404,
            r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find page with ID: abc."}"#,
        );
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "Could not find page with ID: abc. (404 object_not_found)"
        );
    }

    #[test]
    fn test_plain_body() {
        let err = NotionError::from_response(502, "Bad Gateway");
        assert_eq!(err.to_string(), "Bad Gateway (502 unknown)");

        let err = NotionError::from_response(500, "");
        assert_eq!(
            err.to_string(),
            "request failed with status 500 (500 unknown)"
        );
        assert_eq!(NotionError::MissingToken.status(), None);
    }
}
