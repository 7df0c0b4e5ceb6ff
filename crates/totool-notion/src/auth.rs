//! Notion credentials

use crate::error::{NotionError, Result};
use secrecy::{ExposeSecret, SecretString};

/// API version sent when none is configured
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Integration token plus the `Notion-Version` to speak
#[derive(Debug, Clone)]
pub struct NotionAuth {
    token: SecretString,
    version: String,
}

impl NotionAuth {
    /// Fails with [`NotionError::MissingToken`] for a blank token
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(NotionError::MissingToken);
        }
        Ok(Self {
            token: SecretString::from(token),
            version: DEFAULT_NOTION_VERSION.to_string(),
        })
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_redaction() {
        let auth = NotionAuth::new("secret_abc").unwrap();
        assert_eq!(auth.version(), "2022-06-28");
        assert_eq!(auth.token(), "secret_abc");
        assert!(!format!("{auth:?}").contains("secret_abc"));

        let auth = auth.with_version("2025-09-03");
        assert_eq!(auth.version(), "2025-09-03");
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(matches!(NotionAuth::new(""), Err(NotionError::MissingToken)));
        assert!(matches!(NotionAuth::new("  "), Err(NotionError::MissingToken)));
    }
}
