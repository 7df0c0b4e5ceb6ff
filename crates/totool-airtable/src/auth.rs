//! Airtable credentials

use secrecy::{ExposeSecret, SecretString};

/// Personal access token for the Airtable API
///
/// `Debug` never prints the token.
#[derive(Debug, Clone)]
pub struct AirtableAuth {
    access_token: SecretString,
}

impl AirtableAuth {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
        }
    }

    /// The raw token, for building the `Authorization` header
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}
