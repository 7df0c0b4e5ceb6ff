//! Configuration management utilities

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const AIRTABLE_ACCESS_TOKEN: &str = "AIRTABLE_ACCESS_TOKEN";
pub const NOTION_API_KEY: &str = "NOTION_API_KEY";
pub const NOTION_VERSION: &str = "NOTION_VERSION";
pub const NOTION_ROOT_PAGE_ID: &str = "NOTION_ROOT_PAGE_ID";
pub const LOG_FORMAT: &str = "TOTOOL_LOG_FORMAT";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid log format '{0}', expected 'pretty' or 'json'")]
    InvalidLogFormat(String),
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Credentials and settings read from the environment
///
/// Tokens are held as [`SecretString`] so `Debug` output never contains them.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub airtable_access_token: Option<SecretString>,
    pub notion_token: Option<SecretString>,
    pub notion_version: Option<String>,
    /// Page new Notion pages are created under when no parent is given
    pub notion_root_page_id: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_format = get(LOG_FORMAT)
            .map(|value| value.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            airtable_access_token: get(AIRTABLE_ACCESS_TOKEN).map(SecretString::from),
            notion_token: get(NOTION_API_KEY).map(SecretString::from),
            notion_version: get(NOTION_VERSION),
            notion_root_page_id: get(NOTION_ROOT_PAGE_ID),
            log_format,
        })
    }
}
