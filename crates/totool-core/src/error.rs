//! Error types for totool-core

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by every tool and adapter
///
/// `Display` of [`Error::InputValidation`] and [`Error::Service`] is the bare
/// message so that mapped upstream messages reach the agent runtime verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Tool identity or predefined parameters failed validation
    #[error("Invalid tool definition: {0}")]
    ConstructionValidation(ValidationError),

    /// Caller or merged input was rejected before reaching the service
    #[error("{0}")]
    InputValidation(String),

    /// The backing service call failed
    #[error("{0}")]
    Service(String),

    /// The runtime's abort signal fired before the call completed
    #[error("Tool call was cancelled")]
    Cancelled,

    /// A tool with the same name is already registered
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path to the offending value (empty for the root)
    pub path: String,
    /// What was wrong with it
    pub message: String,
}

/// Structured error produced by schema validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// Create a validation error from a list of issues
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Create a validation error with a single issue
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![ValidationIssue {
            path: path.into(),
            message: message.into(),
        }])
    }

    /// All issues found
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Whether an issue was reported at the given path
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            if issue.path.is_empty() {
                write!(f, "{}", issue.message)?;
            } else {
                write!(f, "{}: {}", issue.path, issue.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::ConstructionValidation(err)
    }
}
