//! Error taxonomy for bridge operations.
//!
//! Follows the explicit-enum convention: every failure a caller can see
//! carries one of the closed [`ErrorKind`] codes plus a human message and
//! the raw diagnostic text, preserved verbatim.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of error codes surfaced by the bridge.
///
/// Serialized in SCREAMING_SNAKE_CASE so callers see stable wire codes
/// (`TASK_NOT_FOUND`, `APPLESCRIPT_ERROR`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Task lookup failed inside the host application.
    TaskNotFound,
    /// Project lookup failed inside the host application.
    ProjectNotFound,
    /// Tag lookup failed inside the host application.
    TagNotFound,
    /// Folder lookup failed inside the host application.
    FolderNotFound,
    /// The host application is not running or unreachable.
    #[serde(rename = "OMNIFOCUS_NOT_RUNNING")]
    OmniFocusNotRunning,
    /// A date string failed the allow-list check.
    InvalidDateFormat,
    /// An identifier failed the character-class check.
    InvalidIdFormat,
    /// Generic interpreter failure (the terminal classification fallback).
    AppleScriptError,
    /// Interpreter output could not be decoded as the expected JSON shape.
    JsonParseError,
    /// Caller input failed a shape or range check before execution.
    ValidationError,
    /// Catch-all used only when no other information is available.
    UnknownError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::FolderNotFound => "FOLDER_NOT_FOUND",
            Self::OmniFocusNotRunning => "OMNIFOCUS_NOT_RUNNING",
            Self::InvalidDateFormat => "INVALID_DATE_FORMAT",
            Self::InvalidIdFormat => "INVALID_ID_FORMAT",
            Self::AppleScriptError => "APPLESCRIPT_ERROR",
            Self::JsonParseError => "JSON_PARSE_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        };
        f.write_str(code)
    }
}

/// A classified failure, propagated unchanged from the point of detection.
///
/// Construction goes through [`StructuredError::new`] so `code` is always
/// a member of the closed [`ErrorKind`] set. `details` carries raw
/// diagnostic text (interpreter stderr, OS error strings) verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, JsonSchema)]
#[error("{code}: {message}")]
pub struct StructuredError {
    /// Stable error code from the closed taxonomy.
    pub code: ErrorKind,
    /// Short human-readable summary.
    pub message: String,
    /// Raw diagnostic text preserved for diagnosis, never synthesized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl StructuredError {
    /// Create an error with a code and message, no details.
    #[must_use]
    pub fn new(code: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach raw diagnostic text.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Shorthand for [`ErrorKind::ValidationError`] failures.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_are_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::TaskNotFound).unwrap();
        assert_eq!(json, "\"TASK_NOT_FOUND\"");
        let json = serde_json::to_string(&ErrorKind::OmniFocusNotRunning).unwrap();
        assert_eq!(json, "\"OMNIFOCUS_NOT_RUNNING\"");
    }

    #[test]
    fn display_matches_wire_code() {
        assert_eq!(ErrorKind::AppleScriptError.to_string(), "APPLESCRIPT_ERROR");
        assert_eq!(ErrorKind::InvalidIdFormat.to_string(), "INVALID_ID_FORMAT");
    }

    #[test]
    fn details_survive_round_trip() {
        let err = StructuredError::new(ErrorKind::AppleScriptError, "script failed")
            .with_details("execution error: OmniFocus got an error");
        let json = serde_json::to_string(&err).unwrap();
        let back: StructuredError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn details_omitted_when_absent() {
        let err = StructuredError::validation("ids must not be empty");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("details"));
    }
}
