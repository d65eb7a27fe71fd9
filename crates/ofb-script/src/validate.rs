//! The validation gate.
//!
//! Every caller-supplied value destined for script interpolation passes
//! through one of these constructors first. The wrappers are the only
//! types the composer's interpolation helpers accept, so an unvalidated
//! string reaching generated script text is a compile error, not a code
//! review finding.
//!
//! Identifiers are rejected, never sanitized: several call sites
//! interpolate them outside string-literal position, so no escaping
//! scheme can make a hostile identifier safe.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use ofb_types::{EntityKind, ErrorKind, StructuredError};

/// Upper bound for pagination limits.
pub const MAX_PAGE_LIMIT: i64 = 10_000;

#[allow(clippy::expect_used)]
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("id pattern compiles"));

#[allow(clippy::expect_used)]
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 /:,.\-]*$").expect("date pattern compiles"));

/// A validated entity identifier, safe to interpolate anywhere in script text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScriptId(String);

impl ScriptId {
    /// Validate a raw identifier for the given entity class.
    ///
    /// Trims surrounding whitespace, then requires a non-empty match of
    /// `^[A-Za-z0-9_-]+$`.
    ///
    /// # Errors
    /// [`ErrorKind::InvalidIdFormat`] when empty after trimming or when any
    /// character falls outside the identifier class.
    pub fn parse(kind: EntityKind, raw: &str) -> Result<Self, StructuredError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StructuredError::new(
                ErrorKind::InvalidIdFormat,
                format!("{kind} id must not be empty"),
            ));
        }
        if !ID_PATTERN.is_match(trimmed) {
            return Err(StructuredError::new(
                ErrorKind::InvalidIdFormat,
                format!("{kind} id contains characters outside [A-Za-z0-9_-]"),
            )
            .with_details(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The validated identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScriptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated free-text value (name, note, tag, search query).
///
/// Empty is legal and means "clear this field" at the call sites that
/// accept it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScriptText(String);

impl ScriptText {
    /// Validate a free-text field.
    ///
    /// # Errors
    /// [`ErrorKind::ValidationError`] when the value contains a double
    /// quote, a backslash, or a control character - the characters that
    /// would break out of (or corrupt) an AppleScript string literal.
    pub fn parse(field: &str, raw: &str) -> Result<Self, StructuredError> {
        if raw.contains('"') || raw.contains('\\') {
            return Err(StructuredError::validation(format!(
                "{field} must not contain quotes or backslashes"
            )));
        }
        if raw.chars().any(char::is_control) {
            return Err(StructuredError::validation(format!(
                "{field} must not contain control characters"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The validated text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value is the empty "clear this field" sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A validated date string, restricted to the interpreter's date syntax
/// characters. Parsing the date itself is left to the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScriptDate(String);

impl ScriptDate {
    /// Validate a date string against the allow-list
    /// (letters, digits, space, `/:,.-`).
    ///
    /// # Errors
    /// [`ErrorKind::InvalidDateFormat`] on any character outside the
    /// allow-list.
    pub fn parse(raw: &str) -> Result<Self, StructuredError> {
        if !DATE_PATTERN.is_match(raw) {
            return Err(StructuredError::new(
                ErrorKind::InvalidDateFormat,
                "date contains characters outside [A-Za-z0-9 /:,.-]",
            )
            .with_details(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// The validated date text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validate a tag list; the first invalid element fails the whole list.
///
/// # Errors
/// Propagates the [`ScriptText::parse`] error of the first invalid tag.
pub fn validate_tags(raw: &[String]) -> Result<Vec<ScriptText>, StructuredError> {
    raw.iter()
        .map(|tag| ScriptText::parse("tag", tag))
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn integral(field: &str, value: f64) -> Result<i64, StructuredError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(StructuredError::validation(format!(
            "{field} must be an integer"
        )));
    }
    Ok(value as i64)
}

/// A validated repetition interval (integral, at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RepeatInterval(u32);

impl RepeatInterval {
    /// Validate a repetition interval arriving as a JSON number.
    ///
    /// # Errors
    /// [`ErrorKind::ValidationError`] when fractional or below 1.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn parse(value: f64) -> Result<Self, StructuredError> {
        let n = integral("repetition interval", value)?;
        if n < 1 {
            return Err(StructuredError::validation(
                "repetition interval must be at least 1",
            ));
        }
        Ok(Self(n as u32))
    }

    /// The validated interval.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// A validated estimated duration in minutes (integral, non-negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EstimatedMinutes(u32);

impl EstimatedMinutes {
    /// Validate an estimated-minutes value arriving as a JSON number.
    ///
    /// # Errors
    /// [`ErrorKind::ValidationError`] when fractional or negative.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn parse(value: f64) -> Result<Self, StructuredError> {
        let n = integral("estimated minutes", value)?;
        if n < 0 {
            return Err(StructuredError::validation(
                "estimated minutes must not be negative",
            ));
        }
        Ok(Self(n as u32))
    }

    /// The validated minute count.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// A validated pagination limit (integral, 1..=[`MAX_PAGE_LIMIT`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageLimit(u64);

impl PageLimit {
    /// Validate a pagination limit arriving as a JSON number.
    ///
    /// # Errors
    /// [`ErrorKind::ValidationError`] when fractional or outside
    /// `1..=MAX_PAGE_LIMIT`.
    #[allow(clippy::cast_sign_loss)]
    pub fn parse(value: f64) -> Result<Self, StructuredError> {
        let n = integral("limit", value)?;
        if n < 1 || n > MAX_PAGE_LIMIT {
            return Err(StructuredError::validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }
        Ok(Self(n as u64))
    }

    /// The validated limit.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A validated pagination offset (integral, non-negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageOffset(u64);

impl PageOffset {
    /// Validate a pagination offset arriving as a JSON number.
    ///
    /// # Errors
    /// [`ErrorKind::ValidationError`] when fractional or negative.
    #[allow(clippy::cast_sign_loss)]
    pub fn parse(value: f64) -> Result<Self, StructuredError> {
        let n = integral("offset", value)?;
        if n < 0 {
            return Err(StructuredError::validation("offset must not be negative"));
        }
        Ok(Self(n as u64))
    }

    /// The validated offset.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Escape `\` and `"` for embedding in an AppleScript string literal.
///
/// Second line of defense for values that legitimately passed validation;
/// never a substitute for the gate above.
#[must_use]
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}
