//! Best-effort classification of interpreter diagnostics.
//!
//! The diagnostic strings come from the host application and may vary by
//! version or locale; matching is substring/pattern based and never more
//! than a heuristic. Unmatched text falls back to
//! [`ErrorKind::AppleScriptError`] with the raw diagnostic preserved
//! verbatim in `details` - text is classified, never discarded.

use once_cell::sync::Lazy;
use regex::Regex;

use ofb_types::{EntityKind, ErrorKind, StructuredError};

#[allow(clippy::expect_used)]
static NOT_RUNNING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)not running|isn't running|can't connect|connection is invalid|\(-600\)")
        .expect("not-running pattern compiles")
});

#[allow(clippy::expect_used)]
static LOOKUP_FAILED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)can't get|can't find|not found|doesn't exist|no such")
        .expect("lookup pattern compiles")
});

#[allow(clippy::expect_used)]
static INVALID_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)invalid date|can't make .* into type date").expect("date pattern compiles")
});

/// Entity words checked against a failed-lookup diagnostic, in priority
/// order (a message naming both a task and its project classifies as the
/// task lookup).
const ENTITY_ORDER: [EntityKind; 4] = [
    EntityKind::Task,
    EntityKind::Project,
    EntityKind::Tag,
    EntityKind::Folder,
];

/// Classify raw diagnostic text into a [`StructuredError`].
///
/// The raw text is always carried verbatim in `details`.
#[must_use]
pub fn classify_diagnostic(diagnostic: &str) -> StructuredError {
    let text = diagnostic.trim();

    if NOT_RUNNING.is_match(text) {
        return StructuredError::new(ErrorKind::OmniFocusNotRunning, "OmniFocus is not running")
            .with_details(text.to_string());
    }

    if LOOKUP_FAILED.is_match(text) {
        let lower = text.to_lowercase();
        for kind in ENTITY_ORDER {
            if lower.contains(kind.label()) {
                return StructuredError::new(
                    kind.not_found_kind(),
                    format!("{kind} not found"),
                )
                .with_details(text.to_string());
            }
        }
    }

    if INVALID_DATE.is_match(text) {
        return StructuredError::new(ErrorKind::InvalidDateFormat, "invalid date format")
            .with_details(text.to_string());
    }

    StructuredError::new(ErrorKind::AppleScriptError, "AppleScript execution failed")
        .with_details(text.to_string())
}
