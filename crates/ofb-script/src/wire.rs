//! Wire codec for the hand-rolled JSON-in-text protocol.
//!
//! The interpreter has no native JSON support, so generated scripts and
//! their helper fragments assemble JSON by string concatenation. These
//! helpers are the Rust-side mirror of those conventions and are the only
//! place the escaping rules live:
//!
//! - `null`-or-empty-or-`"missing value"` string fields serialize to `null`
//! - lists serialize to bracketed, comma-joined, double-quoted arrays
//! - strings escape `"`, `\`, CR, LF, TAB; other control characters
//!   (codepoints < 32) are dropped

use crate::validate::{ScriptId, escape_literal};

/// The interpreter's spelling of an absent value.
pub const MISSING_VALUE: &str = "missing value";

/// An AppleScript double-quoted string literal for a validated value.
#[must_use]
pub fn string_literal(value: &str) -> String {
    format!("\"{}\"", escape_literal(value))
}

/// An AppleScript list literal of identifier strings: `{"a", "b"}`.
///
/// Accepts only validated identifiers, so no escaping is needed inside
/// the quotes.
#[must_use]
pub fn id_list_literal(ids: &[ScriptId]) -> String {
    let quoted: Vec<String> = ids.iter().map(|id| format!("\"{id}\"")).collect();
    format!("{{{}}}", quoted.join(", "))
}

/// A JSON string token with the protocol's exact escaping rules.
#[must_use]
pub fn json_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 32 => {} // dropped, not escaped
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A JSON array of strings: bracketed, comma-joined, double-quoted.
#[must_use]
pub fn json_string_array(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| json_string(v)).collect();
    format!("[{}]", quoted.join(","))
}

/// A JSON value token for an optional string field.
///
/// `None`, the empty string, and the interpreter's `"missing value"`
/// sentinel all serialize to `null`.
#[must_use]
pub fn json_field_or_null(value: Option<&str>) -> String {
    match value {
        None => "null".to_string(),
        Some(v) if v.is_empty() || v == MISSING_VALUE => "null".to_string(),
        Some(v) => json_string(v),
    }
}
