//! ofb-script - Injection-safe script construction for OmniFocus automation
//!
//! The external interpreter has no parameterized-query mechanism: every
//! value is textually interpolated into generated AppleScript. This crate
//! is the sole injection defense:
//! - Validation gate producing typed wrappers ([`ScriptId`], [`ScriptText`],
//!   [`ScriptDate`]) - raw caller strings cannot reach the composer
//! - Wire codec for AppleScript and hand-rolled JSON literals
//! - Composer assembling handler fragments and a body into a [`ScriptProgram`]

mod compose;
mod validate;
pub mod wire;

pub use compose::{ScriptProgram, compose, compose_bare};
pub use validate::{
    EstimatedMinutes, MAX_PAGE_LIMIT, PageLimit, PageOffset, RepeatInterval, ScriptDate, ScriptId,
    ScriptText, escape_literal, validate_tags,
};
