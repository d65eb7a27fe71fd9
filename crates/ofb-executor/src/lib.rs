//! ofb-executor - osascript bridge for OmniFocus automation
//!
//! Provides safe, structured execution of generated AppleScript:
//! - Subprocess invocation of the external interpreter
//! - Result decoding (JSON with raw-string fallback)
//! - Best-effort diagnostic classification into the closed error taxonomy
//! - Chunked, strictly sequential batch execution
//!
//! Every operation returns [`ofb_types::ExecutionOutcome`]; expected
//! failures are data, never panics.

mod batch;
mod bridge;
mod classify;
mod config;
mod decode;
mod runner;

pub use batch::BatchOperation;
pub use bridge::{BATCH_HELPER, JSON_HELPER, OsaBridge};
pub use classify::classify_diagnostic;
pub use config::{DEFAULT_CHUNK_SIZE, OsaConfig};
pub use runner::{OsascriptRunner, ProgramRunner, RawOutput};
