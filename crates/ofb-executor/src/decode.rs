//! Result decoder: raw interpreter output to a typed outcome.

use serde_json::Value;

use ofb_types::{ErrorKind, ExecutionOutcome, StructuredError};

use crate::classify::classify_diagnostic;
use crate::runner::RawOutput;

/// Decode one invocation's captured output.
///
/// Decision order:
/// 1. Any diagnostic text on stderr is a failure, even on exit 0 - the
///    interpreter emits warnings there that must not be swallowed.
/// 2. A non-zero exit with silent stderr is classified from the exit
///    status message.
/// 3. Empty trimmed stdout is a failure: every generated script is
///    required to `return` a value, so "no output" never means "no data".
/// 4. Stdout parses as JSON if it can; otherwise the trimmed raw string
///    is the payload. The fallback applies only on the success path.
pub(crate) fn decode(raw: &RawOutput) -> ExecutionOutcome<Value> {
    let stderr = raw.stderr.trim();
    if !stderr.is_empty() {
        return ExecutionOutcome::err(classify_diagnostic(stderr));
    }

    if !raw.exited_ok() {
        let message = match raw.exit_code {
            Some(code) => format!("osascript exited with status {code}"),
            None => "osascript terminated by signal".to_string(),
        };
        return ExecutionOutcome::err(classify_diagnostic(&message));
    }

    let stdout = raw.stdout.trim();
    if stdout.is_empty() {
        return ExecutionOutcome::err(StructuredError::new(
            ErrorKind::AppleScriptError,
            "empty response from osascript",
        ));
    }

    match serde_json::from_str::<Value>(stdout) {
        Ok(value) => ExecutionOutcome::ok(value),
        Err(_) => ExecutionOutcome::ok(Value::String(stdout.to_string())),
    }
}
