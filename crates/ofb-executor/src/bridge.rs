//! The bridge facade: composition conveniences and the execute paths.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use ofb_assets::{AssetError, AssetLoader};
use ofb_script::{ScriptProgram, compose};
use ofb_types::{ErrorKind, ExecutionOutcome, StructuredError};

use crate::classify::classify_diagnostic;
use crate::config::OsaConfig;
use crate::decode::decode;
use crate::runner::{OsascriptRunner, ProgramRunner};

/// Relative path of the canonical JSON helper fragment.
pub const JSON_HELPER: &str = "helpers/json.applescript";

/// Relative path of the batch report helper fragment.
pub const BATCH_HELPER: &str = "helpers/batch.applescript";

/// The osascript bridge.
///
/// One instance per caller; each call issues exactly one subprocess
/// invocation and awaits it to completion. Nothing is shared between
/// calls except the fragment cache, which is read-only after population.
#[derive(Debug)]
pub struct OsaBridge<R: ProgramRunner = OsascriptRunner> {
    config: OsaConfig,
    assets: AssetLoader,
    runner: R,
}

impl OsaBridge<OsascriptRunner> {
    /// Create a bridge shelling out to the configured osascript binary.
    #[must_use]
    pub fn new(config: OsaConfig) -> Self {
        let runner = OsascriptRunner::new(config.osascript_path.clone());
        Self::with_runner(config, runner)
    }
}

impl<R: ProgramRunner> OsaBridge<R> {
    /// Create a bridge with an injected runner (tests use counting fakes).
    #[must_use]
    pub fn with_runner(config: OsaConfig, runner: R) -> Self {
        let assets = AssetLoader::new(config.asset_root.clone());
        Self {
            config,
            assets,
            runner,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &OsaConfig {
        &self.config
    }

    /// The fragment loader (exposed for cache lifecycle control in tests).
    #[must_use]
    pub fn assets(&self) -> &AssetLoader {
        &self.assets
    }

    /// Compose a body with the canonical JSON helper fragment prepended.
    ///
    /// Any script that emits structured results needs the helper; loading
    /// goes through the fragment cache.
    ///
    /// # Errors
    /// Fails when the helper fragment cannot be loaded.
    pub fn compose_with_json(&self, body: &str) -> Result<ScriptProgram, StructuredError> {
        let json_helper = self.load_fragment(JSON_HELPER)?;
        Ok(compose(&[&json_helper], body))
    }

    /// Load a fragment through the cache, converting loader failures to
    /// the outcome error shape at this boundary.
    pub(crate) fn load_fragment(&self, relative: &str) -> Result<String, StructuredError> {
        self.assets
            .load_cached(relative)
            .map_err(|e| fragment_error(relative, &e))
    }

    /// Execute a composed program and decode its result.
    ///
    /// Expected failures (diagnostics, empty output, spawn errors) come
    /// back as failure outcomes; this function does not panic and does
    /// not retry.
    pub async fn execute(&self, program: &ScriptProgram) -> ExecutionOutcome<Value> {
        tracing::debug!(bytes = program.as_str().len(), "executing inline program");
        match self.runner.run_inline(program.as_str()).await {
            Ok(raw) => {
                let outcome = decode(&raw);
                if let Some(err) = outcome.error() {
                    tracing::warn!(code = %err.code, "osascript invocation failed");
                }
                outcome
            }
            Err(e) => ExecutionOutcome::err(classify_diagnostic(&e.to_string())),
        }
    }

    /// Execute a pre-existing script file with positional arguments.
    ///
    /// Shares the decode path with [`OsaBridge::execute`]; an unreadable
    /// path surfaces as a classified failure outcome, not a panic.
    pub async fn execute_file(&self, path: &Path, args: &[String]) -> ExecutionOutcome<Value> {
        tracing::debug!(script = %path.display(), args = args.len(), "executing script file");
        match self.runner.run_file(path, args).await {
            Ok(raw) => decode(&raw),
            Err(e) => ExecutionOutcome::err(classify_diagnostic(&e.to_string())),
        }
    }

    /// Execute and deserialize the JSON payload into `T`.
    ///
    /// A payload that only survived the raw-string fallback (or a JSON
    /// document of the wrong shape) is a [`ErrorKind::JsonParseError`].
    pub async fn execute_typed<T: DeserializeOwned>(
        &self,
        program: &ScriptProgram,
    ) -> ExecutionOutcome<T> {
        match self.execute(program).await.into_result() {
            Ok(value) => match serde_json::from_value::<T>(value) {
                Ok(typed) => ExecutionOutcome::ok(typed),
                Err(e) => ExecutionOutcome::err(
                    StructuredError::new(
                        ErrorKind::JsonParseError,
                        "response did not match the expected shape",
                    )
                    .with_details(e.to_string()),
                ),
            },
            Err(err) => ExecutionOutcome::err(err),
        }
    }
}

fn fragment_error(relative: &str, e: &AssetError) -> StructuredError {
    StructuredError::new(
        ErrorKind::UnknownError,
        format!("failed to load script fragment {relative}"),
    )
    .with_details(e.to_string())
}
