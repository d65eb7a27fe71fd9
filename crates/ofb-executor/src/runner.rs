//! The subprocess seam.
//!
//! [`ProgramRunner`] is the only place the bridge touches the OS; tests
//! inject fakes to count invocations or script raw outputs.

use std::io;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

/// Captured output of one interpreter invocation.
#[derive(Debug, Clone)]
pub struct RawOutput {
    /// Captured standard output, decoded lossily.
    pub stdout: String,
    /// Captured diagnostic output, decoded lossily.
    pub stderr: String,
    /// Exit code, when the process exited normally.
    pub exit_code: Option<i32>,
}

impl RawOutput {
    /// Whether the process exited with status zero.
    #[must_use]
    pub fn exited_ok(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl From<std::process::Output> for RawOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        }
    }
}

/// Raw interpreter invocation: one call, one subprocess, awaited to
/// completion. No retry, no timeout at this level.
#[async_trait]
pub trait ProgramRunner: Send + Sync {
    /// Run an inline program (`osascript -e <program>`).
    ///
    /// # Errors
    /// `std::io::Error` when the process cannot be spawned.
    async fn run_inline(&self, program: &str) -> io::Result<RawOutput>;

    /// Run a pre-existing script file with positional string arguments.
    ///
    /// # Errors
    /// `std::io::Error` when the process cannot be spawned.
    async fn run_file(&self, path: &Path, args: &[String]) -> io::Result<RawOutput>;
}

/// Production runner shelling out to osascript.
///
/// The program and every file argument travel as separate argv entries,
/// so no shell parses them and no quoting layer exists to escape.
#[derive(Debug, Clone)]
pub struct OsascriptRunner {
    binary: String,
}

impl OsascriptRunner {
    /// Create a runner for the given osascript binary path.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl ProgramRunner for OsascriptRunner {
    async fn run_inline(&self, program: &str) -> io::Result<RawOutput> {
        let output = Command::new(&self.binary)
            .arg("-e")
            .arg(program)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(output.into())
    }

    async fn run_file(&self, path: &Path, args: &[String]) -> io::Result<RawOutput> {
        let output = Command::new(&self.binary)
            .arg(path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(output.into())
    }
}
