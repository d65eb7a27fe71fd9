//! Shared test support: a scriptable, counting fake runner.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ofb_executor::{OsaConfig, ProgramRunner, RawOutput};

/// Canned response for one invocation.
pub enum Canned {
    Output(RawOutput),
    SpawnError(io::ErrorKind, String),
}

#[derive(Default)]
struct Inner {
    calls: AtomicUsize,
    responses: Mutex<VecDeque<Canned>>,
    programs: Mutex<Vec<String>>,
}

/// A `ProgramRunner` that replays canned outputs and records invocations.
///
/// Clones share state, so a test can keep a handle while the bridge owns
/// the other and still assert on invocation counts.
#[derive(Clone, Default)]
pub struct FakeRunner {
    inner: Arc<Inner>,
}

#[allow(dead_code)]
impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_stdout(&self, stdout: &str) {
        self.push(Canned::Output(RawOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        }));
    }

    pub fn push_stderr(&self, stderr: &str) {
        self.push(Canned::Output(RawOutput {
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_code: Some(1),
        }));
    }

    pub fn push_raw(&self, stdout: &str, stderr: &str, exit_code: i32) {
        self.push(Canned::Output(RawOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code: Some(exit_code),
        }));
    }

    pub fn push_spawn_error(&self, kind: io::ErrorKind, message: &str) {
        self.push(Canned::SpawnError(kind, message.to_string()));
    }

    pub fn push(&self, canned: Canned) {
        self.inner.responses.lock().unwrap().push_back(canned);
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn recorded_programs(&self) -> Vec<String> {
        self.inner.programs.lock().unwrap().clone()
    }

    fn next(&self, recorded: String) -> io::Result<RawOutput> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.programs.lock().unwrap().push(recorded);
        match self.inner.responses.lock().unwrap().pop_front() {
            Some(Canned::Output(output)) => Ok(output),
            Some(Canned::SpawnError(kind, message)) => Err(io::Error::new(kind, message)),
            None => panic!("FakeRunner ran out of canned responses"),
        }
    }
}

#[async_trait]
impl ProgramRunner for FakeRunner {
    async fn run_inline(&self, program: &str) -> io::Result<RawOutput> {
        self.next(program.to_string())
    }

    async fn run_file(&self, path: &Path, args: &[String]) -> io::Result<RawOutput> {
        self.next(format!("{}|{}", path.display(), args.join(",")))
    }
}

/// Config pointing at the repository's real fragment assets.
#[allow(dead_code)]
pub fn asset_config() -> OsaConfig {
    OsaConfig {
        asset_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/scripts"),
        ..OsaConfig::default()
    }
}
