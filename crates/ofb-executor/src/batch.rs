//! Chunked batch execution.
//!
//! Every multi-item mutation funnels through [`OsaBridge::run_batch`]:
//! ids are validated up front, partitioned into bounded chunks, and each
//! chunk runs as one script whose `repeat` loop isolates per-item
//! failures inside the interpreter. Chunks run strictly sequentially -
//! the host application is a single-instance desktop process with no
//! concurrency guarantees for simultaneous automation sessions.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use ofb_script::{ScriptId, compose, wire};
use ofb_types::{
    BatchFailure, BatchResult, EntityKind, ErrorKind, ExecutionOutcome, StructuredError,
};

use crate::bridge::{BATCH_HELPER, JSON_HELPER, OsaBridge};
use crate::runner::ProgramRunner;

/// The per-item operation template for a batch.
///
/// Implementations receive the name of the loop variable holding the
/// current item's id and return the AppleScript statements performing the
/// operation on it. The engine owns the surrounding `repeat`/`try`
/// scaffold, so per-item isolation cannot be opted out of.
pub trait BatchOperation: Send + Sync {
    /// Statements operating on the item whose id is bound to `id_var`.
    fn per_item(&self, id_var: &str) -> String;
}

impl<F> BatchOperation for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn per_item(&self, id_var: &str) -> String {
        self(id_var)
    }
}

/// One chunk's report, as emitted by the batch helper fragment.
#[derive(Debug, Deserialize)]
struct ChunkReport<T> {
    succeeded: Vec<T>,
    failed: Vec<BatchFailure>,
}

/// Generate the per-chunk loop scaffold around the operation template.
fn chunk_body(op: &dyn BatchOperation, ids: &[ScriptId]) -> String {
    let mut body = String::new();
    body.push_str("set succeededIds to {}\n");
    body.push_str("set failedItems to {}\n");
    body.push_str(&format!(
        "repeat with rawId in {}\n",
        wire::id_list_literal(ids)
    ));
    body.push_str("\tset itemId to contents of rawId\n");
    body.push_str("\ttry\n");
    for line in op.per_item("itemId").lines() {
        body.push_str("\t\t");
        body.push_str(line);
        body.push('\n');
    }
    body.push_str("\t\tset end of succeededIds to itemId\n");
    body.push_str("\ton error errMsg\n");
    body.push_str("\t\tset end of failedItems to {itemId, errMsg}\n");
    body.push_str("\tend try\n");
    body.push_str("end repeat\n");
    body.push_str("return my emitBatchReport(succeededIds, failedItems)\n");
    body
}

impl<R: ProgramRunner> OsaBridge<R> {
    /// Run one operation across many ids, chunked and aggregated.
    ///
    /// - Empty `ids` is a [`ErrorKind::ValidationError`]; nothing executes.
    /// - Every id is validated before the first chunk runs; the first
    ///   invalid id fails the whole call.
    /// - Per-item failures reported by a chunk's script surface as data
    ///   in [`BatchResult::failed`]. A chunk that fails at the bridge
    ///   level (process error, malformed report) fails the whole call -
    ///   chunk-level failure is never demoted to a per-item failure.
    pub async fn run_batch<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        ids: &[String],
        op: &dyn BatchOperation,
    ) -> ExecutionOutcome<BatchResult<T>> {
        if ids.is_empty() {
            return ExecutionOutcome::err(StructuredError::validation(
                "batch requires at least one id",
            ));
        }

        let validated: Vec<ScriptId> = match ids
            .iter()
            .map(|raw| ScriptId::parse(kind, raw))
            .collect::<Result<_, _>>()
        {
            Ok(ids) => ids,
            Err(e) => return ExecutionOutcome::err(e),
        };

        let json_helper = match self.load_fragment(JSON_HELPER) {
            Ok(f) => f,
            Err(e) => return ExecutionOutcome::err(e),
        };
        let batch_helper = match self.load_fragment(BATCH_HELPER) {
            Ok(f) => f,
            Err(e) => return ExecutionOutcome::err(e),
        };

        let chunk_size = self.config().chunk_size.max(1);
        let total_chunks = validated.len().div_ceil(chunk_size);
        let mut aggregate = BatchResult::new();

        // Sequential on purpose; see the module docs.
        for (index, chunk) in validated.chunks(chunk_size).enumerate() {
            tracing::debug!(
                chunk = index + 1,
                of = total_chunks,
                size = chunk.len(),
                "executing batch chunk"
            );
            let body = chunk_body(op, chunk);
            let program = compose(&[&json_helper, &batch_helper], &body);
            let value = match self.execute(&program).await.into_result() {
                Ok(value) => value,
                Err(e) => return ExecutionOutcome::err(e),
            };
            let report: ChunkReport<T> = match serde_json::from_value(value) {
                Ok(report) => report,
                Err(e) => {
                    return ExecutionOutcome::err(
                        StructuredError::new(
                            ErrorKind::JsonParseError,
                            "batch chunk emitted a malformed report",
                        )
                        .with_details(e.to_string()),
                    );
                }
            };
            aggregate.absorb(report.succeeded, report.failed);
        }

        aggregate.finalize();
        ExecutionOutcome::ok(aggregate)
    }
}
