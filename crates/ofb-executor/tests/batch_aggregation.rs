//! Batch engine: chunking, per-item isolation, aggregation, escalation.

mod support;

use serde_json::json;

use ofb_executor::{OsaBridge, OsaConfig};
use ofb_types::{BatchResult, EntityKind, ErrorKind, ExecutionOutcome};
use support::{FakeRunner, asset_config};

fn task_ids(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("task-{i}")).collect()
}

fn report(succeeded: &[String], failed: &[(String, String)]) -> String {
    let failed: Vec<_> = failed
        .iter()
        .map(|(id, error)| json!({ "id": id, "error": error }))
        .collect();
    json!({ "succeeded": succeeded, "failed": failed }).to_string()
}

fn complete_op(id_var: &str) -> String {
    format!("mark complete (first flattened task whose id is {id_var})")
}

#[tokio::test]
async fn hundred_twenty_ids_make_three_chunks() {
    tracing_subscriber::fmt::try_init().ok();
    let ids = task_ids(120);
    let runner = FakeRunner::new();
    runner.push_stdout(&report(&ids[0..50], &[]));
    runner.push_stdout(&report(
        &[&ids[50..62], &ids[63..100]].concat(),
        &[("task-63".to_string(), "no such task".to_string())],
    ));
    runner.push_stdout(&report(&ids[100..120], &[]));

    let bridge = OsaBridge::with_runner(asset_config(), runner.clone());
    let outcome: ExecutionOutcome<BatchResult<String>> = bridge
        .run_batch(EntityKind::Task, &ids, &complete_op)
        .await;

    let result = outcome.into_result().unwrap();
    assert_eq!(runner.call_count(), 3);
    assert_eq!(result.total_succeeded, 119);
    assert_eq!(result.total_failed, 1);
    assert_eq!(result.total_succeeded + result.total_failed, 120);
    assert_eq!(result.failed[0].id, "task-63");
    assert_eq!(result.failed[0].error, "no such task");
    // The other 49 ids of the second chunk still succeeded.
    assert!(result.succeeded.contains(&"task-62".to_string()));
    assert!(result.succeeded.contains(&"task-64".to_string()));
}

#[tokio::test]
async fn chunk_programs_carry_fragments_then_scaffold() {
    let ids = task_ids(3);
    let runner = FakeRunner::new();
    runner.push_stdout(&report(&ids, &[]));

    let bridge = OsaBridge::with_runner(asset_config(), runner.clone());
    let outcome: ExecutionOutcome<BatchResult<String>> = bridge
        .run_batch(EntityKind::Task, &ids, &complete_op)
        .await;
    assert!(outcome.is_success());

    let programs = runner.recorded_programs();
    assert_eq!(programs.len(), 1);
    let program = &programs[0];
    let json_helper = program.find("on jsonEscape(s)").unwrap();
    let batch_helper = program.find("on emitBatchReport(").unwrap();
    let tell = program.find("tell application \"OmniFocus\"").unwrap();
    let loop_start = program
        .find("repeat with rawId in {\"task-1\", \"task-2\", \"task-3\"}")
        .unwrap();
    assert!(json_helper < batch_helper);
    assert!(batch_helper < tell);
    assert!(tell < loop_start);
}

#[tokio::test]
async fn chunk_sizes_follow_configured_bound() {
    let ids = task_ids(7);
    let runner = FakeRunner::new();
    runner.push_stdout(&report(&ids[0..3], &[]));
    runner.push_stdout(&report(&ids[3..6], &[]));
    runner.push_stdout(&report(&ids[6..7], &[]));

    let config = OsaConfig {
        chunk_size: 3,
        ..asset_config()
    };
    let bridge = OsaBridge::with_runner(config, runner.clone());
    let outcome: ExecutionOutcome<BatchResult<String>> = bridge
        .run_batch(EntityKind::Task, &ids, &complete_op)
        .await;

    assert!(outcome.is_success());
    assert_eq!(runner.call_count(), 3);
    let programs = runner.recorded_programs();
    assert!(programs[0].contains("{\"task-1\", \"task-2\", \"task-3\"}"));
    assert!(programs[2].contains("{\"task-7\"}"));
}

#[tokio::test]
async fn bridge_level_chunk_failure_aborts_the_batch() {
    let ids = task_ids(120);
    let runner = FakeRunner::new();
    runner.push_stdout(&report(&ids[0..50], &[]));
    runner.push_stderr("execution error: OmniFocus got an error: Application isn't running. (-600)");

    let bridge = OsaBridge::with_runner(asset_config(), runner.clone());
    let outcome: ExecutionOutcome<BatchResult<String>> = bridge
        .run_batch(EntityKind::Task, &ids, &complete_op)
        .await;

    assert_eq!(
        outcome.error().map(|e| e.code),
        Some(ErrorKind::OmniFocusNotRunning)
    );
    // The third chunk never ran.
    assert_eq!(runner.call_count(), 2);
}

#[tokio::test]
async fn malformed_chunk_report_is_a_parse_error() {
    let ids = task_ids(2);
    let runner = FakeRunner::new();
    runner.push_stdout("not a chunk report");

    let bridge = OsaBridge::with_runner(asset_config(), runner.clone());
    let outcome: ExecutionOutcome<BatchResult<String>> = bridge
        .run_batch(EntityKind::Task, &ids, &complete_op)
        .await;

    assert_eq!(
        outcome.error().map(|e| e.code),
        Some(ErrorKind::JsonParseError)
    );
}

#[tokio::test]
async fn missing_helper_fragment_fails_before_execution() {
    use assert_fs::prelude::*;

    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("helpers/json.applescript")
        .write_str("on jsonEscape(s)\nend jsonEscape\n")
        .unwrap();
    // No helpers/batch.applescript in this root.
    let runner = FakeRunner::new();
    let config = OsaConfig {
        asset_root: temp.path().to_path_buf(),
        ..OsaConfig::default()
    };
    let bridge = OsaBridge::with_runner(config, runner.clone());

    let outcome: ExecutionOutcome<BatchResult<String>> = bridge
        .run_batch(EntityKind::Task, &task_ids(2), &complete_op)
        .await;

    assert_eq!(
        outcome.error().map(|e| e.code),
        Some(ErrorKind::UnknownError)
    );
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn helper_fragments_are_cached_across_chunks() {
    let ids = task_ids(120);
    let runner = FakeRunner::new();
    for chunk in ids.chunks(50) {
        runner.push_stdout(&report(chunk, &[]));
    }

    let bridge = OsaBridge::with_runner(asset_config(), runner.clone());
    let outcome: ExecutionOutcome<BatchResult<String>> = bridge
        .run_batch(EntityKind::Task, &ids, &complete_op)
        .await;

    assert!(outcome.is_success());
    assert_eq!(bridge.assets().cached_len(), 2);
}
