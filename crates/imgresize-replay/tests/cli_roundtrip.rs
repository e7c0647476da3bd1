//! End-to-end: script file in, report and trace file out, then verify.

use std::fs;
use std::path::Path;

use imgresize_replay::cli::{Cli, Commands, MetricsArgs, OutputFormat, RunArgs, VerifyArgs, run};
use serde_json::Value;
use tempfile::tempdir;

const SCRIPT: &str = r#"{
    "viewport": { "width": 1024.0, "height": 768.0 },
    "target": { "width": 400, "height": 200, "left": 100.0, "top": 30.0, "container_width": 800 },
    "steps": [
        { "step": "activate" },
        { "step": "event", "event": { "event": "pointer_down", "position": { "x": 900.0, "y": 700.0 } } },
        { "step": "event", "event": { "event": "tick" } },
        { "step": "toolbar", "action": { "action": "size", "value": "medium" } },
        { "step": "event", "event": { "event": "pointer_down", "position": { "x": 500.0, "y": 230.0 } } },
        { "step": "event", "event": { "event": "pointer_move", "position": { "x": 540.0, "y": 235.0 } } },
        { "step": "event", "event": { "event": "pointer_up", "position": { "x": 540.0, "y": 235.0 } } },
        { "step": "toolbar", "action": { "action": "align", "value": "center" } }
    ]
}"#;

fn write_script(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("session.json");
    fs::write(&path, text).unwrap();
    path
}

fn run_to_string(cli: Cli) -> Result<String, imgresize_replay::ReplayError> {
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn run_writes_json_report_and_trace() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), SCRIPT);
    let trace = dir.path().join("session.trace.jsonl");

    let output = run_to_string(Cli {
        command: Commands::Run(RunArgs {
            script: script.clone(),
            format: OutputFormat::Json,
            trace: Some(trace.clone()),
            metrics: MetricsArgs::default(),
        }),
    })
    .unwrap();

    let report: Value = serde_json::from_str(&output).unwrap();
    // Same-tick outside click is ignored; the later one never happens.
    assert_eq!(report["dismiss_count"], 0);
    // preset, resize, alignment
    assert_eq!(report["mutate_count"], 3);
    assert_eq!(report["live_listeners"], 4);
    assert_eq!(
        report["live_kinds"],
        serde_json::json!([
            "escape_key",
            "target_mutation",
            "viewport_change",
            "outside_pointer_down"
        ])
    );
    assert_eq!(report["target"]["explicit_size"]["width"], 440);
    assert_eq!(report["target"]["explicit_size"]["height"], 220);
    let classes: Vec<&str> = report["target"]["classes"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(classes, vec!["align-center"]);
    assert_eq!(report["overlay"]["toolbar"]["side"], "below");

    let lines = fs::read_to_string(&trace).unwrap();
    assert_eq!(lines.lines().count(), 10);
    assert!(lines.lines().next().unwrap().contains("imgresize-trace-v1"));

    let verified = run_to_string(Cli {
        command: Commands::Verify(VerifyArgs {
            script,
            trace,
            format: OutputFormat::Text,
            metrics: MetricsArgs::default(),
        }),
    })
    .unwrap();
    assert!(verified.contains("callbacks: dismiss=0 mutate=3 live_listeners=4"));
    assert!(verified.contains("listeners: escape_key target_mutation viewport_change"));
}

#[test]
fn verify_detects_script_drift() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), SCRIPT);
    let trace = dir.path().join("t.jsonl");
    run_to_string(Cli {
        command: Commands::Run(RunArgs {
            script,
            format: OutputFormat::Text,
            trace: Some(trace.clone()),
            metrics: MetricsArgs::default(),
        }),
    })
    .unwrap();

    let drifted = dir.path().join("drifted.json");
    fs::write(&drifted, SCRIPT.replacen("540.0", "560.0", 1)).unwrap();
    let error = run_to_string(Cli {
        command: Commands::Verify(VerifyArgs {
            script: drifted,
            trace,
            format: OutputFormat::Text,
            metrics: MetricsArgs::default(),
        }),
    })
    .unwrap_err();
    assert_eq!(error.exit_code(), 3);
    assert!(error.to_string().contains("step 6"));
}

#[test]
fn missing_script_is_io_error() {
    let dir = tempdir().unwrap();
    let error = run_to_string(Cli {
        command: Commands::Run(RunArgs {
            script: dir.path().join("nope.json"),
            format: OutputFormat::Text,
            trace: None,
            metrics: MetricsArgs::default(),
        }),
    })
    .unwrap_err();
    assert_eq!(error.exit_code(), 1);
    assert!(error.to_string().contains("nope.json"));
}

#[test]
fn malformed_script_is_json_error() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "{ \"target\": ");
    let error = run_to_string(Cli {
        command: Commands::Run(RunArgs {
            script,
            format: OutputFormat::Text,
            trace: None,
            metrics: MetricsArgs::default(),
        }),
    })
    .unwrap_err();
    assert!(matches!(error, imgresize_replay::ReplayError::Json(_)));
}
