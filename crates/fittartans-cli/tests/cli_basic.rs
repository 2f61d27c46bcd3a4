//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated data directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_fittartans"))
        .args(args)
        .env("FITTARTANS_HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

/// Write a small three-source input file.
fn write_inputs(dir: &Path) -> String {
    let inputs = serde_json::json!({
        "calendar": [
            {"Summary": "15-213 Lecture", "Start": "2025-10-06T14:30:00-04:00", "End": "2025-10-06T15:30:00-04:00"},
            {"Summary": "Fall Break", "Start": "2025-10-16", "End": "2025-10-17"}
        ],
        "eventbrite": [
            {"title": "Sunrise Yoga", "date_time": "Saturday, October 11 · 8:00 - 9:00am EDT", "venue": "Studio B"}
        ],
        "groupx": [
            {"class_name": "Spin", "weekday": "Mon", "start_time_local": "2:00 PM", "end_time_local": "3:00 PM",
             "term_start_date": "2025-10-06", "term_end_date": "2025-10-13", "studio": "Studio A"}
        ]
    });
    let path = dir.join("inputs.json");
    std::fs::write(&path, serde_json::to_string(&inputs).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

const NOW: &str = "2025-10-01T00:00:00Z";

#[test]
fn test_timeline_combine() {
    let home = tempfile::tempdir().unwrap();
    let input = write_inputs(home.path());
    let report = run_json(home.path(), &["timeline", "combine", "-i", &input, "--now", NOW]);

    let titles: Vec<_> = report["merged"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["15-213 Lecture", "Sunrise Yoga", "Spin"]);
    assert_eq!(report["removed"][0]["reason"], "lower_priority");
    assert_eq!(report["skipped"]["calendar"], 1);
}

#[test]
fn test_timeline_normalize_single_source() {
    let home = tempfile::tempdir().unwrap();
    let input = write_inputs(home.path());
    let report = run_json(
        home.path(),
        &["timeline", "normalize", "-i", &input, "--now", NOW, "--source", "groupx"],
    );
    assert_eq!(report["events"].as_array().unwrap().len(), 2);
    assert_eq!(report["events"][0]["source"], "groupx");
}

#[test]
fn test_timeline_free_single_day() {
    let home = tempfile::tempdir().unwrap();
    let input = write_inputs(home.path());
    let days = run_json(
        home.path(),
        &["timeline", "free", "-i", &input, "--from", "2025-10-06", "--to", "2025-10-06"],
    );
    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 1);
    // 06:00-22:00 window split around the lecture
    assert_eq!(days[0]["free"].as_array().unwrap().len(), 2);
}

#[test]
fn test_timeline_export_ics() {
    let home = tempfile::tempdir().unwrap();
    let input = write_inputs(home.path());
    let out = home.path().join("timeline.ics");
    let (_, stderr, code) = run_cli(
        home.path(),
        &["timeline", "export", "-i", &input, "--now", NOW, "-o", out.to_str().unwrap()],
    );
    assert_eq!(code, 0, "{stderr}");

    let ics = std::fs::read_to_string(out).unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 3);
}

#[test]
fn test_recommend_list_and_plan() {
    let home = tempfile::tempdir().unwrap();
    let input = write_inputs(home.path());

    let list = run_json(home.path(), &["recommend", "list", "-i", &input, "--now", NOW]);
    let list = list.as_array().unwrap();
    // The 6 Oct spin class overlaps the lecture and is never offered
    assert_eq!(list.len(), 2);
    for rec in list {
        let score = rec["score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));
    }

    let plan = run_json(home.path(), &["recommend", "plan", "-i", &input, "--now", NOW]);
    assert_eq!(plan.as_array().unwrap().len(), 2);
}

#[test]
fn test_insights_show() {
    let home = tempfile::tempdir().unwrap();
    let input = write_inputs(home.path());
    let summary = run_json(home.path(), &["insights", "show", "-i", &input, "--now", NOW]);
    assert_eq!(summary["total_events"], 3);
    assert_eq!(summary["busiest_day"], "Mon");
}

#[test]
fn test_config_get_set_reset() {
    let home = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "top_k"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "5");

    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "top_k", "3"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "top_k = 3");
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "top_k"]);
    assert_eq!(stdout.trim(), "3");
    assert!(home.path().join("config.toml").exists());

    let (_, _, code) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let list = run_json(home.path(), &["config", "list", "--json"]);
    assert_eq!(list["top_k"], 5);
    assert_eq!(list["timezone"], "America/New_York");

    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("timezone = \"America/New_York\""));
}

#[test]
fn test_invalid_input_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["timeline", "combine", "-i", "/nonexistent/inputs.json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (_, _, code) = run_cli(home.path(), &["config", "get", "no_such_key"]);
    assert_ne!(code, 0);
}
