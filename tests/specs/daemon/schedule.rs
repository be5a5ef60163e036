//! Scheduled run specs
//!
//! Jobs fire on their trigger, write output files, and chain hooks.

use crate::prelude::*;

#[test]
fn job_fires_and_writes_output() {
    let temp = Project::empty();
    temp.file(
        "jobs.yml",
        "name: tick\ncron: '@every 100ms'\ncommand: echo tick\n",
    );
    let log = temp.log_path();
    let daemon = temp
        .kron()
        .args(&["-f", "jobs.yml", "--log-file", &log.to_string_lossy()])
        .spawn();

    let fired = wait_for(SPEC_WAIT_MAX_MS, || {
        temp.output_files()
            .iter()
            .any(|f| f.starts_with("kron-task-tick-") && f.ends_with(".log"))
    });
    assert!(fired, "no output file\nlog: {}", temp.log());
    assert!(wait_for(SPEC_WAIT_MAX_MS, || temp.log().contains("job finished")));

    daemon.signal("TERM");
    daemon.wait().exit_code(0);
    assert!(temp.log().contains("job loaded"));
    assert!(temp.log().contains("job started"));
}

#[test]
fn failing_job_runs_error_hook() {
    let temp = Project::empty();
    let marker = temp.path().join("hook.txt");
    temp.file(
        "jobs.yml",
        &format!(
            r#"
name: flaky
cron: "@every 100ms"
script: |
  echo primary-output
  exit 1
onerror:
  script: cat "$1" > {}
oncomplete:
  command: touch {}.complete
"#,
            marker.display(),
            marker.display()
        ),
    );
    let log = temp.log_path();
    let daemon = temp
        .kron()
        .args(&["-f", "jobs.yml", "--log-file", &log.to_string_lossy()])
        .spawn();

    let hooked = wait_for(SPEC_WAIT_MAX_MS, || {
        temp.read("hook.txt") == "primary-output\n"
    });
    assert!(hooked, "hook did not run\nlog: {}", temp.log());

    daemon.signal("INT");
    daemon.wait().exit_code(0);
    assert!(temp.log().contains("job failed"));
    assert!(temp.log().contains("flaky onerror hook"));
    assert!(!temp.path().join("hook.txt.complete").exists());
}

#[test]
fn json_logs_are_json_lines() {
    let temp = Project::empty();
    temp.file(
        "jobs.yml",
        "name: tick\ncron: '@every 100ms'\ncommand: 'true'\n",
    );
    let log = temp.log_path();
    let daemon = temp
        .kron()
        .args(&["-f", "jobs.yml", "--json", "--log-file", &log.to_string_lossy()])
        .spawn();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || temp.log().contains("job finished")));
    daemon.signal("TERM");
    daemon.wait().exit_code(0);

    for line in temp.log().lines() {
        let value: serde_json::Value = serde_json::from_str(line)
            .unwrap_or_else(|e| panic!("not JSON ({e}): {line}"));
        assert!(value.get("level").is_some(), "no level: {line}");
    }
}

#[test]
fn delete_retention_removes_output() {
    let temp = Project::empty();
    temp.file(
        "jobs.yml",
        "name: tick\ncron: '@every 100ms'\ncommand: echo tick\n",
    );
    let log = temp.log_path();
    let daemon = temp
        .kron()
        .args(&["-f", "jobs.yml", "--log-file", &log.to_string_lossy()])
        .env("KRON_RETENTION", "delete")
        .spawn();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || temp.log().contains("job finished")));
    daemon.signal("TERM");
    daemon.wait().exit_code(0);

    assert!(temp.output_files().is_empty(), "got: {:?}", temp.output_files());
}
