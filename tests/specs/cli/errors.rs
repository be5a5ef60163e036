//! CLI error handling specs
//!
//! Configuration problems end the process with a message and exit code.

use crate::prelude::*;

#[test]
fn file_flag_is_required() {
    cli().fails().exit_code(2).stderr_has("--file <PATH>");
}

#[test]
fn missing_job_file() {
    let temp = Project::empty();
    temp.kron()
        .args(&["-f", "nope.yml"])
        .fails()
        .exit_code(1)
        .stderr_has("Error: failed to load jobs: failed to read nope.yml");
}

#[test]
fn unsupported_extension() {
    let temp = Project::empty();
    temp.file("jobs.txt", "name: a\n");
    temp.kron()
        .args(&["-f", "jobs.txt"])
        .fails()
        .exit_code(1)
        .stderr_has("not a valid job file: jobs.txt");
}

#[test]
fn job_without_command() {
    let temp = Project::empty();
    temp.file("jobs.yml", "name: idle\ncron: '@hourly'\n");
    temp.kron()
        .args(&["-f", "jobs.yml"])
        .fails()
        .exit_code(1)
        .stderr_has("Error: invalid job config: idle has neither command nor script");
}

#[test]
fn bad_schedule() {
    let temp = Project::empty();
    temp.file("jobs.json", r#"{"name": "a", "cron": "every tuesday", "command": "true"}"#);
    temp.kron()
        .args(&["-f", "jobs.json"])
        .fails()
        .exit_code(1)
        .stderr_has("Error: invalid schedule 'every tuesday'");
}

#[test]
fn invalid_retention() {
    let temp = Project::empty();
    temp.file("jobs.yml", "name: a\ncron: '@hourly'\ncommand: 'true'\n");
    temp.kron()
        .args(&["-f", "jobs.yml", "--retention", "forever"])
        .fails()
        .exit_code(1)
        .stderr_has("invalid retention: unknown retention policy 'forever'");
}
