//! Signal handling specs
//!
//! SIGTERM/SIGINT stop the daemon; SIGHUP/SIGUSR1 reload the job files.

use crate::prelude::*;

const SLOW: &str = "name: slow\ncron: '@every 100ms'\ncommand: sleep 30\n";

#[test]
fn term_stops_running_jobs_and_exits_zero() {
    let temp = Project::empty();
    temp.file("jobs.yml", SLOW);
    let log = temp.log_path();
    let daemon = temp
        .kron()
        .args(&["-f", "jobs.yml", "--log-file", &log.to_string_lossy()])
        .spawn();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || temp.log().contains("job started")));
    let start = std::time::Instant::now();
    daemon.signal("TERM");
    daemon.wait().exit_code(0).stderr_lacks("Error:");

    // sleep 30 was killed rather than awaited
    assert!(start.elapsed() < std::time::Duration::from_secs(10));
}

#[yare::parameterized(
    hup  = { "HUP" },
    usr1 = { "USR1" },
)]
fn reload_picks_up_new_jobs(signal: &str) {
    let temp = Project::empty();
    temp.file("jobs.yml", "name: first\ncron: '@hourly'\ncommand: 'true'\n");
    let log = temp.log_path();
    let daemon = temp
        .kron()
        .args(&["-f", "jobs.yml", "--log-file", &log.to_string_lossy()])
        .spawn();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || temp.log().contains("scheduler started")));

    temp.file(
        "jobs.yml",
        "name: second\ncron: '@every 100ms'\ncommand: echo second\n",
    );
    daemon.signal(signal);

    let fired = wait_for(SPEC_WAIT_MAX_MS, || {
        temp.output_files()
            .iter()
            .any(|f| f.starts_with("kron-task-second-"))
    });
    assert!(fired, "reloaded job did not fire\nlog: {}", temp.log());
    assert!(temp.log().contains("reload complete"));

    daemon.signal("TERM");
    daemon.wait().exit_code(0);
}

#[test]
fn reload_with_broken_file_exits_one() {
    let temp = Project::empty();
    temp.file("jobs.yml", "name: first\ncron: '@hourly'\ncommand: 'true'\n");
    let log = temp.log_path();
    let daemon = temp
        .kron()
        .args(&["-f", "jobs.yml", "--log-file", &log.to_string_lossy()])
        .spawn();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || temp.log().contains("scheduler started")));

    temp.file("jobs.yml", "name: [unclosed\n");
    daemon.signal("HUP");

    daemon
        .wait()
        .exit_code(1)
        .stderr_has("Error: failed to load jobs");
}
