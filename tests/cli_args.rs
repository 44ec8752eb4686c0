// CLI argument validation drives the compiled binary; invalid durations
// must exit non-fatally with a user-facing message before any simulation
// starts.

use assert_cmd::Command;

fn run_with_args(args: &[&str]) -> std::process::Output {
    Command::cargo_bin("jiggl")
        .unwrap()
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn rejects_zero_hours() {
    let output = run_with_args(&["0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("positive number of hours"),
        "stderr: {stderr}"
    );
}

#[test]
fn rejects_more_than_a_day() {
    let output = run_with_args(&["24.5"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("capped at 24 hours"), "stderr: {stderr}");
}

#[test]
fn rejects_non_numeric_duration() {
    let output = run_with_args(&["soon"]);
    assert!(!output.status.success());
}

#[test]
fn requires_a_duration() {
    let output = run_with_args(&[]);
    assert!(!output.status.success());
}

#[test]
fn help_mentions_the_duration_bounds() {
    let output = run_with_args(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hours"));
}

// Real-clock smoke run: 0.001 hours is a single truncated window of a few
// seconds. Slowest test in the suite, but it exercises the actual binary
// end to end.
#[test]
fn tiny_session_completes() {
    let mut cmd = Command::cargo_bin("jiggl").unwrap();
    let assert = cmd
        .args(["0.001", "--seed", "7"])
        .timeout(std::time::Duration::from_secs(120))
        .assert()
        .success();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("session stopped"), "stdout: {stdout}");
}
