// tests/process_runner.rs

#![cfg(unix)]

mod common;

use ndkdrive::errors::DriveError;
use ndkdrive::exec::{Invocation, Milestones, ProcessRunner};
use ndkdrive::proto::{Event, ProtocolToken};

fn sh(script: impl Into<String>) -> Invocation {
    Invocation::new("sh").arg("-c").arg(script)
}

#[tokio::test]
async fn decodes_protocol_events_in_stream_order() {
    common::init_tracing();
    let runner = ProcessRunner::new(Milestones::new());
    let token = ProtocolToken::generate();

    let script = format!(
        "echo 'building...'; \
         echo '{token}{{\"event\":\"pause\"}}'; \
         echo 'still going'; \
         echo '{token}{{\"event\":\"timeout\",\"timeout\":5}}'"
    );
    let invocation = sh(script).protocol_token(token);

    let mut seen = Vec::new();
    let mut collect = |event: Event| seen.push(event);
    let outcome = runner.run(&invocation, Some(&mut collect)).await.unwrap();

    assert!(outcome.success);
    assert_eq!(seen, vec![Event::Pause, Event::Timeout { timeout: 5 }]);
    assert_eq!(outcome.events, seen);
}

#[tokio::test]
async fn malformed_protocol_lines_do_not_abort_the_run() {
    common::init_tracing();
    let runner = ProcessRunner::new(Milestones::new());
    let token = ProtocolToken::generate();

    let script = format!(
        "echo '{token}this is not json'; \
         echo '{token}{{\"event\":\"pause\"}}'"
    );
    let invocation = sh(script).protocol_token(token);

    let outcome = runner.run(&invocation, None).await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.events, vec![Event::Pause]);
}

#[tokio::test]
async fn nonzero_exit_is_a_command_failure() {
    common::init_tracing();
    let runner = ProcessRunner::new(Milestones::new());

    let err = runner.run(&sh("exit 3"), None).await.unwrap_err();
    assert!(matches!(err, DriveError::CommandFailed(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn mkdir_race_signature_makes_the_failure_transient() {
    common::init_tracing();
    let runner = ProcessRunner::new(Milestones::new());

    let script = "echo 'mkdir: cannot create directory /tmp/x: File exists' 1>&2; exit 2";
    let err = runner.run(&sh(script), None).await.unwrap_err();
    assert!(matches!(err, DriveError::TransientInfra(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn race_signature_on_a_successful_exit_is_not_an_error() {
    common::init_tracing();
    let runner = ProcessRunner::new(Milestones::new());

    let script = "echo 'mkdir: cannot create directory /tmp/x: File exists' 1>&2; exit 0";
    let outcome = runner.run(&sh(script), None).await.unwrap();
    assert!(outcome.success);
    assert!(outcome.transient_marker);
}

#[tokio::test]
async fn environment_overrides_layer_on_the_ambient_environment() {
    common::init_tracing();
    let runner = ProcessRunner::new(Milestones::new());

    let invocation = sh("test \"$APP_PIE\" = true && test -n \"$PATH\"")
        .env("APP_PIE", "true");
    let outcome = runner.run(&invocation, None).await.unwrap();
    assert!(outcome.success);
}

#[tokio::test]
async fn runs_in_the_requested_working_directory() {
    common::init_tracing();
    let runner = ProcessRunner::new(Milestones::new());
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().canonicalize().unwrap();

    let script = format!("test \"$(pwd -P)\" = '{}'", canonical.display());
    let invocation = sh(script).current_dir(dir.path());
    let outcome = runner.run(&invocation, None).await.unwrap();
    assert!(outcome.success);
}

#[tokio::test]
async fn unspawnable_program_reports_an_error() {
    common::init_tracing();
    let runner = ProcessRunner::new(Milestones::new());

    let invocation = Invocation::new("/nonexistent/ndkdrive-test-program");
    assert!(runner.run(&invocation, None).await.is_err());
}
