// crates/fingerprint-beacon-core/tests/activation.rs
// ============================================================================
// Module: Activation Tests
// Description: Runner entry points and once-per-session activation.
// ============================================================================
//! ## Overview
//! Exercises profile loading per run, configuration aborts, and the session guard.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use common::Behavior;
use common::RecordingAudit;
use common::ScriptedLoader;
use common::ScriptedTransport;
use common::StaticSource;
use common::fixed_clock;
use common::orchestrator;
use common::profile_document;
use common::report;
use fingerprint_beacon_core::ActivationOutcome;
use fingerprint_beacon_core::ActivationSession;
use fingerprint_beacon_core::ConfigurationError;
use fingerprint_beacon_core::ExecutionMode;
use fingerprint_beacon_core::FingerprintRunner;
use fingerprint_beacon_core::OriginId;
use fingerprint_beacon_core::RunError;
use fingerprint_beacon_core::SkipReason;
use fingerprint_beacon_core::SubmissionEndpoints;
use fingerprint_beacon_core::SubmissionMode;
use fingerprint_beacon_core::SubmissionOutcome;
use fingerprint_beacon_core::SubmissionPipeline;
use serde_json::json;

struct Harness {
    runner: FingerprintRunner,
    source: Arc<StaticSource>,
    transport: Arc<ScriptedTransport>,
    audit: Arc<RecordingAudit>,
}

fn harness(source: StaticSource, submit: bool) -> Harness {
    let loader = Arc::new(
        ScriptedLoader::new()
            .with("a", Behavior::Succeed(report("a", 0.8, json!({}))))
            .with("b", Behavior::Succeed(report("b", 0.8, json!({}))))
            .with("c", Behavior::Fail("no audio".to_string())),
    );
    let audit = Arc::new(RecordingAudit::default());
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond("fp", Ok(json!({"fp_id": "fp-1"})))
            .respond("event", Ok(json!({}))),
    );
    let source = Arc::new(source);
    let pipeline = submit.then(|| {
        SubmissionPipeline::new(
            Arc::clone(&transport) as _,
            fixed_clock(),
            Arc::clone(&audit) as _,
            SubmissionMode::TwoStep,
            SubmissionEndpoints {
                fingerprint: "fp".to_string(),
                event: "event".to_string(),
                unified: "unified".to_string(),
                collect: "collect".to_string(),
            },
            "HTML",
        )
    });
    let runner = FingerprintRunner::new(
        Arc::clone(&source) as _,
        orchestrator(loader, Arc::clone(&audit), ExecutionMode::Concurrent, Duration::from_secs(5)),
        pipeline,
        Arc::clone(&audit) as _,
    );
    Harness {
        runner,
        source,
        transport,
        audit,
    }
}

/// The profile document is fetched on every run.
#[tokio::test]
async fn run_fingerprint_reloads_profiles_each_time() {
    let harness = harness(StaticSource::json(&profile_document()), false);

    let basic = harness.runner.run_fingerprint(None).await.unwrap();
    let full = harness.runner.run_fingerprint(Some("full")).await.unwrap();

    assert_eq!(harness.source.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(basic.metadata().profile.as_str(), "basic");
    assert_eq!(basic.engines().len(), 2);
    assert_eq!(full.hash_strategy(), "weighted");
    assert_eq!(full.summary().failed, 1);
    let runs = harness.audit.runs.lock().unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs[1].digest.is_some());
}

/// Configuration errors abort the run before any engine or network call.
#[tokio::test]
async fn configuration_errors_abort_the_run() {
    let harness = harness(StaticSource::json(&profile_document()), true);
    let err = harness.runner.run_fingerprint(Some("missing")).await.unwrap_err();
    assert!(matches!(err, RunError::Configuration(ConfigurationError::ProfileNotFound(_))));

    let session = ActivationSession::new(Some(OriginId::new("b-1")));
    let err = harness.runner.activate(&session, Some("missing")).await.unwrap_err();
    assert!(matches!(err, RunError::Configuration(_)));
    assert!(harness.transport.calls().is_empty());
    assert!(session.is_sent());
    assert_eq!(harness.audit.runs.lock().unwrap().len(), 2);
}

/// Unavailable profile documents are configuration errors.
#[tokio::test]
async fn unavailable_source_is_configuration_error() {
    let harness = harness(StaticSource::unavailable(), true);
    let err = harness.runner.run_fingerprint(None).await.unwrap_err();
    assert!(matches!(err, RunError::Configuration(ConfigurationError::Fetch(_))));
}

/// Only the first activation of a session runs.
#[tokio::test]
async fn activation_runs_once_per_session() {
    let harness = harness(StaticSource::json(&profile_document()), true);
    let session = ActivationSession::new(Some(OriginId::new("b-1")));

    let first = harness.runner.activate(&session, None).await.unwrap();
    let second = harness.runner.activate(&session, None).await.unwrap();

    match first {
        ActivationOutcome::Completed(report) => {
            assert_eq!(report.envelope.metadata().profile.as_str(), "basic");
            assert_eq!(report.submission.label(), "registered");
        }
        ActivationOutcome::Skipped(reason) => panic!("unexpected skip: {reason:?}"),
    }
    assert_eq!(second, ActivationOutcome::Skipped(SkipReason::AlreadySent));
    assert_eq!(harness.transport.calls().len(), 2);
}

/// Sessions without an origin never run and stay unclaimed.
#[tokio::test]
async fn activation_requires_origin() {
    let harness = harness(StaticSource::json(&profile_document()), true);
    let session = ActivationSession::new(None);

    let outcome = harness.runner.activate(&session, None).await.unwrap();

    assert_eq!(outcome, ActivationOutcome::Skipped(SkipReason::MissingOrigin));
    assert!(!session.is_sent());
    assert_eq!(harness.source.fetches.load(Ordering::SeqCst), 0);
}

/// Independent sessions do not share the sent marker.
#[tokio::test]
async fn sessions_are_independent() {
    let harness = harness(StaticSource::json(&profile_document()), false);
    let first = ActivationSession::new(Some(OriginId::new("b-1")));
    let second = ActivationSession::new(Some(OriginId::new("b-2")));

    let (left, right) = tokio::join!(harness.runner.activate(&first, None), harness.runner.activate(&second, None));

    for outcome in [left.unwrap(), right.unwrap()] {
        match outcome {
            ActivationOutcome::Completed(report) => assert_eq!(report.submission, SubmissionOutcome::Disabled),
            ActivationOutcome::Skipped(reason) => panic!("unexpected skip: {reason:?}"),
        }
    }
}
