// crates/fingerprint-beacon-cli/tests/run_command.rs
// ============================================================================
// Module: Run Wiring Tests
// Description: End-to-end activation through config-driven wiring.
// Dependencies: fingerprint-beacon-cli, fingerprint-beacon-config, tiny_http
// ============================================================================
//! ## Overview
//! Builds runners from TOML config and drives full activations against a
//! local backend.

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

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use fingerprint_beacon_cli::wiring;
use fingerprint_beacon_cli::wiring::Delivery;
use fingerprint_beacon_config::FingerprintBeaconConfig;
use fingerprint_beacon_core::ActivationOutcome;
use fingerprint_beacon_core::ActivationSession;
use fingerprint_beacon_core::EngineId;
use fingerprint_beacon_core::NoopAuditSink;
use fingerprint_beacon_core::OriginId;
use fingerprint_beacon_core::SkipReason;
use fingerprint_beacon_core::SubmissionOutcome;
use serde_json::Value;
use tiny_http::Response;
use tiny_http::Server;

/// Inline profile document shared by the tests.
const PROFILES: &str = r#"
[profiles]
source = "inline"

[profiles.document]
default = "basic"

[profiles.document.profiles.basic]
hash_strategy = "sha256"

[profiles.document.profiles.basic.engines]
host = true
env = true
canvas = true
audio = false
"#;

/// Serves one scripted response per request and reports `(path, body)`.
fn spawn_backend(responses: Vec<(&'static str, u16)>) -> (String, mpsc::Receiver<(String, Value)>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for (body, status) in responses {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let mut received = String::new();
            let _ = request.as_reader().read_to_string(&mut received);
            let parsed = serde_json::from_str(&received).unwrap_or(Value::Null);
            let _ = sender.send((request.url().to_string(), parsed));
            let _ = request.respond(Response::from_string(body).with_status_code(status));
        }
    });
    (format!("http://{addr}"), receiver)
}

/// Parses the shared profiles plus a `[submission]` section.
fn config_with_submission(submission: &str) -> FingerprintBeaconConfig {
    FingerprintBeaconConfig::parse(&format!("{PROFILES}\n{submission}")).unwrap()
}

/// Two-step delivery registers the VIEW event with the returned identifier.
#[tokio::test]
async fn two_step_activation_registers_view() {
    let (base_url, requests) =
        spawn_backend(vec![(r#"{"status":"ok","fp_id":"fp-42","nuevo":true}"#, 200), (r#"{"ok":true}"#, 200)]);
    let config = config_with_submission(&format!(
        "[submission]\nenabled = true\norigin = \"baliza-1\"\nbase_url = \"{base_url}\""
    ));
    let runner = wiring::build_runner(&config, Delivery::Http, Arc::new(NoopAuditSink)).unwrap();
    let session = ActivationSession::new(config.submission.origin_id());

    let outcome = runner.activate(&session, None).await.unwrap();

    let ActivationOutcome::Completed(report) = outcome else {
        panic!("expected completed activation");
    };
    assert!(matches!(
        &report.submission,
        SubmissionOutcome::Registered { fingerprint_id, .. } if fingerprint_id.as_str() == "fp-42"
    ));
    let engines = report.envelope.engines();
    assert_eq!(engines.len(), 4);
    assert!(engines.get(&EngineId::new("host")).unwrap().report().is_some());
    assert!(engines.get(&EngineId::new("canvas")).unwrap().is_failure());
    assert!(engines.get(&EngineId::new("audio")).unwrap().is_disabled());

    let (path, body) = requests.recv().unwrap();
    assert_eq!(path, "/webhook/fingerprint");
    assert_eq!(body["baliza_id"], "baliza-1");
    assert_eq!(body["fingerprint"]["metadata"]["profile"], "basic");
    let (path, body) = requests.recv().unwrap();
    assert_eq!(path, "/balizas/event");
    assert_eq!(body["fingerprint_id"], "fp-42");
    assert_eq!(body["tipo"], "HTML");
    assert_eq!(body["evento"], "VIEW");

    let again = runner.activate(&session, None).await.unwrap();
    assert_eq!(again, ActivationOutcome::Skipped(SkipReason::AlreadySent));
}

/// Backend failures are reported in the outcome, not raised.
#[tokio::test]
async fn backend_failure_is_reported_not_raised() {
    let (base_url, _requests) = spawn_backend(vec![("unavailable", 503)]);
    let config = config_with_submission(&format!("[submission]\nenabled = true\nbase_url = \"{base_url}\""));
    let runner = wiring::build_runner(&config, Delivery::Http, Arc::new(NoopAuditSink)).unwrap();

    let outcome = runner.activate(&ActivationSession::new(Some(OriginId::new("b"))), None).await.unwrap();

    let ActivationOutcome::Completed(report) = outcome else {
        panic!("expected completed activation");
    };
    assert!(matches!(report.submission, SubmissionOutcome::SubmitFailed { .. }));
}

/// Collect mode makes a single call with the whole envelope.
#[tokio::test]
async fn collect_mode_sends_one_request() {
    let (base_url, requests) = spawn_backend(vec![(r#"{"fingerprint_id": 9}"#, 200)]);
    let config = config_with_submission(&format!(
        "[submission]\nenabled = true\nmode = \"collect\"\nbase_url = \"{base_url}\""
    ));
    let runner = wiring::build_runner(&config, Delivery::Http, Arc::new(NoopAuditSink)).unwrap();

    let outcome = runner.activate(&ActivationSession::new(Some(OriginId::new("b-9"))), None).await.unwrap();

    let ActivationOutcome::Completed(report) = outcome else {
        panic!("expected completed activation");
    };
    assert!(matches!(report.submission, SubmissionOutcome::Collected { .. }));
    let (path, body) = requests.recv().unwrap();
    assert_eq!(path, "/fingerprint/collect");
    assert_eq!(body["source_type"], "baliza");
    assert_eq!(body["origen"], "HTML");
    assert_eq!(body["profile"], "basic");
}

/// Disabled delivery still runs every engine.
#[tokio::test]
async fn disabled_delivery_runs_engines_only() {
    let config = config_with_submission("[submission]\nenabled = false");
    assert_eq!(Delivery::select(&config, false, false), Delivery::Disabled);
    let runner = wiring::build_runner(&config, Delivery::Disabled, Arc::new(NoopAuditSink)).unwrap();

    let envelope = runner.run_fingerprint(Some("basic")).await.unwrap();
    let submission = runner.submit(&OriginId::new("b"), &envelope).await;

    assert_eq!(envelope.engines().len(), 4);
    assert_eq!(submission, SubmissionOutcome::Disabled);
}

/// Unknown forced profiles abort the run.
#[tokio::test]
async fn unknown_profile_is_a_run_error() {
    let config = config_with_submission("");
    let runner = wiring::build_runner(&config, Delivery::Disabled, Arc::new(NoopAuditSink)).unwrap();
    assert!(runner.run_fingerprint(Some("missing")).await.is_err());
}

/// Delivery selection honours the command-line switches.
#[test]
fn delivery_selection() {
    let config = config_with_submission("[submission]\nenabled = true\nbase_url = \"https://collector.test\"");
    assert_eq!(Delivery::select(&config, false, false), Delivery::Http);
    assert_eq!(Delivery::select(&config, true, false), Delivery::DryRun);
    assert_eq!(Delivery::select(&config, false, true), Delivery::Disabled);
}

/// File audit sinks need a writable path.
#[test]
fn file_audit_sink_opens_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let config = FingerprintBeaconConfig::parse(&format!("[audit]\nsink = \"file\"\npath = {:?}", path.display().to_string())).unwrap();
    assert!(wiring::audit_sink(&config.audit).is_ok());
}
