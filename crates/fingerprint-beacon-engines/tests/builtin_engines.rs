// crates/fingerprint-beacon-engines/tests/builtin_engines.rs
// ============================================================================
// Module: Built-in Engine Tests
// Description: Environment and file-backed engine behavior and limits.
// ============================================================================
//! ## Overview
//! Exercises allow/deny filtering, size caps, and capture parsing.

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

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::time::Duration;

use fingerprint_beacon_core::Engine;
use fingerprint_beacon_core::EngineError;
use fingerprint_beacon_engines::EnvEngine;
use fingerprint_beacon_engines::EnvEngineConfig;
use fingerprint_beacon_engines::FileEngine;
use fingerprint_beacon_engines::FileEngineConfig;
use serde_json::Value;

use crate::common::browser_capture;
use crate::common::write_capture;

fn overrides(pairs: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
    Some(pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect())
}

/// Only allow-listed, non-denied keys are reported; absent keys are null.
#[tokio::test]
async fn env_engine_filters_keys() {
    let engine = EnvEngine::new(EnvEngineConfig {
        denylist: BTreeSet::from(["SHELL".to_string()]),
        overrides: overrides(&[("LANG", "es_ES.UTF-8"), ("SHELL", "/bin/zsh"), ("HOME", "/root")]),
        ..EnvEngineConfig::default()
    });

    let report = engine.run().await.unwrap();

    let data = report.data.as_object().unwrap();
    assert_eq!(data.get("LANG"), Some(&Value::String("es_ES.UTF-8".to_string())));
    assert_eq!(data.get("TZ"), Some(&Value::Null));
    assert!(!data.contains_key("SHELL"));
    assert!(!data.contains_key("HOME"));
    assert_eq!(report.entropy.signals, 1);
    assert!(report.validate().is_ok());
}

/// Oversized values fail the engine.
#[tokio::test]
async fn env_engine_enforces_value_limit() {
    let engine = EnvEngine::new(EnvEngineConfig {
        max_value_bytes: 4,
        overrides: overrides(&[("TERM", "xterm-256color")]),
        ..EnvEngineConfig::default()
    });
    let err = engine.run().await.unwrap_err();
    assert_eq!(err, EngineError::Runtime("env value exceeds limit: TERM".to_string()));
}

/// A capture file replays its report verbatim.
#[tokio::test]
async fn file_engine_replays_capture() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_capture(dir.path(), "capture.json", &browser_capture().to_string());
    let report = FileEngine::new(FileEngineConfig::new("fingerprintjs", path)).run().await.unwrap();
    assert_eq!(report.engine, "fingerprintjs");
    assert!((report.confidence - 0.85).abs() < f64::EPSILON);
    assert_eq!(report.entropy.signals, 3);
}

/// Missing, oversized, and malformed captures fail.
#[tokio::test]
async fn file_engine_rejects_bad_captures() {
    let dir = tempfile::tempdir().unwrap();

    let missing = FileEngine::new(FileEngineConfig::new("x", dir.path().join("absent.json")));
    assert!(matches!(missing.run().await, Err(EngineError::Runtime(_))));

    let big = write_capture(dir.path(), "big.json", &browser_capture().to_string());
    let oversized = FileEngine::new(FileEngineConfig {
        id: "x".to_string(),
        path: big,
        max_bytes: 8,
    });
    assert!(matches!(oversized.run().await, Err(EngineError::Runtime(message)) if message.contains("exceeds")));

    let bad = write_capture(dir.path(), "bad.json", r#"{"engine": "x"}"#);
    let malformed = FileEngine::new(FileEngineConfig::new("x", bad));
    assert!(matches!(malformed.run().await, Err(EngineError::InvalidReport(_))));
}

/// A capture that never becomes readable does not stall the async runtime.
#[cfg(unix)]
#[tokio::test(flavor = "current_thread")]
async fn file_engine_read_does_not_block_the_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let fifo = dir.path().join("capture.fifo");
    let status = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
    assert!(status.success());

    let engine = FileEngine::new(FileEngineConfig::new("x", fifo.clone()));
    let mut pending = tokio::spawn(async move { engine.run().await });
    let waited = tokio::time::timeout(Duration::from_millis(50), &mut pending).await;
    assert!(waited.is_err());

    drop(std::fs::OpenOptions::new().write(true).open(&fifo).unwrap());
    let result = pending.await.unwrap();
    assert!(matches!(result, Err(EngineError::InvalidReport(_))));
}
