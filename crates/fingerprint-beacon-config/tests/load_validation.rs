// crates/fingerprint-beacon-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Tests
// Description: File loading, limits, defaults, and the canonical example.
// Dependencies: fingerprint-beacon-config, tempfile
// ============================================================================
//! ## Overview
//! Exercises `FingerprintBeaconConfig::load` end to end.

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

use std::time::Duration;

use fingerprint_beacon_config::AuditSinkKind;
use fingerprint_beacon_config::ConfigError;
use fingerprint_beacon_config::FingerprintBeaconConfig;
use fingerprint_beacon_config::MAX_CONFIG_FILE_SIZE;
use fingerprint_beacon_config::ProfileSourceKind;
use fingerprint_beacon_config::config_toml_example;
use fingerprint_beacon_core::ExecutionMode;
use fingerprint_beacon_core::SubmissionMode;

use crate::common::write_config;

/// An empty file yields bounded defaults with submission disabled.
#[test]
fn empty_file_uses_defaults() {
    let (_dir, path) = write_config("");
    let config = FingerprintBeaconConfig::load(Some(&path)).unwrap();

    assert_eq!(config.profiles.source, ProfileSourceKind::File);
    assert_eq!(config.profiles.path, "profiles.json");
    assert_eq!(config.engines.execution, ExecutionMode::Sequential);
    let orchestrator = config.orchestrator_config();
    assert_eq!(orchestrator.engine_timeout, Duration::from_secs(10));
    assert_eq!(config.submission.timeout(), Duration::from_secs(5));
    assert!(!config.submission.enabled);
    assert_eq!(config.submission.mode, SubmissionMode::TwoStep);
    assert_eq!(config.submission.origin_label, "HTML");
    assert_eq!(config.audit.sink, AuditSinkKind::Stderr);
    assert!(config.access_policy().is_allowed("anything"));
}

/// The canonical example parses and resolves its endpoints.
#[test]
fn example_config_is_valid() {
    let config = FingerprintBeaconConfig::parse(&config_toml_example()).unwrap();
    let endpoints = config.submission.resolve_endpoints().unwrap();

    assert_eq!(endpoints.fingerprint, "https://collector.example.com/webhook/fingerprint");
    assert_eq!(endpoints.event, "https://collector.example.com/balizas/event");
    assert_eq!(endpoints.unified, "https://collector.example.com/fingerprint/collect_baliza");
    assert_eq!(endpoints.collect, "https://collector.example.com/fingerprint/collect");
    assert_eq!(config.submission.origin_id().unwrap().as_str(), "baliza-001");
    let builtins = config.builtin_engine_configs();
    assert_eq!(builtins.files.len(), 1);
    assert_eq!(builtins.files[0].id, "fingerprintjs");
    assert!(builtins.env.allowlist.contains("LANG"));
}

/// Missing files surface as I/O errors.
#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FingerprintBeaconConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

/// Oversized files are rejected before parsing.
#[test]
fn oversized_file_is_rejected() {
    let padding = format!("# {}\n", "x".repeat(MAX_CONFIG_FILE_SIZE));
    let (_dir, path) = write_config(&padding);
    let err = FingerprintBeaconConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("size limit"));
}

/// Non-UTF-8 content is rejected.
#[test]
fn non_utf8_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fingerprint-beacon.toml");
    std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
    let err = FingerprintBeaconConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("utf-8"));
}

/// Malformed TOML is a parse error.
#[test]
fn malformed_toml_is_parse_error() {
    let err = FingerprintBeaconConfig::parse("[engines\ntimeout_ms = 5").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    let err = FingerprintBeaconConfig::parse("[engines]\nexecution = \"parallel\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

/// Inline profile documents keep engine declaration order.
#[test]
fn inline_document_preserves_engine_order() {
    let config = FingerprintBeaconConfig::parse(
        r#"
[profiles]
source = "inline"

[profiles.document]
default = "local"

[profiles.document.profiles.local]
hash_strategy = "sha256"

[profiles.document.profiles.local.engines]
zeta = true
alpha = false
host = true
"#,
    )
    .unwrap();

    let document = config.profiles.document.unwrap();
    let spec = document.profiles.values().next().unwrap();
    let order: Vec<&str> = spec.engines.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(order, ["zeta", "alpha", "host"]);
}
