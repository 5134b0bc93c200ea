// crates/fingerprint-beacon-config/tests/common/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Write config files and assert on validation messages.
// Dependencies: fingerprint-beacon-config, tempfile
// ============================================================================

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::path::PathBuf;

use fingerprint_beacon_config::ConfigError;
use fingerprint_beacon_config::FingerprintBeaconConfig;
use tempfile::TempDir;

/// Writes `contents` to `fingerprint-beacon.toml` in a fresh directory.
pub fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fingerprint-beacon.toml");
    std::fs::write(&path, contents).expect("write config");
    (dir, path)
}

/// Parses `contents` and returns the validation message it fails with.
pub fn invalid_message(contents: &str) -> String {
    match FingerprintBeaconConfig::parse(contents) {
        Err(ConfigError::Invalid(message)) => message,
        other => panic!("expected invalid config, got {other:?}"),
    }
}
