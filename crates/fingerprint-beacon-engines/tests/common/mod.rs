// crates/fingerprint-beacon-engines/tests/common/mod.rs
// ============================================================================
// Module: Engine Test Helpers
// Description: Capture-file fixtures for file-backed engines.
// ============================================================================
//! ## Overview
//! Writes engine capture documents into temporary directories.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(clippy::unwrap_used, reason = "Test fixtures unwrap deterministic I/O.")]

use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;
use serde_json::json;

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_capture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// A complete capture as produced by a browser-side collector.
pub fn browser_capture() -> Value {
    json!({
        "engine": "fingerprintjs",
        "version": "v5",
        "confidence": 0.85,
        "data": {"canvas": "a1b2", "webgl": "c3d4", "audio": 124.04},
        "entropy": {"bits": 6.0, "signals": 3}
    })
}
