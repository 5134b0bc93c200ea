// crates/fingerprint-beacon-engines/src/file.rs
// ============================================================================
// Module: File-Backed Engine
// Description: Engine replaying a captured report from a JSON file.
// Purpose: Feed externally collected signals (e.g. browser captures) into runs.
// Dependencies: fingerprint-beacon-core, serde, serde_json
// ============================================================================

//! ## Overview
//! A file-backed engine is bound to one engine id and one path. Every run
//! reads the file under a hard size limit and parses a complete engine report.
//! Missing, oversized, or malformed files fail the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use fingerprint_beacon_core::Engine;
use fingerprint_beacon_core::EngineError;
use fingerprint_beacon_core::EngineReport;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default maximum capture size.
pub const DEFAULT_FILE_ENGINE_MAX_BYTES: usize = 256 * 1024;

/// Binding of an engine id to a capture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEngineConfig {
    /// Engine identifier served by the file.
    pub id: String,
    /// Path of the JSON capture.
    pub path: PathBuf,
    /// Maximum file size in bytes.
    pub max_bytes: usize,
}

impl FileEngineConfig {
    /// Creates a binding with the default size limit.
    #[must_use]
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            max_bytes: DEFAULT_FILE_ENGINE_MAX_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Engine returning the report stored in a file.
pub struct FileEngine {
    /// File binding.
    config: FileEngineConfig,
}

impl FileEngine {
    /// Creates a new file-backed engine.
    #[must_use]
    pub const fn new(config: FileEngineConfig) -> Self {
        Self {
            config,
        }
    }
}

#[async_trait]
impl Engine for FileEngine {
    async fn run(&self) -> Result<EngineReport, EngineError> {
        let path = self.config.path.clone();
        let max_bytes = self.config.max_bytes;
        let bytes = tokio::task::spawn_blocking(move || read_file_limited(&path, max_bytes))
            .await
            .map_err(|err| EngineError::Runtime(format!("capture read task failed: {err}")))??;
        serde_json::from_slice(&bytes)
            .map_err(|err| EngineError::InvalidReport(format!("capture is not an engine report: {err}")))
    }
}

/// Reads a file while enforcing a maximum byte limit.
fn read_file_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, EngineError> {
    let file = File::open(path)
        .map_err(|err| EngineError::Runtime(format!("unable to open capture {}: {err}", path.display())))?;
    let limit = u64::try_from(max_bytes.saturating_add(1))
        .map_err(|_| EngineError::Runtime("capture size limit exceeds u64".to_string()))?;
    let mut buf = Vec::new();
    file.take(limit)
        .read_to_end(&mut buf)
        .map_err(|err| EngineError::Runtime(format!("unable to read capture: {err}")))?;
    if buf.len() > max_bytes {
        return Err(EngineError::Runtime(format!("capture exceeds {max_bytes} bytes")));
    }
    Ok(buf)
}
