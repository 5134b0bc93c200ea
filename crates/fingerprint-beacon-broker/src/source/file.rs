// crates/fingerprint-beacon-broker/src/source/file.rs
// ============================================================================
// Module: File Profile Source
// Description: Profile document read from the local filesystem.
// Purpose: Serve profile documents deployed alongside the host.
// Dependencies: fingerprint-beacon-core
// ============================================================================

//! ## Overview
//! Reads the document on every fetch, stopping one byte past the limit so
//! oversized files are rejected without loading them fully.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use async_trait::async_trait;
use fingerprint_beacon_core::ProfileSource;
use fingerprint_beacon_core::ProfileSourceError;

use crate::source::MAX_PROFILE_DOCUMENT_BYTES;
use crate::source::enforce_max_bytes;

// ============================================================================
// SECTION: File Source
// ============================================================================

/// File-backed profile document source.
#[derive(Debug, Clone)]
pub struct FileProfileSource {
    /// Document path.
    path: PathBuf,
    /// Maximum document size.
    max_bytes: usize,
}

impl FileProfileSource {
    /// Creates a source with the default size limit.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: MAX_PROFILE_DOCUMENT_BYTES,
        }
    }

    /// Overrides the size limit.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

#[async_trait]
impl ProfileSource for FileProfileSource {
    async fn fetch(&self) -> Result<Vec<u8>, ProfileSourceError> {
        let file = File::open(&self.path)
            .map_err(|err| ProfileSourceError::Io(format!("{}: {err}", self.path.display())))?;
        let limit = u64::try_from(self.max_bytes.saturating_add(1))
            .map_err(|_| ProfileSourceError::Io("size limit exceeds u64".to_string()))?;
        let mut bytes = Vec::new();
        file.take(limit)
            .read_to_end(&mut bytes)
            .map_err(|err| ProfileSourceError::Io(err.to_string()))?;
        enforce_max_bytes(bytes.len(), self.max_bytes)?;
        Ok(bytes)
    }
}
