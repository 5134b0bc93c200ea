// crates/fingerprint-beacon-broker/src/source/inline.rs
// ============================================================================
// Module: Inline Profile Source
// Description: Profile document held in memory.
// Purpose: Serve documents embedded in host configuration.
// Dependencies: fingerprint-beacon-core, serde_json
// ============================================================================

//! ## Overview
//! Inline documents are serialized once at construction and returned as-is.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use fingerprint_beacon_core::ProfileDocument;
use fingerprint_beacon_core::ProfileSource;
use fingerprint_beacon_core::ProfileSourceError;

// ============================================================================
// SECTION: Inline Source
// ============================================================================

/// In-memory profile document source.
#[derive(Debug, Clone)]
pub struct InlineProfileSource {
    /// Serialized document.
    bytes: Vec<u8>,
}

impl InlineProfileSource {
    /// Wraps raw document bytes.
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
        }
    }

    /// Serializes a document.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileSourceError::Io`] when serialization fails.
    pub fn from_document(document: &ProfileDocument) -> Result<Self, ProfileSourceError> {
        let bytes = serde_json::to_vec(document).map_err(|err| ProfileSourceError::Io(err.to_string()))?;
        Ok(Self::from_bytes(bytes))
    }
}

#[async_trait]
impl ProfileSource for InlineProfileSource {
    async fn fetch(&self) -> Result<Vec<u8>, ProfileSourceError> {
        Ok(self.bytes.clone())
    }
}
