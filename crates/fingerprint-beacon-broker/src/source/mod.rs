// crates/fingerprint-beacon-broker/src/source/mod.rs
// ============================================================================
// Module: Profile Document Sources
// Description: Reference implementations of the core profile source.
// Purpose: Fetch profile document bytes under a hard size limit.
// Dependencies: fingerprint-beacon-core
// ============================================================================

//! ## Overview
//! Each source returns raw bytes; parsing and validation stay in the core
//! profile registry. Sources are consulted once per run, so profile changes
//! are picked up without restarting the host.

// ============================================================================
// SECTION: Imports
// ============================================================================

use fingerprint_beacon_core::ProfileSourceError;
pub use fingerprint_beacon_core::core::profile::MAX_PROFILE_DOCUMENT_BYTES;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Returns an error when a document exceeds `max_bytes`.
pub(crate) const fn enforce_max_bytes(
    actual_bytes: usize,
    max_bytes: usize,
) -> Result<(), ProfileSourceError> {
    if actual_bytes > max_bytes {
        return Err(ProfileSourceError::TooLarge {
            max_bytes,
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod file;
pub mod http;
pub mod inline;

pub use file::FileProfileSource;
pub use http::HttpProfileSource;
pub use inline::InlineProfileSource;
