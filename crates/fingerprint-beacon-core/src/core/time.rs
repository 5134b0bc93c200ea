// crates/fingerprint-beacon-core/src/core/time.rs
// ============================================================================
// Module: Fingerprint Beacon Time Model
// Description: ISO-8601 timestamps carried in session metadata and submissions.
// Purpose: Provide a canonical, serializable timestamp derived from host clocks.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! The core never reads wall-clock time directly. Hosts supply the current
//! instant through [`crate::interfaces::Clock`] and the runtime converts it into
//! an [`IsoTimestamp`]: RFC 3339, normalized to UTC, exactly three fraction digits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::UtcOffset;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when building or parsing timestamps.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The instant cannot be represented as RFC 3339.
    #[error("timestamp format failed: {0}")]
    Format(String),
    /// The input string is not a valid RFC 3339 timestamp.
    #[error("timestamp parse failed: {0}")]
    Parse(String),
}

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// UTC ISO-8601 timestamp with millisecond precision.
///
/// # Invariants
/// - Always parses as RFC 3339 with a `Z` offset.
/// - Sub-millisecond precision is truncated; the fraction always has three digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsoTimestamp(String);

impl IsoTimestamp {
    /// Builds a timestamp from a host-supplied instant.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Format`] when the instant is outside the RFC 3339 range.
    pub fn from_datetime(value: OffsetDateTime) -> Result<Self, TimestampError> {
        let utc = value.to_offset(UtcOffset::UTC);
        let truncated = utc
            .replace_millisecond(utc.millisecond())
            .map_err(|err| TimestampError::Format(err.to_string()))?;
        truncated
            .format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
            ))
            .map(Self)
            .map_err(|err| TimestampError::Format(err.to_string()))
    }

    /// Parses and normalizes an RFC 3339 timestamp string.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Parse`] when the input is not RFC 3339.
    pub fn parse(value: &str) -> Result<Self, TimestampError> {
        let parsed = OffsetDateTime::parse(value, &Rfc3339)
            .map_err(|err| TimestampError::Parse(err.to_string()))?;
        Self::from_datetime(parsed)
    }

    /// Returns the timestamp as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IsoTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
