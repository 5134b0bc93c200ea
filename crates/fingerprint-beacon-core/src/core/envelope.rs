// crates/fingerprint-beacon-core/src/core/envelope.rs
// ============================================================================
// Module: Result Envelope
// Description: Session metadata and the merged, submission-ready envelope.
// Purpose: Carry one run's context and engine outcomes as an immutable unit.
// Dependencies: serde, crate::core::{engine, hashing, identifiers, time}
// ============================================================================

//! ## Overview
//! [`SessionMetadata`] is captured once, before any engine runs, from a host
//! [`EnvironmentSnapshot`] and the run start time. [`ResultEnvelope`] pairs it
//! with the per-engine outcomes and the profile's declared hash strategy.
//! Envelopes are only constructed by the runtime envelope builder.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;

use crate::core::engine::EngineOutcome;
use crate::core::engine::EngineResults;
use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::hashing::hash_canonical_json;
use crate::core::identifiers::ProfileId;
use crate::core::time::IsoTimestamp;

// ============================================================================
// SECTION: Screen Dimensions
// ============================================================================

/// Screen size, serialized as `"<width>x<height>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl fmt::Display for ScreenDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ScreenDimensions {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (width, height) =
            value.split_once('x').ok_or_else(|| format!("invalid screen dimensions: {value}"))?;
        let width = width.trim().parse().map_err(|_| format!("invalid screen width: {width}"))?;
        let height =
            height.trim().parse().map_err(|_| format!("invalid screen height: {height}"))?;
        Ok(Self {
            width,
            height,
        })
    }
}

impl Serialize for ScreenDimensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScreenDimensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// ============================================================================
// SECTION: Environment Snapshot
// ============================================================================

/// Contextual host fields collected directly, not through engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    /// User-agent string of the collecting client.
    pub user_agent: String,
    /// Preferred locale (BCP 47 tag when available).
    pub language: String,
    /// IANA timezone identifier.
    pub timezone: String,
    /// Screen dimensions when known.
    pub screen: Option<ScreenDimensions>,
    /// Platform string.
    pub platform: String,
}

// ============================================================================
// SECTION: Session Metadata
// ============================================================================

/// Per-run session metadata, captured at orchestration start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Profile identifier used for the run.
    pub profile: ProfileId,
    /// Orchestration start time.
    pub timestamp: IsoTimestamp,
    /// User-agent string.
    pub user_agent: String,
    /// Preferred locale.
    pub language: String,
    /// IANA timezone identifier.
    pub timezone: String,
    /// Screen dimensions when known.
    pub screen: Option<ScreenDimensions>,
    /// Platform string.
    pub platform: String,
}

impl SessionMetadata {
    /// Builds metadata from the run start time and a host snapshot.
    #[must_use]
    pub fn capture(
        profile: ProfileId,
        timestamp: IsoTimestamp,
        environment: EnvironmentSnapshot,
    ) -> Self {
        Self {
            profile,
            timestamp,
            user_agent: environment.user_agent,
            language: environment.language,
            timezone: environment.timezone,
            screen: environment.screen,
            platform: environment.platform,
        }
    }
}

// ============================================================================
// SECTION: Result Envelope
// ============================================================================

/// Merged, submission-ready result of one orchestration run.
///
/// # Invariants
/// - `engines` has exactly the key set of the profile's declared engines.
/// - Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Session metadata.
    metadata: SessionMetadata,
    /// Engine outcomes keyed by engine id.
    engines: EngineResults,
    /// Hash strategy declared by the profile.
    hash_strategy: String,
}

impl ResultEnvelope {
    /// Assembles an envelope; used by the runtime builder only.
    pub(crate) const fn new(
        metadata: SessionMetadata,
        engines: EngineResults,
        hash_strategy: String,
    ) -> Self {
        Self {
            metadata,
            engines,
            hash_strategy,
        }
    }

    /// Returns the session metadata.
    #[must_use]
    pub const fn metadata(&self) -> &SessionMetadata {
        &self.metadata
    }

    /// Returns the engine outcomes.
    #[must_use]
    pub const fn engines(&self) -> &EngineResults {
        &self.engines
    }

    /// Returns the declared hash strategy.
    #[must_use]
    pub fn hash_strategy(&self) -> &str {
        &self.hash_strategy
    }

    /// Summarizes outcome counts and mean confidence.
    #[must_use]
    pub fn summary(&self) -> EnvelopeSummary {
        let mut summary = EnvelopeSummary::default();
        let mut confidence_total = 0.0;
        for (_, outcome) in self.engines.iter() {
            summary.total += 1;
            match outcome {
                EngineOutcome::Disabled => summary.disabled += 1,
                EngineOutcome::Failure(_) => summary.failed += 1,
                EngineOutcome::Success(report) => {
                    summary.succeeded += 1;
                    confidence_total += report.confidence;
                }
            }
        }
        if summary.succeeded > 0 {
            summary.mean_confidence = Some(confidence_total / f64::from(summary.succeeded));
        }
        summary
    }

    /// Computes the canonical digest of the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn digest(&self) -> Result<HashDigest, HashError> {
        hash_canonical_json(DEFAULT_HASH_ALGORITHM, self)
    }
}

/// Outcome counts for audit and reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnvelopeSummary {
    /// Engines named by the profile.
    pub total: u32,
    /// Engines that produced a report.
    pub succeeded: u32,
    /// Enabled engines that failed.
    pub failed: u32,
    /// Engines not enabled.
    pub disabled: u32,
    /// Mean confidence across successful engines.
    pub mean_confidence: Option<f64>,
}
