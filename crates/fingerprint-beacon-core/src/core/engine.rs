// crates/fingerprint-beacon-core/src/core/engine.rs
// ============================================================================
// Module: Engine Results
// Description: Per-engine outcome records collected by the orchestrator.
// Purpose: Distinguish success, disabled, and failed engines in the envelope.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every engine named by a profile yields exactly one [`EngineOutcome`]:
//! - success: the engine's report, passed through unchanged;
//! - disabled: serialized as JSON `null` ("not requested");
//! - failure: `{"error": true, "message": ...}` ("requested but failed").
//!
//! Engine payloads are opaque JSON. The report's `version` field is the
//! engine's declared schema version for `data`; the core never inspects it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;
use serde_json::Value;

use crate::core::identifiers::EngineId;

// ============================================================================
// SECTION: Engine Report
// ============================================================================

/// Entropy estimate declared by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyEstimate {
    /// Estimated entropy in bits.
    pub bits: f64,
    /// Number of signals contributing to the estimate.
    pub signals: u64,
}

/// Success payload returned by an engine unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    /// Engine name as reported by the unit.
    pub engine: String,
    /// Engine version; also the schema version of `data`.
    pub version: String,
    /// Confidence score in `[0, 1]`.
    pub confidence: f64,
    /// Engine-specific structured payload.
    pub data: Value,
    /// Entropy estimate.
    pub entropy: EntropyEstimate,
}

impl EngineReport {
    /// Checks the numeric contract of the report.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence out of range: {}", self.confidence));
        }
        if !self.entropy.bits.is_finite() || self.entropy.bits < 0.0 {
            return Err(format!("entropy bits invalid: {}", self.entropy.bits));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Failure record for an enabled engine that could not produce a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineFailure {
    /// Always `true`; marks the record as a failure on the wire.
    pub error: bool,
    /// Human-readable failure message.
    pub message: String,
}

impl EngineFailure {
    /// Creates a failure record.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

/// Tagged outcome for a single engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EngineOutcome {
    /// Engine not enabled for the profile.
    Disabled,
    /// Engine enabled but load or run failed.
    Failure(EngineFailure),
    /// Engine ran successfully.
    Success(EngineReport),
}

impl EngineOutcome {
    /// Returns true for the disabled marker.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Returns true for failure records.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the success report, if any.
    #[must_use]
    pub const fn report(&self) -> Option<&EngineReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Disabled | Self::Failure(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Engine Results
// ============================================================================

/// Ordered mapping from engine id to outcome.
///
/// # Invariants
/// - At most one entry per engine id.
/// - Serialization preserves insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineResults(Vec<(EngineId, EngineOutcome)>);

impl EngineResults {
    /// Inserts an outcome; returns false if the engine already has one.
    pub(crate) fn insert(&mut self, engine_id: EngineId, outcome: EngineOutcome) -> bool {
        if self.contains(&engine_id) {
            return false;
        }
        self.0.push((engine_id, outcome));
        true
    }

    /// Returns the outcome for an engine id.
    #[must_use]
    pub fn get(&self, engine_id: &EngineId) -> Option<&EngineOutcome> {
        self.0.iter().find(|(candidate, _)| candidate == engine_id).map(|(_, outcome)| outcome)
    }

    /// Returns true when the engine id has an outcome.
    #[must_use]
    pub fn contains(&self, engine_id: &EngineId) -> bool {
        self.0.iter().any(|(candidate, _)| candidate == engine_id)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&EngineId, &EngineOutcome)> {
        self.0.iter().map(|(engine_id, outcome)| (engine_id, outcome))
    }

    /// Iterates engine ids in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &EngineId> {
        self.0.iter().map(|(engine_id, _)| engine_id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for EngineResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (engine_id, outcome) in &self.0 {
            map.serialize_entry(engine_id, outcome)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EngineResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        /// Visitor collecting engine outcomes in document order.
        struct ResultsVisitor;

        impl<'de> Visitor<'de> for ResultsVisitor {
            type Value = EngineResults;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of engine id to engine outcome")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut results = EngineResults::default();
                while let Some((engine_id, outcome)) =
                    access.next_entry::<String, EngineOutcome>()?
                {
                    if !results.insert(EngineId::new(engine_id.clone()), outcome) {
                        return Err(de::Error::custom(format!("duplicate engine id: {engine_id}")));
                    }
                }
                Ok(results)
            }
        }

        deserializer.deserialize_map(ResultsVisitor)
    }
}
