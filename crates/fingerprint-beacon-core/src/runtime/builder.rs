// crates/fingerprint-beacon-core/src/runtime/builder.rs
// ============================================================================
// Module: Result Envelope Builder
// Description: Accumulates engine outcomes around a captured session snapshot.
// Purpose: Guarantee the envelope key set equals the profile's declared engines.
// Dependencies: thiserror, crate::core
// ============================================================================

//! ## Overview
//! The builder is created at orchestration start, which is when the session
//! timestamp and host environment are captured. It then accepts exactly one
//! outcome per declared engine, in any order, and emits the engines in the
//! profile's declared order. Recorded outcomes are never replaced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::EngineId;
use crate::core::EngineOutcome;
use crate::core::EngineResults;
use crate::core::EnvironmentSnapshot;
use crate::core::IsoTimestamp;
use crate::core::Profile;
use crate::core::ResultEnvelope;
use crate::core::SessionMetadata;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Envelope assembly violations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The engine is not declared by the profile.
    #[error("engine not declared by profile: {0}")]
    UnknownEngine(String),
    /// An outcome was already recorded for the engine.
    #[error("engine outcome already recorded: {0}")]
    DuplicateEngine(String),
    /// A declared engine has no outcome.
    #[error("engine outcome missing: {0}")]
    MissingEngine(String),
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Incremental envelope assembly for one orchestration run.
#[derive(Debug)]
pub struct EnvelopeBuilder {
    /// Metadata captured at orchestration start.
    metadata: SessionMetadata,
    /// Hash strategy copied from the profile.
    hash_strategy: String,
    /// One slot per declared engine, in declared order.
    slots: Vec<(EngineId, Option<EngineOutcome>)>,
}

impl EnvelopeBuilder {
    /// Starts a run: fixes the session metadata before any engine executes.
    #[must_use]
    pub fn start(
        profile: &Profile,
        timestamp: IsoTimestamp,
        environment: EnvironmentSnapshot,
    ) -> Self {
        let slots = profile.engines().iter().map(|(engine_id, _)| (engine_id.clone(), None)).collect();
        Self {
            metadata: SessionMetadata::capture(profile.id().clone(), timestamp, environment),
            hash_strategy: profile.hash_strategy().to_string(),
            slots,
        }
    }

    /// Records the outcome for `engine_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the engine is undeclared or already recorded.
    pub fn record(&mut self, engine_id: &EngineId, outcome: EngineOutcome) -> Result<(), BuildError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|(declared, _)| declared == engine_id)
            .ok_or_else(|| BuildError::UnknownEngine(engine_id.to_string()))?;
        if slot.1.is_some() {
            return Err(BuildError::DuplicateEngine(engine_id.to_string()));
        }
        slot.1 = Some(outcome);
        Ok(())
    }

    /// Declared engines still waiting for an outcome.
    pub fn pending(&self) -> impl Iterator<Item = &EngineId> {
        self.slots.iter().filter(|(_, outcome)| outcome.is_none()).map(|(engine_id, _)| engine_id)
    }

    /// Seals the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingEngine`] if any declared engine is unresolved.
    pub fn finish(self) -> Result<ResultEnvelope, BuildError> {
        let mut engines = EngineResults::default();
        for (engine_id, outcome) in self.slots {
            let Some(outcome) = outcome else {
                return Err(BuildError::MissingEngine(engine_id.to_string()));
            };
            if !engines.insert(engine_id.clone(), outcome) {
                return Err(BuildError::DuplicateEngine(engine_id.to_string()));
            }
        }
        Ok(ResultEnvelope::new(self.metadata, engines, self.hash_strategy))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
