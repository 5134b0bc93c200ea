// crates/fingerprint-beacon-core/src/runtime/orchestrator.rs
// ============================================================================
// Module: Fingerprint Orchestration Engine
// Description: Runs a profile's engines with per-engine fault isolation.
// Purpose: Turn a resolved profile into a complete result envelope.
// Dependencies: serde, thiserror, tokio, crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! For each `(engine, enabled)` pair in declared order the orchestrator either
//! records the disabled marker (without touching the loader) or loads and runs
//! the engine under a bounded timeout. Load failures, run failures, timeouts,
//! invalid reports, and panicking engine tasks all become that engine's failure
//! record; none of them abort the run.
//!
//! Engines execute sequentially or fan out on a [`JoinSet`]. Either way every
//! outcome is resolved before the envelope is sealed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;

use crate::audit::AuditSink;
use crate::audit::EngineAuditEvent;
use crate::core::EngineFailure;
use crate::core::EngineId;
use crate::core::EngineOutcome;
use crate::core::EngineReport;
use crate::core::IsoTimestamp;
use crate::core::Profile;
use crate::core::ProfileId;
use crate::core::ResultEnvelope;
use crate::core::TimestampError;
use crate::interfaces::Clock;
use crate::interfaces::Engine;
use crate::interfaces::EngineError;
use crate::interfaces::EngineLoader;
use crate::interfaces::EnvironmentProbe;
use crate::runtime::builder::BuildError;
use crate::runtime::builder::EnvelopeBuilder;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default per-engine timeout.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(10);

/// How enabled engines are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Await each engine in declared order.
    #[default]
    Sequential,
    /// Run all enabled engines as independent tasks and join them.
    Concurrent,
}

/// Orchestrator tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Engine scheduling.
    pub execution: ExecutionMode,
    /// Upper bound for a single engine run.
    pub engine_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            execution: ExecutionMode::Sequential,
            engine_timeout: DEFAULT_ENGINE_TIMEOUT,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Orchestration failures. Engine failures are never reported here.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// The host clock produced an unrepresentable instant.
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
    /// Envelope assembly violated the key-set invariant.
    #[error(transparent)]
    Build(#[from] BuildError),
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Coordinates engines for one profile at a time.
///
/// # Invariants
/// - Holds no per-run state; concurrent calls produce independent envelopes.
/// - Disabled engines are never passed to the loader.
pub struct Orchestrator {
    /// Engine unit resolver.
    loader: Arc<dyn EngineLoader>,
    /// Host context for session metadata.
    environment: Arc<dyn EnvironmentProbe>,
    /// Source of the run start time.
    clock: Arc<dyn Clock>,
    /// Engine failure sink.
    audit: Arc<dyn AuditSink>,
    /// Scheduling and timeout settings.
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Creates an orchestrator over the supplied collaborators.
    #[must_use]
    pub fn new(
        loader: Arc<dyn EngineLoader>,
        environment: Arc<dyn EnvironmentProbe>,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn AuditSink>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            loader,
            environment,
            clock,
            audit,
            config,
        }
    }

    /// Runs every engine declared by `profile` and seals the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError`] only when the run start time cannot be
    /// formatted or the key-set invariant is broken.
    pub async fn orchestrate(&self, profile: &Profile) -> Result<ResultEnvelope, OrchestrationError> {
        let timestamp = IsoTimestamp::from_datetime(self.clock.now())?;
        let mut builder = EnvelopeBuilder::start(profile, timestamp, self.environment.snapshot());
        match self.config.execution {
            ExecutionMode::Sequential => self.run_sequential(profile, &mut builder).await?,
            ExecutionMode::Concurrent => self.run_concurrent(profile, &mut builder).await?,
        }
        Ok(builder.finish()?)
    }

    /// Awaits each engine in declared order, one task at a time.
    async fn run_sequential(
        &self,
        profile: &Profile,
        builder: &mut EnvelopeBuilder,
    ) -> Result<(), BuildError> {
        for (engine_id, enabled) in profile.engines().iter() {
            let outcome = if enabled {
                let result = match self.loader.load(engine_id) {
                    Ok(engine) => tokio::spawn(run_bounded(engine, self.config.engine_timeout))
                        .await
                        .unwrap_or_else(|_| Err(task_aborted())),
                    Err(err) => Err(err),
                };
                self.settle(profile.id(), engine_id, result)
            } else {
                EngineOutcome::Disabled
            };
            builder.record(engine_id, outcome)?;
        }
        Ok(())
    }

    /// Loads enabled engines up front, then runs them as joined tasks.
    async fn run_concurrent(
        &self,
        profile: &Profile,
        builder: &mut EnvelopeBuilder,
    ) -> Result<(), BuildError> {
        let mut tasks = JoinSet::new();
        for (engine_id, enabled) in profile.engines().iter() {
            if !enabled {
                builder.record(engine_id, EngineOutcome::Disabled)?;
                continue;
            }
            match self.loader.load(engine_id) {
                Ok(engine) => {
                    let engine_id = engine_id.clone();
                    let timeout = self.config.engine_timeout;
                    tasks.spawn(async move { (engine_id, run_bounded(engine, timeout).await) });
                }
                Err(err) => {
                    let outcome = self.settle(profile.id(), engine_id, Err(err));
                    builder.record(engine_id, outcome)?;
                }
            }
        }
        while let Some(joined) = tasks.join_next().await {
            if let Ok((engine_id, result)) = joined {
                let outcome = self.settle(profile.id(), &engine_id, result);
                builder.record(&engine_id, outcome)?;
            }
        }
        let orphaned: Vec<EngineId> = builder.pending().cloned().collect();
        for engine_id in orphaned {
            let outcome = self.settle(profile.id(), &engine_id, Err(task_aborted()));
            builder.record(&engine_id, outcome)?;
        }
        Ok(())
    }

    /// Converts an engine result into its envelope outcome.
    fn settle(
        &self,
        profile_id: &ProfileId,
        engine_id: &EngineId,
        result: Result<EngineReport, EngineError>,
    ) -> EngineOutcome {
        let checked = result.and_then(|report| {
            report.validate().map_err(EngineError::InvalidReport)?;
            Ok(report)
        });
        match checked {
            Ok(report) => EngineOutcome::Success(report),
            Err(err) => {
                self.audit.record_engine(&EngineAuditEvent::failure(
                    profile_id.clone(),
                    engine_id.clone(),
                    &err,
                ));
                EngineOutcome::Failure(EngineFailure::new(err.to_string()))
            }
        }
    }
}

/// Failure recorded for an engine whose task panicked or was cancelled.
fn task_aborted() -> EngineError {
    EngineError::Runtime("engine task aborted".to_string())
}

/// Runs an engine, converting an elapsed timeout into an engine error.
async fn run_bounded(
    engine: Box<dyn Engine>,
    timeout: Duration,
) -> Result<EngineReport, EngineError> {
    match tokio::time::timeout(timeout, engine.run()).await {
        Ok(result) => result,
        Err(_) => Err(EngineError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
