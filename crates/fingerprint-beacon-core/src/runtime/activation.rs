// crates/fingerprint-beacon-core/src/runtime/activation.rs
// ============================================================================
// Module: Activation Layer
// Description: Host-facing entry points that run and submit fingerprints.
// Purpose: Provide `run_fingerprint` and a once-per-session activation guard.
// Dependencies: serde, thiserror, crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`FingerprintRunner`] loads the profile document fresh on every run,
//! resolves the requested profile, orchestrates engines, and optionally hands
//! the envelope to the [`SubmissionPipeline`]. Configuration errors are the
//! only failures that escape a run.
//!
//! [`ActivationSession`] is the caller-owned replacement for a process-wide
//! "already sent" flag. The first activation claims the session, whatever
//! the outcome of the run; later activations are skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use serde::Serialize;
use thiserror::Error;

use crate::audit::AuditSink;
use crate::audit::RunAuditEvent;
use crate::core::ConfigurationError;
use crate::core::OriginId;
use crate::core::ProfileRegistry;
use crate::core::ResultEnvelope;
use crate::core::SubmissionOutcome;
use crate::interfaces::ProfileSource;
use crate::runtime::orchestrator::OrchestrationError;
use crate::runtime::orchestrator::Orchestrator;
use crate::runtime::pipeline::SubmissionPipeline;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures that abort a fingerprint run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The profile document or requested profile is unusable.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The envelope could not be assembled.
    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Caller-owned activation state for one page or host session.
///
/// # Invariants
/// - At most one activation runs per session.
#[derive(Debug)]
pub struct ActivationSession {
    /// Beacon identifier; activation is skipped without one.
    origin: Option<OriginId>,
    /// Set by the first activation.
    sent: AtomicBool,
}

impl ActivationSession {
    /// Creates an unclaimed session.
    #[must_use]
    pub const fn new(origin: Option<OriginId>) -> Self {
        Self {
            origin,
            sent: AtomicBool::new(false),
        }
    }

    /// Returns the session origin.
    #[must_use]
    pub const fn origin(&self) -> Option<&OriginId> {
        self.origin.as_ref()
    }

    /// Returns true once an activation has claimed the session.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.sent.load(Ordering::Acquire)
    }

    /// Atomically claims the session; false if already claimed.
    fn claim(&self) -> bool {
        !self.sent.swap(true, Ordering::AcqRel)
    }
}

/// Reason an activation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The session has no origin identifier.
    MissingOrigin,
    /// The session was already activated.
    AlreadySent,
}

/// Envelope plus delivery outcome for a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Result envelope.
    pub envelope: ResultEnvelope,
    /// Submission pipeline outcome.
    pub submission: SubmissionOutcome,
}

/// Result of [`FingerprintRunner::activate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationOutcome {
    /// Nothing ran.
    Skipped(SkipReason),
    /// The run completed and delivery was attempted.
    Completed(RunReport),
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Host-facing fingerprint entry point.
pub struct FingerprintRunner {
    /// Profile document source, fetched once per run.
    profiles: Arc<dyn ProfileSource>,
    /// Engine coordinator.
    orchestrator: Orchestrator,
    /// Delivery pipeline; `None` disables submission.
    pipeline: Option<SubmissionPipeline>,
    /// Run event sink.
    audit: Arc<dyn AuditSink>,
}

impl FingerprintRunner {
    /// Creates a runner.
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileSource>,
        orchestrator: Orchestrator,
        pipeline: Option<SubmissionPipeline>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            profiles,
            orchestrator,
            pipeline,
            audit,
        }
    }

    /// Loads profiles, resolves `profile`, and returns the envelope.
    ///
    /// A non-empty `profile` is used verbatim; otherwise the document default.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] on configuration failures; engine failures are
    /// recorded inside the envelope instead.
    pub async fn run_fingerprint(&self, profile: Option<&str>) -> Result<ResultEnvelope, RunError> {
        let resolved = match ProfileRegistry::load(self.profiles.as_ref()).await {
            Ok(registry) => registry.resolve(profile),
            Err(err) => Err(err),
        };
        let resolved = match resolved {
            Ok(resolved) => resolved,
            Err(err) => {
                self.audit.record_run(&RunAuditEvent::aborted(None, err.to_string()));
                return Err(err.into());
            }
        };
        let envelope = match self.orchestrator.orchestrate(&resolved).await {
            Ok(envelope) => envelope,
            Err(err) => {
                self.audit
                    .record_run(&RunAuditEvent::aborted(Some(resolved.id().clone()), err.to_string()));
                return Err(err.into());
            }
        };
        self.audit.record_run(&RunAuditEvent::completed(
            resolved.id().clone(),
            envelope.hash_strategy().to_string(),
            envelope.summary(),
            envelope.digest().ok(),
        ));
        Ok(envelope)
    }

    /// Delivers an envelope; [`SubmissionOutcome::Disabled`] without a pipeline.
    pub async fn submit(&self, origin: &OriginId, envelope: &ResultEnvelope) -> SubmissionOutcome {
        match &self.pipeline {
            Some(pipeline) => pipeline.submit(origin, envelope).await,
            None => SubmissionOutcome::Disabled,
        }
    }

    /// Runs and submits once per session.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] on configuration failures. The session stays
    /// claimed.
    pub async fn activate(
        &self,
        session: &ActivationSession,
        profile: Option<&str>,
    ) -> Result<ActivationOutcome, RunError> {
        let Some(origin) = session.origin() else {
            return Ok(ActivationOutcome::Skipped(SkipReason::MissingOrigin));
        };
        if !session.claim() {
            return Ok(ActivationOutcome::Skipped(SkipReason::AlreadySent));
        }
        let envelope = self.run_fingerprint(profile).await?;
        let submission = self.submit(origin, &envelope).await;
        Ok(ActivationOutcome::Completed(RunReport {
            envelope,
            submission,
        }))
    }
}
