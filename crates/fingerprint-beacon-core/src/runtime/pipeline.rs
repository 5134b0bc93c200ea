// crates/fingerprint-beacon-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Submission Pipeline
// Description: Fire-and-forget delivery of result envelopes to the backend.
// Purpose: Drive the submit -> register handshake and its single-call variants.
// Dependencies: serde, serde_json, crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! The pipeline never returns an error. Every transport failure is logged as
//! a warning through the audit sink and reflected in the returned
//! [`SubmissionOutcome`]. At most one attempt is made per call.
//!
//! In two-step mode the registration call is issued only after the submit
//! response has been parsed and only if it carries a non-empty identifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::audit::AuditSink;
use crate::audit::SubmissionAuditEvent;
use crate::core::CollectSubmission;
use crate::core::EventRegistration;
use crate::core::FingerprintSubmission;
use crate::core::IsoTimestamp;
use crate::core::OriginId;
use crate::core::ResultEnvelope;
use crate::core::SubmissionAck;
use crate::core::SubmissionOutcome;
use crate::core::UnifiedSubmission;
use crate::core::submission::EVENT_VIEW;
use crate::core::submission::SOURCE_TYPE_BEACON;
use crate::interfaces::Clock;
use crate::interfaces::Transport;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Backend protocol used to deliver an envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionMode {
    /// Submit, then register a VIEW event when an identifier is returned.
    #[default]
    TwoStep,
    /// One call storing the fingerprint and VIEW event together.
    Unified,
    /// One call to the generic ingestion endpoint.
    Collect,
}

impl SubmissionMode {
    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoStep => "two_step",
            Self::Unified => "unified",
            Self::Collect => "collect",
        }
    }
}

/// Endpoint set; only the endpoints used by the active mode are called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEndpoints {
    /// Two-step fingerprint submission.
    pub fingerprint: String,
    /// Two-step event registration.
    pub event: String,
    /// Unified fingerprint + VIEW endpoint.
    pub unified: String,
    /// Generic ingestion endpoint.
    pub collect: String,
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Delivers envelopes according to a [`SubmissionMode`].
pub struct SubmissionPipeline {
    /// Network transport.
    transport: Arc<dyn Transport>,
    /// Submission timestamp source.
    clock: Arc<dyn Clock>,
    /// Warning sink for swallowed failures.
    audit: Arc<dyn AuditSink>,
    /// Active protocol.
    mode: SubmissionMode,
    /// Endpoint URLs.
    endpoints: SubmissionEndpoints,
    /// Origin label for single-call modes.
    origin_label: String,
}

impl SubmissionPipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn AuditSink>,
        mode: SubmissionMode,
        endpoints: SubmissionEndpoints,
        origin_label: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            clock,
            audit,
            mode,
            endpoints,
            origin_label: origin_label.into(),
        }
    }

    /// Delivers `envelope` on behalf of `origin`.
    pub async fn submit(&self, origin: &OriginId, envelope: &ResultEnvelope) -> SubmissionOutcome {
        match self.mode {
            SubmissionMode::TwoStep => self.submit_two_step(origin, envelope).await,
            SubmissionMode::Unified => {
                let body = UnifiedSubmission {
                    origin_label: &self.origin_label,
                    origin,
                    event: EVENT_VIEW,
                    fingerprint: envelope,
                };
                self.submit_single("unified", &self.endpoints.unified, &body).await
            }
            SubmissionMode::Collect => {
                let body = CollectSubmission {
                    source_type: SOURCE_TYPE_BEACON,
                    origin_label: &self.origin_label,
                    profile: &envelope.metadata().profile,
                    fingerprint: envelope,
                };
                self.submit_single("collect", &self.endpoints.collect, &body).await
            }
        }
    }

    /// Submit, then register when the acknowledgement carries an identifier.
    async fn submit_two_step(&self, origin: &OriginId, envelope: &ResultEnvelope) -> SubmissionOutcome {
        let submitted_at = IsoTimestamp::from_datetime(self.clock.now())
            .unwrap_or_else(|_| envelope.metadata().timestamp.clone());
        let body = FingerprintSubmission::new(origin, submitted_at, envelope);
        let ack = match self.post("submit", &self.endpoints.fingerprint, &body).await {
            Ok(ack) => ack,
            Err(error) => {
                return SubmissionOutcome::SubmitFailed {
                    error,
                };
            }
        };
        let Some(fingerprint_id) = ack.generated_id() else {
            return SubmissionOutcome::SubmittedNoFollowup {
                ack,
            };
        };
        let registration = EventRegistration::view(origin.clone(), fingerprint_id.clone());
        match self.post("register", &self.endpoints.event, &registration).await {
            Ok(_) => SubmissionOutcome::Registered {
                fingerprint_id,
                ack,
            },
            Err(error) => SubmissionOutcome::RegistrationFailed {
                fingerprint_id,
                ack,
                error,
            },
        }
    }

    /// One-call modes.
    async fn submit_single<T: Serialize + Sync>(
        &self,
        step: &'static str,
        endpoint: &str,
        body: &T,
    ) -> SubmissionOutcome {
        match self.post(step, endpoint, body).await {
            Ok(ack) => SubmissionOutcome::Collected {
                ack,
            },
            Err(error) => SubmissionOutcome::SubmitFailed {
                error,
            },
        }
    }

    /// Posts one body and audits the step; failures become messages.
    async fn post<T: Serialize + Sync>(
        &self,
        step: &'static str,
        endpoint: &str,
        body: &T,
    ) -> Result<SubmissionAck, String> {
        let result = match serde_json::to_value(body) {
            Ok(payload) => self.transport.post_json(endpoint, &payload).await.map_err(|err| err.to_string()),
            Err(err) => Err(format!("request encoding failed: {err}")),
        };
        match result {
            Ok(response) => {
                let ack = SubmissionAck::from_response(&response);
                self.audit.record_submission(&SubmissionAuditEvent::succeeded(
                    step,
                    endpoint,
                    ack.generated_id().map(|id| id.to_string()),
                ));
                Ok(ack)
            }
            Err(error) => {
                self.audit.record_submission(&SubmissionAuditEvent::failed(step, endpoint, error.clone()));
                Err(error)
            }
        }
    }
}

