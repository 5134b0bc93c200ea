// crates/fingerprint-beacon-core/src/core/submission.rs
// ============================================================================
// Module: Submission Records
// Description: Wire records for fingerprint submission and event registration.
// Purpose: Define request bodies, acknowledgements, and submission outcomes.
// Dependencies: serde, crate::core::{engine, envelope, identifiers, time}
// ============================================================================

//! ## Overview
//! Request bodies mirror the field names the collection backend reads
//! (`baliza_id`, `origen`, `tipo`, `evento`). Rust field names stay in English
//! and are renamed at the serde boundary.
//!
//! [`SubmissionOutcome`] is the terminal state of the two-step handshake:
//! `Submitted -> Registered | SubmittedNoFollowup`, plus explicit failure and
//! single-call states.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::engine::EngineResults;
use crate::core::envelope::ResultEnvelope;
use crate::core::envelope::SessionMetadata;
use crate::core::identifiers::FingerprintId;
use crate::core::identifiers::OriginId;
use crate::core::identifiers::ProfileId;
use crate::core::time::IsoTimestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Event type recorded for page-embedded beacons.
pub const EVENT_TYPE_HTML: &str = "HTML";
/// Event name recorded when a page is viewed.
pub const EVENT_VIEW: &str = "VIEW";
/// Source type sent to the generic ingestion endpoint.
pub const SOURCE_TYPE_BEACON: &str = "baliza";
/// Default origin label for single-call submissions.
pub const DEFAULT_ORIGIN_LABEL: &str = "HTML";

// ============================================================================
// SECTION: Request Bodies
// ============================================================================

/// Engine results and metadata nested inside a submission.
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintBody<'a> {
    /// Session metadata.
    pub metadata: &'a SessionMetadata,
    /// Engine outcomes.
    pub engines: &'a EngineResults,
}

/// Step 1 request body: the fingerprint submission.
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintSubmission<'a> {
    /// Beacon identifier.
    #[serde(rename = "baliza_id")]
    pub origin: &'a OriginId,
    /// Submission time.
    pub timestamp: IsoTimestamp,
    /// Fingerprint payload.
    pub fingerprint: FingerprintBody<'a>,
}

impl<'a> FingerprintSubmission<'a> {
    /// Wraps an envelope for submission.
    #[must_use]
    pub fn new(origin: &'a OriginId, timestamp: IsoTimestamp, envelope: &'a ResultEnvelope) -> Self {
        Self {
            origin,
            timestamp,
            fingerprint: FingerprintBody {
                metadata: envelope.metadata(),
                engines: envelope.engines(),
            },
        }
    }
}

/// Step 2 request body: the dependent event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRegistration {
    /// Beacon identifier.
    #[serde(rename = "origen")]
    pub origin: OriginId,
    /// Identifier returned by step 1.
    pub fingerprint_id: FingerprintId,
    /// Event type.
    #[serde(rename = "tipo")]
    pub event_type: String,
    /// Event name.
    #[serde(rename = "evento")]
    pub event: String,
}

impl EventRegistration {
    /// Builds the `HTML`/`VIEW` registration for a fingerprint.
    #[must_use]
    pub fn view(origin: OriginId, fingerprint_id: FingerprintId) -> Self {
        Self {
            origin,
            fingerprint_id,
            event_type: EVENT_TYPE_HTML.to_string(),
            event: EVENT_VIEW.to_string(),
        }
    }
}

/// Single-call body for the combined fingerprint + VIEW endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UnifiedSubmission<'a> {
    /// Origin label.
    #[serde(rename = "origen")]
    pub origin_label: &'a str,
    /// Beacon identifier.
    #[serde(rename = "baliza_id")]
    pub origin: &'a OriginId,
    /// Event name.
    #[serde(rename = "evento")]
    pub event: &'static str,
    /// Full result envelope.
    pub fingerprint: &'a ResultEnvelope,
}

/// Single-call body for the generic ingestion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CollectSubmission<'a> {
    /// Source classification.
    pub source_type: &'static str,
    /// Origin label.
    #[serde(rename = "origen")]
    pub origin_label: &'a str,
    /// Profile used for the run.
    pub profile: &'a ProfileId,
    /// Full result envelope.
    pub fingerprint: &'a ResultEnvelope,
}

// ============================================================================
// SECTION: Acknowledgement
// ============================================================================

/// Backend acknowledgement of a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionAck {
    /// Status label reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Generated fingerprint identifier (two-step endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fp_id: Option<String>,
    /// Generated fingerprint identifier (single-call endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint_id: Option<String>,
    /// Whether the backend stored a new fingerprint.
    #[serde(default, rename = "nuevo", skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    /// Backend confidence score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl SubmissionAck {
    /// Returns the non-empty generated identifier, if any.
    #[must_use]
    pub fn generated_id(&self) -> Option<FingerprintId> {
        [self.fp_id.as_deref(), self.fingerprint_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .map(FingerprintId::new)
    }

    /// Reads an acknowledgement from an arbitrary response body.
    ///
    /// Non-object bodies yield an empty acknowledgement. Identifiers may be
    /// strings or numbers; fields of any other type are ignored.
    #[must_use]
    pub fn from_response(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return Self::default();
        };
        Self {
            status: object.get("status").and_then(Value::as_str).map(str::to_string),
            fp_id: object.get("fp_id").and_then(identifier_text),
            fingerprint_id: object.get("fingerprint_id").and_then(identifier_text),
            is_new: object.get("nuevo").and_then(Value::as_bool),
            confidence: object.get("confidence").and_then(Value::as_f64),
        }
    }
}

/// Renders a string or numeric identifier as text.
fn identifier_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Terminal state of the submission pipeline for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Submission is switched off for this run.
    Disabled,
    /// Step 1 failed; nothing was registered.
    SubmitFailed {
        /// Transport failure message.
        error: String,
    },
    /// Step 1 succeeded without a generated identifier.
    SubmittedNoFollowup {
        /// Parsed acknowledgement.
        ack: SubmissionAck,
    },
    /// Step 1 and step 2 both succeeded.
    Registered {
        /// Identifier forwarded to step 2.
        fingerprint_id: FingerprintId,
        /// Parsed acknowledgement from step 1.
        ack: SubmissionAck,
    },
    /// Step 1 succeeded but step 2 failed.
    RegistrationFailed {
        /// Identifier forwarded to step 2.
        fingerprint_id: FingerprintId,
        /// Parsed acknowledgement from step 1.
        ack: SubmissionAck,
        /// Transport failure message.
        error: String,
    },
    /// A single-call endpoint stored the fingerprint and event together.
    Collected {
        /// Parsed acknowledgement.
        ack: SubmissionAck,
    },
}

impl SubmissionOutcome {
    /// Returns the backend fingerprint identifier when one was obtained.
    #[must_use]
    pub fn fingerprint_id(&self) -> Option<FingerprintId> {
        match self {
            Self::Registered {
                fingerprint_id, ..
            }
            | Self::RegistrationFailed {
                fingerprint_id, ..
            } => Some(fingerprint_id.clone()),
            Self::Collected {
                ack,
            }
            | Self::SubmittedNoFollowup {
                ack,
            } => ack.generated_id(),
            Self::Disabled
            | Self::SubmitFailed {
                ..
            } => None,
        }
    }

    /// Stable label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::SubmitFailed {
                ..
            } => "submit_failed",
            Self::SubmittedNoFollowup {
                ..
            } => "submitted_no_followup",
            Self::Registered {
                ..
            } => "registered",
            Self::RegistrationFailed {
                ..
            } => "registration_failed",
            Self::Collected {
                ..
            } => "collected",
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ack_prefers_fp_id_and_forwards_it_verbatim() {
        let ack = SubmissionAck::from_response(&json!({
            "status": "ok",
            "fp_id": "  fp-42 ",
            "fingerprint_id": "fp-other",
            "nuevo": true
        }));
        assert_eq!(ack.generated_id(), Some(FingerprintId::new("  fp-42 ")));
        assert_eq!(ack.is_new, Some(true));
    }

    #[test]
    fn whitespace_identifier_counts_as_present() {
        let ack = SubmissionAck::from_response(&json!({"fp_id": "   ", "fingerprint_id": "fp-7"}));
        assert_eq!(ack.generated_id(), Some(FingerprintId::new("   ")));
    }

    #[test]
    fn ack_falls_back_to_fingerprint_id() {
        let ack = SubmissionAck::from_response(&json!({"fp_id": "", "fingerprint_id": 17}));
        assert_eq!(ack.generated_id(), Some(FingerprintId::new("17")));
    }

    #[test]
    fn ack_without_identifier_has_no_followup() {
        assert_eq!(SubmissionAck::from_response(&json!({"status": "ok"})).generated_id(), None);
        assert_eq!(SubmissionAck::from_response(&json!([1, 2])).generated_id(), None);
        assert_eq!(SubmissionAck::from_response(&Value::Null).generated_id(), None);
    }

    #[test]
    fn registration_uses_backend_field_names() {
        let record = EventRegistration::view(OriginId::new("b-1"), FingerprintId::new("fp-9"));
        let value = serde_json::to_value(&record).unwrap_or(Value::Null);
        assert_eq!(
            value,
            json!({"origen": "b-1", "fingerprint_id": "fp-9", "tipo": "HTML", "evento": "VIEW"})
        );
    }

    #[test]
    fn outcome_serializes_with_state_tag() {
        let outcome = SubmissionOutcome::SubmitFailed {
            error: "request failed: refused".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap_or(Value::Null);
        assert_eq!(value["state"], "submit_failed");
        assert_eq!(outcome.label(), "submit_failed");
        assert_eq!(outcome.fingerprint_id(), None);
    }
}
