// crates/fingerprint-beacon-core/src/core/mod.rs
// ============================================================================
// Module: Fingerprint Beacon Core Types
// Description: Data model for profiles, engine outcomes, envelopes, and wire records.
// Purpose: Group the immutable per-run entities behind one namespace.
// Dependencies: crate::core::*
// ============================================================================

//! ## Overview
//! Every entity here is created fresh per orchestration run and discarded
//! after submission. Nothing in this module performs I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod engine;
pub mod envelope;
pub mod hashing;
pub mod identifiers;
pub mod profile;
pub mod submission;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::EngineFailure;
pub use engine::EngineOutcome;
pub use engine::EngineReport;
pub use engine::EngineResults;
pub use engine::EntropyEstimate;
pub use envelope::EnvelopeSummary;
pub use envelope::EnvironmentSnapshot;
pub use envelope::ResultEnvelope;
pub use envelope::ScreenDimensions;
pub use envelope::SessionMetadata;
pub use hashing::HashAlgorithm;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use hashing::hash_canonical_json;
pub use identifiers::EngineId;
pub use identifiers::FingerprintId;
pub use identifiers::OriginId;
pub use identifiers::ProfileId;
pub use profile::ConfigurationError;
pub use profile::EngineSelection;
pub use profile::Profile;
pub use profile::ProfileDocument;
pub use profile::ProfileRegistry;
pub use profile::ProfileSpec;
pub use submission::CollectSubmission;
pub use submission::EventRegistration;
pub use submission::FingerprintSubmission;
pub use submission::SubmissionAck;
pub use submission::SubmissionOutcome;
pub use submission::UnifiedSubmission;
pub use self::time::IsoTimestamp;
pub use self::time::TimestampError;
