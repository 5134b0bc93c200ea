// crates/fingerprint-beacon-core/src/runtime/mod.rs
// ============================================================================
// Module: Fingerprint Beacon Runtime
// Description: Orchestration, envelope assembly, submission, and activation.
// Purpose: Execute fingerprint runs against the core interfaces.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime wires the data model to the interfaces: the orchestrator runs
//! engines, the builder seals envelopes, the pipeline delivers them, and the
//! activation layer exposes host entry points.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod activation;
pub mod builder;
pub mod orchestrator;
pub mod pipeline;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use activation::ActivationOutcome;
pub use activation::ActivationSession;
pub use activation::FingerprintRunner;
pub use activation::RunError;
pub use activation::RunReport;
pub use activation::SkipReason;
pub use builder::BuildError;
pub use builder::EnvelopeBuilder;
pub use orchestrator::DEFAULT_ENGINE_TIMEOUT;
pub use orchestrator::ExecutionMode;
pub use orchestrator::OrchestrationError;
pub use orchestrator::Orchestrator;
pub use orchestrator::OrchestratorConfig;
pub use pipeline::SubmissionEndpoints;
pub use pipeline::SubmissionMode;
pub use pipeline::SubmissionPipeline;
