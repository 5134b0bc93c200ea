// crates/fingerprint-beacon-core/src/lib.rs
// ============================================================================
// Module: Fingerprint Beacon Core Library
// Description: Public API surface for the fingerprint orchestration core.
// Purpose: Expose core types, interfaces, audit sinks, and runtime helpers.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Fingerprint Beacon core loads a named profile, runs a variable set of
//! measurement engines with per-engine fault isolation, assembles a result
//! envelope, and drives the submit/register handshake with the collection
//! backend. It performs no I/O of its own; hosts plug in engines, profile
//! sources, transports, clocks, and environment probes through
//! [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use interfaces::Clock;
pub use interfaces::Engine;
pub use interfaces::EngineError;
pub use interfaces::EngineLoader;
pub use interfaces::EnvironmentProbe;
pub use interfaces::ProfileSource;
pub use interfaces::ProfileSourceError;
pub use interfaces::StaticEnvironment;
pub use interfaces::Transport;
pub use interfaces::TransportError;
pub use runtime::ActivationOutcome;
pub use runtime::ActivationSession;
pub use runtime::BuildError;
pub use runtime::ExecutionMode;
pub use runtime::FingerprintRunner;
pub use runtime::OrchestrationError;
pub use runtime::Orchestrator;
pub use runtime::OrchestratorConfig;
pub use runtime::RunError;
pub use runtime::RunReport;
pub use runtime::SkipReason;
pub use runtime::SubmissionEndpoints;
pub use runtime::SubmissionMode;
pub use runtime::SubmissionPipeline;
