// crates/fingerprint-beacon-broker/src/transport/mod.rs
// ============================================================================
// Module: Submission Transports
// Description: Implementations of the core transport interface.
// Purpose: Deliver submission bodies over HTTP or record them for dry runs.
// Dependencies: fingerprint-beacon-core
// ============================================================================

//! ## Overview
//! Transports make exactly one attempt per call and report failures as
//! [`fingerprint_beacon_core::TransportError`]; the submission pipeline
//! decides what to do with them.

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod dry_run;
pub mod http;

pub use dry_run::DryRunTransport;
pub use http::HttpTransport;
pub use http::HttpTransportConfig;
