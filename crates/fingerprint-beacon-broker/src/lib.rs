// crates/fingerprint-beacon-broker/src/lib.rs
// ============================================================================
// Module: Fingerprint Beacon Broker
// Description: Concrete I/O for profile documents and submission calls.
// Purpose: Implement the core profile source and transport interfaces.
// Dependencies: fingerprint-beacon-core, reqwest, url
// ============================================================================

//! ## Overview
//! Sources fetch the profile document from a file, an HTTP endpoint, or an
//! inline buffer. Transports post submission bodies over HTTP, or record them
//! locally for dry runs. All remote content is size-capped and redirects are
//! refused.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod source;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use source::FileProfileSource;
pub use source::HttpProfileSource;
pub use source::InlineProfileSource;
pub use transport::DryRunTransport;
pub use transport::HttpTransport;
pub use transport::HttpTransportConfig;
