// crates/fingerprint-beacon-cli/src/lib.rs
// ============================================================================
// Module: Fingerprint Beacon CLI Library
// Description: Component wiring shared by the binary and its tests.
// Purpose: Turn a validated config into a ready fingerprint runner.
// Dependencies: fingerprint-beacon-broker, fingerprint-beacon-config, fingerprint-beacon-core, fingerprint-beacon-engines
// ============================================================================

//! ## Overview
//! The binary is a thin dispatcher; everything it assembles lives in
//! [`wiring`] so integration tests can drive the same code paths.

pub mod wiring;
