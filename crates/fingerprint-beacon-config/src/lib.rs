// crates/fingerprint-beacon-config/src/lib.rs
// ============================================================================
// Module: Fingerprint Beacon Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for fingerprint-beacon.toml semantics.
// Dependencies: fingerprint-beacon-core, fingerprint-beacon-engines, serde, toml, url
// ============================================================================

//! ## Overview
//! `fingerprint-beacon-config` defines the configuration model for the
//! fingerprint beacon host. Loading is strict and fail-closed: oversized,
//! non-UTF-8, malformed, or out-of-range inputs are rejected before any
//! component is built.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
