// crates/fingerprint-beacon-engines/src/lib.rs
// ============================================================================
// Module: Fingerprint Beacon Engines
// Description: Engine registry, built-in engines, and host context providers.
// Purpose: Provide the loader and host collaborators the core runtime needs.
// Dependencies: fingerprint-beacon-core, serde_json, time
// ============================================================================

//! ## Overview
//! This crate ships the static [`EngineRegistry`] plus built-in engines
//! (`host`, `env`, file-backed captures) and the wall-clock and environment
//! probes used to build session metadata. New engines are added by
//! registering a factory; the orchestrator never changes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod env;
pub mod file;
pub mod host;
pub mod registry;
pub mod system;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use env::EnvEngine;
pub use env::EnvEngineConfig;
pub use file::FileEngine;
pub use file::FileEngineConfig;
pub use host::HostEngine;
pub use registry::BuiltinEngineConfigs;
pub use registry::EngineAccessPolicy;
pub use registry::EngineFactory;
pub use registry::EngineRegistry;
pub use registry::RegistryError;
pub use system::EnvironmentOverrides;
pub use system::HostEnvironment;
pub use system::SystemClock;
