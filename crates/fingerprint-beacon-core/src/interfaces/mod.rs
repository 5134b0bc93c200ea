// crates/fingerprint-beacon-core/src/interfaces/mod.rs
// ============================================================================
// Module: Fingerprint Beacon Interfaces
// Description: Contract surfaces for engines, profile sources, transports, and hosts.
// Purpose: Keep the runtime free of I/O, clocks, and engine-specific knowledge.
// Dependencies: async-trait, serde_json, thiserror, time, crate::core
// ============================================================================

//! ## Overview
//! The orchestration core talks to the outside world only through these
//! traits. Implementations live in sibling crates (engines, broker) or in
//! tests. Every async seam is object-safe via `async_trait` so registries can
//! store trait objects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::EngineId;
use crate::core::EngineReport;
use crate::core::EnvironmentSnapshot;

// ============================================================================
// SECTION: Engine Contract
// ============================================================================

/// Engine-scoped failures. Always folded into the engine's failure record.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No unit is registered under the identifier.
    #[error("engine not found: {0}")]
    NotFound(String),
    /// The registry policy blocks the engine.
    #[error("engine blocked by policy: {0}")]
    Blocked(String),
    /// The unit failed while loading or running.
    #[error("engine runtime error: {0}")]
    Runtime(String),
    /// The unit did not finish within the configured bound.
    #[error("engine timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },
    /// The unit returned a report violating the engine contract.
    #[error("engine returned an invalid report: {0}")]
    InvalidReport(String),
}

impl EngineError {
    /// Stable label for audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Blocked(_) => "blocked",
            Self::Runtime(_) => "runtime",
            Self::Timeout {
                ..
            } => "timeout",
            Self::InvalidReport(_) => "invalid_report",
        }
    }
}

/// A loaded measurement engine unit.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Collects signals and returns the engine report.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when collection fails.
    async fn run(&self) -> Result<EngineReport, EngineError>;
}

/// Resolves engine identifiers to fresh units.
pub trait EngineLoader: Send + Sync {
    /// Loads the unit registered under `engine_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for unknown ids, or other variants
    /// when construction fails.
    fn load(&self, engine_id: &EngineId) -> Result<Box<dyn Engine>, EngineError>;
}

// ============================================================================
// SECTION: Profile Source
// ============================================================================

/// Profile document fetch failures.
#[derive(Debug, Error)]
pub enum ProfileSourceError {
    /// The document could not be read.
    #[error("profile source io error: {0}")]
    Io(String),
    /// The document exceeded the size limit.
    #[error("profile document exceeds {max_bytes} bytes")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
    },
    /// The remote source answered with a failure.
    #[error("profile source request failed: {0}")]
    Request(String),
}

/// Supplies the raw profile document bytes.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetches the document. Called once per run.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileSourceError`] when the document is unavailable.
    async fn fetch(&self) -> Result<Vec<u8>, ProfileSourceError>;
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Network failures on a submission call.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be sent or timed out.
    #[error("request failed: {0}")]
    Request(String),
    /// The endpoint answered with a non-success status.
    #[error("endpoint returned status {0}")]
    Status(u16),
    /// The response body was not the expected JSON.
    #[error("response decode failed: {0}")]
    Decode(String),
    /// The response body exceeded the size limit.
    #[error("response exceeds {max_bytes} bytes")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
    },
    /// Local I/O failure (dry-run sinks).
    #[error("transport io error: {0}")]
    Io(String),
}

/// Posts JSON bodies to collection endpoints.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `body` to `endpoint` and returns the parsed JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network, status, or decode failures.
    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError>;
}

// ============================================================================
// SECTION: Host Context
// ============================================================================

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> OffsetDateTime;
}

/// Source of contextual host fields.
pub trait EnvironmentProbe: Send + Sync {
    /// Returns a snapshot of the host environment.
    fn snapshot(&self) -> EnvironmentSnapshot;
}

/// Environment probe returning a fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    /// Snapshot returned on every call.
    snapshot: EnvironmentSnapshot,
}

impl StaticEnvironment {
    /// Creates a probe that always returns `snapshot`.
    #[must_use]
    pub const fn new(snapshot: EnvironmentSnapshot) -> Self {
        Self {
            snapshot,
        }
    }
}

impl EnvironmentProbe for StaticEnvironment {
    fn snapshot(&self) -> EnvironmentSnapshot {
        self.snapshot.clone()
    }
}
