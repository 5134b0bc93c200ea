// crates/fingerprint-beacon-engines/src/host.rs
// ============================================================================
// Module: Host Engine
// Description: Engine reporting static properties of the executing host.
// Purpose: Provide a dependency-free baseline signal set.
// Dependencies: fingerprint-beacon-core, serde_json
// ============================================================================

//! ## Overview
//! Reports operating system, family, architecture, pointer width,
//! endianness, and available parallelism. Entropy is estimated at two bits
//! per populated signal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::num::NonZeroUsize;
use std::thread;

use async_trait::async_trait;
use fingerprint_beacon_core::Engine;
use fingerprint_beacon_core::EngineError;
use fingerprint_beacon_core::EngineReport;
use fingerprint_beacon_core::EntropyEstimate;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Report schema version.
pub const HOST_ENGINE_VERSION: &str = "v1";
/// Confidence assigned to host reports.
const HOST_CONFIDENCE: f64 = 0.5;
/// Entropy credited per populated signal.
pub(crate) const BITS_PER_SIGNAL: f64 = 2.0;

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Host property engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostEngine;

impl HostEngine {
    /// Creates the engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Collects host signals.
    fn collect() -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("os".to_string(), json!(std::env::consts::OS));
        data.insert("family".to_string(), json!(std::env::consts::FAMILY));
        data.insert("arch".to_string(), json!(std::env::consts::ARCH));
        data.insert("pointer_width".to_string(), json!(usize::BITS));
        let endianness = if cfg!(target_endian = "little") { "little" } else { "big" };
        data.insert("endianness".to_string(), json!(endianness));
        let parallelism = thread::available_parallelism().map(NonZeroUsize::get).ok();
        data.insert("parallelism".to_string(), json!(parallelism));
        data
    }
}

#[async_trait]
impl Engine for HostEngine {
    async fn run(&self) -> Result<EngineReport, EngineError> {
        let data = Self::collect();
        Ok(report_from_signals("host", HOST_ENGINE_VERSION, HOST_CONFIDENCE, data))
    }
}

/// Wraps collected signals with a signal-count entropy estimate.
pub(crate) fn report_from_signals(
    engine: &str,
    version: &str,
    confidence: f64,
    data: Map<String, Value>,
) -> EngineReport {
    let signals = data.values().filter(|value| !value.is_null()).count();
    let signals = u64::try_from(signals).unwrap_or(u64::MAX);
    let counted = u32::try_from(signals).unwrap_or(u32::MAX);
    EngineReport {
        engine: engine.to_string(),
        version: version.to_string(),
        confidence,
        data: Value::Object(data),
        entropy: EntropyEstimate {
            bits: f64::from(counted) * BITS_PER_SIGNAL,
            signals,
        },
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    #[tokio::test]
    async fn reports_host_signals() {
        let report = HostEngine::new().run().await.unwrap();
        assert_eq!(report.engine, "host");
        assert_eq!(report.data["os"], std::env::consts::OS);
        assert!(report.validate().is_ok());
        assert!(report.entropy.signals >= 5);
        assert!((report.entropy.bits - report.entropy.signals as f64 * 2.0).abs() < f64::EPSILON);
    }
}
