// crates/fingerprint-beacon-engines/src/env.rs
// ============================================================================
// Module: Environment Engine
// Description: Engine reporting allow-listed process environment variables.
// Purpose: Capture locale and shell context as a measured signal.
// Dependencies: fingerprint-beacon-core, serde_json
// ============================================================================

//! ## Overview
//! The environment engine reads a fixed set of variables. It applies the
//! denylist before the allowlist and enforces key and value size limits,
//! failing the engine on violations. Absent variables are reported as `null`
//! and do not count as signals.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use async_trait::async_trait;
use fingerprint_beacon_core::Engine;
use fingerprint_beacon_core::EngineError;
use fingerprint_beacon_core::EngineReport;
use serde_json::Map;
use serde_json::Value;

use crate::host::report_from_signals;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Variables read when no allowlist is configured.
pub const DEFAULT_ENV_KEYS: [&str; 5] = ["LANG", "LC_ALL", "TZ", "TERM", "SHELL"];

/// Configuration for the environment engine.
///
/// # Invariants
/// - `denylist` overrides `allowlist`.
/// - `max_value_bytes` and `max_key_bytes` are enforced as hard upper bounds.
/// - `overrides` replace process environment reads entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEngineConfig {
    /// Variables to report.
    pub allowlist: BTreeSet<String>,
    /// Variables never reported.
    pub denylist: BTreeSet<String>,
    /// Maximum bytes allowed for a single value.
    pub max_value_bytes: usize,
    /// Maximum bytes allowed for a single key.
    pub max_key_bytes: usize,
    /// Optional override map used for deterministic lookups.
    pub overrides: Option<BTreeMap<String, String>>,
}

impl Default for EnvEngineConfig {
    fn default() -> Self {
        Self {
            allowlist: DEFAULT_ENV_KEYS.iter().map(|key| (*key).to_string()).collect(),
            denylist: BTreeSet::new(),
            max_value_bytes: 4 * 1024,
            max_key_bytes: 255,
            overrides: None,
        }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Report schema version.
pub const ENV_ENGINE_VERSION: &str = "v1";
/// Confidence assigned to environment reports.
const ENV_CONFIDENCE: f64 = 0.4;

/// Environment variable engine.
pub struct EnvEngine {
    /// Engine configuration, including policy and size limits.
    config: EnvEngineConfig,
}

impl EnvEngine {
    /// Creates a new environment engine.
    #[must_use]
    pub const fn new(config: EnvEngineConfig) -> Self {
        Self {
            config,
        }
    }

    /// Reads one variable from overrides or the process environment.
    fn lookup(&self, key: &str) -> Option<String> {
        match &self.config.overrides {
            Some(overrides) => overrides.get(key).cloned(),
            None => std::env::var(key).ok(),
        }
    }
}

#[async_trait]
impl Engine for EnvEngine {
    async fn run(&self) -> Result<EngineReport, EngineError> {
        let mut data = Map::new();
        for key in &self.config.allowlist {
            if self.config.denylist.contains(key) {
                continue;
            }
            if key.len() > self.config.max_key_bytes {
                return Err(EngineError::Runtime(format!("env key exceeds limit: {key}")));
            }
            let value = match self.lookup(key) {
                Some(value) if value.len() > self.config.max_value_bytes => {
                    return Err(EngineError::Runtime(format!("env value exceeds limit: {key}")));
                }
                Some(value) => Value::String(value),
                None => Value::Null,
            };
            data.insert(key.clone(), value);
        }
        Ok(report_from_signals("env", ENV_ENGINE_VERSION, ENV_CONFIDENCE, data))
    }
}
