// crates/fingerprint-beacon-engines/src/registry.rs
// ============================================================================
// Module: Engine Registry
// Description: Static registry of engine factories with access policy.
// Purpose: Resolve engine identifiers to fresh units without dynamic loading.
// Dependencies: fingerprint-beacon-core, thiserror
// ============================================================================

//! ## Overview
//! Engines are registered once at startup as factories keyed by identifier.
//! The registry implements [`EngineLoader`], building a fresh unit on every
//! load so runs never share engine state. Allowlist and denylist policy is
//! checked before the factory is consulted; a blocked or unknown engine is an
//! engine error, which the orchestrator folds into that engine's failure
//! record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use fingerprint_beacon_core::Engine;
use fingerprint_beacon_core::EngineError;
use fingerprint_beacon_core::EngineId;
use fingerprint_beacon_core::EngineLoader;
use thiserror::Error;

use crate::EnvEngine;
use crate::EnvEngineConfig;
use crate::FileEngine;
use crate::FileEngineConfig;
use crate::HostEngine;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registration failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An engine is already registered under the identifier.
    #[error("engine already registered: {0}")]
    Duplicate(String),
    /// The engine identifier is malformed.
    #[error("invalid engine id: {0}")]
    InvalidId(String),
}

// ============================================================================
// SECTION: Built-in Configuration
// ============================================================================

/// Built-in engine configuration bundle.
#[derive(Debug, Clone, Default)]
pub struct BuiltinEngineConfigs {
    /// Configuration for the `env` engine.
    pub env: EnvEngineConfig,
    /// File-backed engines, one per entry.
    pub files: Vec<FileEngineConfig>,
}

// ============================================================================
// SECTION: Access Policy
// ============================================================================

/// Access policy controlling which engines may be loaded.
///
/// # Invariants
/// - `denylist` overrides `allowlist` when both are present.
/// - If `allowlist` is `None`, all engines are allowed unless denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineAccessPolicy {
    /// Optional allowlist of engine identifiers.
    pub allowlist: Option<BTreeSet<String>>,
    /// Explicit denylist of engine identifiers.
    pub denylist: BTreeSet<String>,
}

impl EngineAccessPolicy {
    /// Returns a policy that permits all engines.
    #[must_use]
    pub const fn allow_all() -> Self {
        Self {
            allowlist: None,
            denylist: BTreeSet::new(),
        }
    }

    /// Returns true when the engine is allowed by policy.
    #[must_use]
    pub fn is_allowed(&self, engine_id: &str) -> bool {
        if self.denylist.contains(engine_id) {
            return false;
        }
        if let Some(allowlist) = &self.allowlist {
            return allowlist.contains(engine_id);
        }
        true
    }
}

impl Default for EngineAccessPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}

// ============================================================================
// SECTION: Factories
// ============================================================================

/// Constructs fresh engine units.
pub trait EngineFactory: Send + Sync {
    /// Builds a new unit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the unit cannot be constructed.
    fn create(&self) -> Result<Box<dyn Engine>, EngineError>;
}

impl<F> EngineFactory for F
where
    F: Fn() -> Result<Box<dyn Engine>, EngineError> + Send + Sync,
{
    fn create(&self) -> Result<Box<dyn Engine>, EngineError> {
        self()
    }
}

// ============================================================================
// SECTION: Engine Registry
// ============================================================================

/// Engine factory registry with policy enforcement.
pub struct EngineRegistry {
    /// Factories keyed by engine identifier.
    factories: BTreeMap<EngineId, Arc<dyn EngineFactory>>,
    /// Access control policy for engine loading.
    policy: EngineAccessPolicy,
}

impl EngineRegistry {
    /// Creates an empty registry with the provided policy.
    #[must_use]
    pub fn new(policy: EngineAccessPolicy) -> Self {
        Self {
            factories: BTreeMap::new(),
            policy,
        }
    }

    /// Creates a registry with built-in engines registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when built-in registration collides.
    pub fn with_builtin_engines(
        policy: EngineAccessPolicy,
        configs: BuiltinEngineConfigs,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new(policy);
        registry.register_builtin_engines(configs)?;
        Ok(registry)
    }

    /// Registers a factory under the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the identifier is empty or already registered.
    pub fn register_engine(
        &mut self,
        engine_id: impl Into<String>,
        factory: impl EngineFactory + 'static,
    ) -> Result<(), RegistryError> {
        let engine_id = engine_id.into();
        if engine_id.trim().is_empty() {
            return Err(RegistryError::InvalidId("engine id must be non-empty".to_string()));
        }
        let engine_id = EngineId::new(engine_id);
        if self.factories.contains_key(&engine_id) {
            return Err(RegistryError::Duplicate(engine_id.to_string()));
        }
        self.factories.insert(engine_id, Arc::new(factory));
        Ok(())
    }

    /// Registers `host`, `env`, and every configured file-backed engine.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when identifiers collide.
    pub fn register_builtin_engines(
        &mut self,
        configs: BuiltinEngineConfigs,
    ) -> Result<(), RegistryError> {
        self.register_engine("host", || -> Result<Box<dyn Engine>, EngineError> {
            Ok(Box::new(HostEngine::new()))
        })?;
        let env = configs.env;
        self.register_engine("env", move || -> Result<Box<dyn Engine>, EngineError> {
            Ok(Box::new(EnvEngine::new(env.clone())))
        })?;
        for file in configs.files {
            let engine_id = file.id.clone();
            self.register_engine(engine_id, move || -> Result<Box<dyn Engine>, EngineError> {
                Ok(Box::new(FileEngine::new(file.clone())))
            })?;
        }
        Ok(())
    }

    /// Iterates registered identifiers in sorted order.
    pub fn engine_ids(&self) -> impl Iterator<Item = &EngineId> {
        self.factories.keys()
    }

    /// Returns true when `engine_id` is registered and allowed.
    #[must_use]
    pub fn is_available(&self, engine_id: &str) -> bool {
        self.policy.is_allowed(engine_id) && self.factories.contains_key(&EngineId::new(engine_id))
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> &EngineAccessPolicy {
        &self.policy
    }
}

impl EngineLoader for EngineRegistry {
    fn load(&self, engine_id: &EngineId) -> Result<Box<dyn Engine>, EngineError> {
        if !self.policy.is_allowed(engine_id.as_str()) {
            return Err(EngineError::Blocked(engine_id.to_string()));
        }
        let Some(factory) = self.factories.get(engine_id) else {
            return Err(EngineError::NotFound(engine_id.to_string()));
        };
        factory.create()
    }
}
