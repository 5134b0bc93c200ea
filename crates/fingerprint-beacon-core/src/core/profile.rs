// crates/fingerprint-beacon-core/src/core/profile.rs
// ============================================================================
// Module: Profile Registry
// Description: Named-profile document model, parsing, and resolution.
// Purpose: Select the engine set and hash strategy for one orchestration run.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A profile document declares a default profile id plus named profiles, each
//! mapping engine identifiers to an enabled flag and declaring an opaque hash
//! strategy. The registry is parsed fresh on every run; nothing is cached.
//! Invariants:
//! - Engine order within a profile is the document's declared key order.
//! - Engine identifiers are unique within a profile.
//! - Resolution never yields a partial profile; failures are
//!   [`ConfigurationError`] and abort the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;
use thiserror::Error;

use crate::core::identifiers::EngineId;
use crate::core::identifiers::ProfileId;
use crate::interfaces::ProfileSource;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a profile document in bytes.
pub const MAX_PROFILE_DOCUMENT_BYTES: usize = 1024 * 1024;
/// Maximum number of engines declared by one profile.
pub const MAX_ENGINES_PER_PROFILE: usize = 256;
/// Maximum length of an engine or profile identifier.
pub const MAX_IDENTIFIER_BYTES: usize = 128;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Profile configuration failures. Always fatal to the run.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The profile document could not be fetched.
    #[error("profile document fetch failed: {0}")]
    Fetch(String),
    /// The profile document could not be parsed.
    #[error("profile document parse failed: {0}")]
    Parse(String),
    /// The document parsed but violates structural limits.
    #[error("invalid profile document: {0}")]
    Invalid(String),
    /// The resolved profile id has no matching entry.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),
}

// ============================================================================
// SECTION: Engine Selection
// ============================================================================

/// Ordered mapping from engine identifier to enabled flag.
///
/// # Invariants
/// - Keys are unique.
/// - Iteration follows declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSelection(Vec<(EngineId, bool)>);

impl EngineSelection {
    /// Builds a selection from ordered entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Invalid`] on duplicate or empty engine ids.
    pub fn new(entries: Vec<(EngineId, bool)>) -> Result<Self, ConfigurationError> {
        let mut selection = Self(Vec::with_capacity(entries.len()));
        for (engine_id, enabled) in entries {
            selection.push(engine_id, enabled).map_err(ConfigurationError::Invalid)?;
        }
        Ok(selection)
    }

    /// Appends an entry, rejecting duplicates and malformed identifiers.
    fn push(&mut self, engine_id: EngineId, enabled: bool) -> Result<(), String> {
        let raw = engine_id.as_str();
        if raw.trim().is_empty() {
            return Err("engine id must be non-empty".to_string());
        }
        if raw.len() > MAX_IDENTIFIER_BYTES {
            return Err(format!("engine id exceeds {MAX_IDENTIFIER_BYTES} bytes"));
        }
        if self.contains(&engine_id) {
            return Err(format!("duplicate engine id: {engine_id}"));
        }
        if self.0.len() >= MAX_ENGINES_PER_PROFILE {
            return Err(format!("profile declares more than {MAX_ENGINES_PER_PROFILE} engines"));
        }
        self.0.push((engine_id, enabled));
        Ok(())
    }

    /// Iterates `(engine id, enabled)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&EngineId, bool)> {
        self.0.iter().map(|(engine_id, enabled)| (engine_id, *enabled))
    }

    /// Returns true when the engine id is declared.
    #[must_use]
    pub fn contains(&self, engine_id: &EngineId) -> bool {
        self.0.iter().any(|(candidate, _)| candidate == engine_id)
    }

    /// Number of declared engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no engines are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for EngineSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (engine_id, enabled) in &self.0 {
            map.serialize_entry(engine_id, enabled)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EngineSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        /// Visitor collecting map entries in document order.
        struct SelectionVisitor;

        impl<'de> Visitor<'de> for SelectionVisitor {
            type Value = EngineSelection;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of engine id to enabled flag")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut selection = EngineSelection::default();
                while let Some((engine_id, enabled)) = access.next_entry::<String, bool>()? {
                    selection.push(EngineId::new(engine_id), enabled).map_err(de::Error::custom)?;
                }
                Ok(selection)
            }
        }

        deserializer.deserialize_map(SelectionVisitor)
    }
}

// ============================================================================
// SECTION: Document Model
// ============================================================================

/// Declared configuration for one named profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSpec {
    /// Engines this profile names, with their enabled flags.
    pub engines: EngineSelection,
    /// Opaque hash/aggregation strategy interpreted by the backend.
    pub hash_strategy: String,
}

/// Profile configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Profile used when the caller does not force one.
    pub default: ProfileId,
    /// Named profiles.
    pub profiles: BTreeMap<ProfileId, ProfileSpec>,
}

// ============================================================================
// SECTION: Resolved Profile
// ============================================================================

/// Immutable, resolved profile for a single orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Profile identifier that was resolved.
    id: ProfileId,
    /// Engine selection in declaration order.
    engines: EngineSelection,
    /// Declared hash strategy.
    hash_strategy: String,
}

impl Profile {
    /// Creates a resolved profile.
    #[must_use]
    pub fn new(id: ProfileId, engines: EngineSelection, hash_strategy: impl Into<String>) -> Self {
        Self {
            id,
            engines,
            hash_strategy: hash_strategy.into(),
        }
    }

    /// Returns the profile identifier.
    #[must_use]
    pub const fn id(&self) -> &ProfileId {
        &self.id
    }

    /// Returns the engine selection.
    #[must_use]
    pub const fn engines(&self) -> &EngineSelection {
        &self.engines
    }

    /// Returns the declared hash strategy.
    #[must_use]
    pub fn hash_strategy(&self) -> &str {
        &self.hash_strategy
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Parsed profile document with resolution rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRegistry {
    /// Validated profile document.
    document: ProfileDocument,
}

impl ProfileRegistry {
    /// Fetches and parses the profile document from a source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when fetching, parsing, or validation fails.
    pub async fn load(source: &dyn ProfileSource) -> Result<Self, ConfigurationError> {
        let bytes =
            source.fetch().await.map_err(|err| ConfigurationError::Fetch(err.to_string()))?;
        Self::parse(&bytes)
    }

    /// Parses a profile document from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the bytes are oversized or malformed.
    pub fn parse(bytes: &[u8]) -> Result<Self, ConfigurationError> {
        if bytes.len() > MAX_PROFILE_DOCUMENT_BYTES {
            return Err(ConfigurationError::Invalid(format!(
                "profile document exceeds {MAX_PROFILE_DOCUMENT_BYTES} bytes"
            )));
        }
        let document: ProfileDocument = serde_json::from_slice(bytes)
            .map_err(|err| ConfigurationError::Parse(err.to_string()))?;
        Self::from_document(document)
    }

    /// Wraps an already-deserialized document after validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Invalid`] when profile ids are malformed.
    pub fn from_document(document: ProfileDocument) -> Result<Self, ConfigurationError> {
        for profile_id in document.profiles.keys() {
            let raw = profile_id.as_str();
            if raw.trim().is_empty() {
                return Err(ConfigurationError::Invalid("profile id must be non-empty".to_string()));
            }
            if raw.len() > MAX_IDENTIFIER_BYTES {
                return Err(ConfigurationError::Invalid(format!(
                    "profile id exceeds {MAX_IDENTIFIER_BYTES} bytes"
                )));
            }
        }
        Ok(Self {
            document,
        })
    }

    /// Returns the declared default profile id.
    #[must_use]
    pub const fn default_profile_id(&self) -> &ProfileId {
        &self.document.default
    }

    /// Iterates declared profile ids in sorted order.
    pub fn profile_ids(&self) -> impl Iterator<Item = &ProfileId> {
        self.document.profiles.keys()
    }

    /// Returns the underlying document.
    #[must_use]
    pub const fn document(&self) -> &ProfileDocument {
        &self.document
    }

    /// Resolves the profile for a run.
    ///
    /// A non-empty forced id is used verbatim; otherwise the default applies.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ProfileNotFound`] when the id has no entry.
    pub fn resolve(&self, forced: Option<&str>) -> Result<Profile, ConfigurationError> {
        let profile_id = match forced {
            Some(forced) if !forced.is_empty() => ProfileId::new(forced),
            _ => self.document.default.clone(),
        };
        let spec = self
            .document
            .profiles
            .get(&profile_id)
            .ok_or_else(|| ConfigurationError::ProfileNotFound(profile_id.to_string()))?;
        Ok(Profile::new(profile_id, spec.engines.clone(), spec.hash_strategy.clone()))
    }
}
