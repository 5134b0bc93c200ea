// crates/fingerprint-beacon-config/src/config.rs
// ============================================================================
// Module: Fingerprint Beacon Configuration
// Description: Configuration loading and validation for the beacon host.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: fingerprint-beacon-core, fingerprint-beacon-engines, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed; every timeout is bounded and
//! every endpoint must resolve to an absolute `http`/`https` URL.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use fingerprint_beacon_core::ExecutionMode;
use fingerprint_beacon_core::OrchestratorConfig;
use fingerprint_beacon_core::OriginId;
use fingerprint_beacon_core::ProfileDocument;
use fingerprint_beacon_core::ScreenDimensions;
use fingerprint_beacon_core::SubmissionEndpoints;
use fingerprint_beacon_core::SubmissionMode;
use fingerprint_beacon_core::core::profile::MAX_PROFILE_DOCUMENT_BYTES;
use fingerprint_beacon_core::core::submission::DEFAULT_ORIGIN_LABEL;
use fingerprint_beacon_engines::BuiltinEngineConfigs;
use fingerprint_beacon_engines::EngineAccessPolicy;
use fingerprint_beacon_engines::EnvEngineConfig;
use fingerprint_beacon_engines::EnvironmentOverrides;
use fingerprint_beacon_engines::FileEngineConfig;
use fingerprint_beacon_engines::env::DEFAULT_ENV_KEYS;
use fingerprint_beacon_engines::file::DEFAULT_FILE_ENGINE_MAX_BYTES;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "fingerprint-beacon.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FINGERPRINT_BEACON_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Smallest accepted timeout in milliseconds.
pub const MIN_TIMEOUT_MS: u64 = 1;
/// Largest accepted timeout in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 120_000;
/// Default per-engine timeout in milliseconds.
pub const DEFAULT_ENGINE_TIMEOUT_MS: u64 = 10_000;
/// Default per-request network timeout in milliseconds.
pub const DEFAULT_NETWORK_TIMEOUT_MS: u64 = 5_000;
/// Default cap on acknowledgement bodies.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024;
/// Upper bound for configurable response caps.
pub(crate) const MAX_RESPONSE_BYTES_LIMIT: usize = 4 * 1024 * 1024;
/// Default profile document path.
const DEFAULT_PROFILES_PATH: &str = "profiles.json";
/// Default two-step fingerprint endpoint path.
const DEFAULT_FINGERPRINT_ENDPOINT: &str = "/webhook/fingerprint";
/// Default two-step event endpoint path.
const DEFAULT_EVENT_ENDPOINT: &str = "/balizas/event";
/// Default unified endpoint path.
const DEFAULT_UNIFIED_ENDPOINT: &str = "/fingerprint/collect_baliza";
/// Default generic ingestion endpoint path.
const DEFAULT_COLLECT_ENDPOINT: &str = "/fingerprint/collect";
/// Default user agent sent with submissions.
const DEFAULT_USER_AGENT: &str = concat!("fingerprint-beacon/", env!("CARGO_PKG_VERSION"));
/// Engine identifiers registered by the host itself.
const BUILTIN_ENGINE_IDS: [&str; 2] = ["host", "env"];
/// Maximum number of file-backed engines.
pub(crate) const MAX_FILE_ENGINES: usize = 64;
/// Maximum bytes for a file-backed engine capture.
pub(crate) const MAX_FILE_ENGINE_BYTES: usize = 4 * 1024 * 1024;
/// Maximum bytes for a single environment value.
pub(crate) const MAX_ENV_VALUE_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Fingerprint beacon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FingerprintBeaconConfig {
    /// Profile document source.
    #[serde(default)]
    pub profiles: ProfilesConfig,
    /// Engine scheduling and built-in engine settings.
    #[serde(default)]
    pub engines: EnginesConfig,
    /// Backend submission settings.
    #[serde(default)]
    pub submission: SubmissionConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Session metadata overrides.
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

impl FingerprintBeaconConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.profiles.validate()?;
        self.engines.validate()?;
        self.submission.validate()?;
        self.audit.validate()?;
        self.environment.validate()?;
        Ok(())
    }

    /// Orchestrator settings derived from `[engines]`.
    #[must_use]
    pub const fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            execution: self.engines.execution,
            engine_timeout: Duration::from_millis(self.engines.timeout_ms),
        }
    }

    /// Engine access policy derived from `[engines]`.
    #[must_use]
    pub fn access_policy(&self) -> EngineAccessPolicy {
        EngineAccessPolicy {
            allowlist: self.engines.allowlist.as_ref().map(|ids| ids.iter().cloned().collect()),
            denylist: self.engines.denylist.iter().cloned().collect(),
        }
    }

    /// Built-in engine settings derived from `[engines]`.
    #[must_use]
    pub fn builtin_engine_configs(&self) -> BuiltinEngineConfigs {
        BuiltinEngineConfigs {
            env: self.engines.env.to_engine_config(),
            files: self
                .engines
                .files
                .iter()
                .map(|entry| FileEngineConfig {
                    id: entry.id.clone(),
                    path: PathBuf::from(&entry.path),
                    max_bytes: entry.max_bytes,
                })
                .collect(),
        }
    }

    /// Session metadata overrides derived from `[environment]`.
    #[must_use]
    pub fn environment_overrides(&self) -> EnvironmentOverrides {
        EnvironmentOverrides {
            user_agent: self.environment.user_agent.clone(),
            language: self.environment.language.clone(),
            timezone: self.environment.timezone.clone(),
            screen: self.environment.screen,
            platform: self.environment.platform.clone(),
        }
    }
}

// ============================================================================
// SECTION: Profiles
// ============================================================================

/// Where the profile document comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSourceKind {
    /// Local JSON file.
    #[default]
    File,
    /// Remote JSON document fetched with GET.
    Http,
    /// Document embedded in this config.
    Inline,
}

/// `[profiles]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesConfig {
    /// Source kind.
    #[serde(default)]
    pub source: ProfileSourceKind,
    /// File path for `file` sources.
    #[serde(default = "default_profiles_path")]
    pub path: String,
    /// URL for `http` sources.
    #[serde(default)]
    pub url: Option<String>,
    /// Embedded document for `inline` sources.
    #[serde(default)]
    pub document: Option<ProfileDocument>,
    /// Maximum document size in bytes.
    #[serde(default = "default_profile_max_bytes")]
    pub max_bytes: usize,
    /// Fetch timeout for `http` sources.
    #[serde(default = "default_network_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            source: ProfileSourceKind::File,
            path: default_profiles_path(),
            url: None,
            document: None,
            max_bytes: default_profile_max_bytes(),
            timeout_ms: default_network_timeout_ms(),
        }
    }
}

impl ProfilesConfig {
    /// Fetch timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates the profile source settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout("profiles.timeout_ms", self.timeout_ms)?;
        if self.max_bytes == 0 || self.max_bytes > MAX_PROFILE_DOCUMENT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "profiles.max_bytes must be between 1 and {MAX_PROFILE_DOCUMENT_BYTES}"
            )));
        }
        match self.source {
            ProfileSourceKind::File => validate_path_string("profiles.path", &self.path),
            ProfileSourceKind::Http => {
                let url = self
                    .url
                    .as_deref()
                    .ok_or_else(|| ConfigError::Invalid("profiles.url is required for http sources".to_string()))?;
                parse_http_url("profiles.url", url).map(|_| ())
            }
            ProfileSourceKind::Inline => {
                if self.document.is_none() {
                    return Err(ConfigError::Invalid(
                        "profiles.document is required for inline sources".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// SECTION: Engines
// ============================================================================

/// `[engines]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EnginesConfig {
    /// Scheduling mode for enabled engines.
    #[serde(default)]
    pub execution: ExecutionMode,
    /// Per-engine timeout in milliseconds.
    #[serde(default = "default_engine_timeout_ms")]
    pub timeout_ms: u64,
    /// Optional allowlist of engine identifiers.
    #[serde(default)]
    pub allowlist: Option<Vec<String>>,
    /// Engine identifiers never loaded.
    #[serde(default)]
    pub denylist: Vec<String>,
    /// Settings for the `env` engine.
    #[serde(default)]
    pub env: EnvEngineSettings,
    /// File-backed engines.
    #[serde(default)]
    pub files: Vec<FileEngineEntry>,
}

impl Default for EnginesConfig {
    fn default() -> Self {
        Self {
            execution: ExecutionMode::default(),
            timeout_ms: default_engine_timeout_ms(),
            allowlist: None,
            denylist: Vec::new(),
            env: EnvEngineSettings::default(),
            files: Vec::new(),
        }
    }
}

impl EnginesConfig {
    /// Validates engine settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout("engines.timeout_ms", self.timeout_ms)?;
        for id in self.allowlist.iter().flatten().chain(self.denylist.iter()) {
            if id.trim().is_empty() {
                return Err(ConfigError::Invalid("engine access lists must not contain empty ids".to_string()));
            }
        }
        self.env.validate()?;
        if self.files.len() > MAX_FILE_ENGINES {
            return Err(ConfigError::Invalid(format!("engines.files exceeds {MAX_FILE_ENGINES} entries")));
        }
        let mut seen = BTreeSet::new();
        for entry in &self.files {
            entry.validate()?;
            if BUILTIN_ENGINE_IDS.contains(&entry.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "engines.files id collides with built-in engine: {}",
                    entry.id
                )));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate file engine id: {}", entry.id)));
            }
        }
        Ok(())
    }
}

/// `[engines.env]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvEngineSettings {
    /// Variables to report.
    #[serde(default = "default_env_allowlist")]
    pub allowlist: Vec<String>,
    /// Variables never reported.
    #[serde(default)]
    pub denylist: Vec<String>,
    /// Maximum bytes for a single value.
    #[serde(default = "default_env_max_value_bytes")]
    pub max_value_bytes: usize,
    /// Maximum bytes for a single key.
    #[serde(default = "default_env_max_key_bytes")]
    pub max_key_bytes: usize,
}

impl Default for EnvEngineSettings {
    fn default() -> Self {
        Self {
            allowlist: default_env_allowlist(),
            denylist: Vec::new(),
            max_value_bytes: default_env_max_value_bytes(),
            max_key_bytes: default_env_max_key_bytes(),
        }
    }
}

impl EnvEngineSettings {
    /// Converts to the engine's runtime configuration.
    fn to_engine_config(&self) -> EnvEngineConfig {
        EnvEngineConfig {
            allowlist: self.allowlist.iter().cloned().collect(),
            denylist: self.denylist.iter().cloned().collect(),
            max_value_bytes: self.max_value_bytes,
            max_key_bytes: self.max_key_bytes,
            overrides: None,
        }
    }

    /// Validates env engine limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_value_bytes == 0 || self.max_value_bytes > MAX_ENV_VALUE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "engines.env.max_value_bytes must be between 1 and {MAX_ENV_VALUE_BYTES}"
            )));
        }
        if self.max_key_bytes == 0 || self.max_key_bytes > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "engines.env.max_key_bytes must be between 1 and {MAX_PATH_COMPONENT_LENGTH}"
            )));
        }
        for key in &self.allowlist {
            if key.is_empty() || key.len() > self.max_key_bytes {
                return Err(ConfigError::Invalid(format!("engines.env.allowlist key out of bounds: {key}")));
            }
        }
        Ok(())
    }
}

/// `[[engines.files]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FileEngineEntry {
    /// Engine identifier served by the file.
    pub id: String,
    /// Path of the JSON capture.
    pub path: String,
    /// Maximum file size in bytes.
    #[serde(default = "default_file_engine_max_bytes")]
    pub max_bytes: usize,
}

impl FileEngineEntry {
    /// Validates one file engine entry.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Invalid("engines.files.id must be non-empty".to_string()));
        }
        validate_path_string("engines.files.path", &self.path)?;
        if self.max_bytes == 0 || self.max_bytes > MAX_FILE_ENGINE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "engines.files.max_bytes must be between 1 and {MAX_FILE_ENGINE_BYTES}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Submission
// ============================================================================

/// `[submission]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    /// Whether envelopes are delivered at all.
    #[serde(default)]
    pub enabled: bool,
    /// Backend protocol.
    #[serde(default)]
    pub mode: SubmissionMode,
    /// Default origin identifier for activations.
    #[serde(default)]
    pub origin: Option<String>,
    /// Origin label sent with `origen`.
    #[serde(default = "default_origin_label")]
    pub origin_label: String,
    /// Base URL joined with relative endpoints.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Endpoint paths or absolute URLs.
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_network_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum acknowledgement size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// User agent sent with requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: SubmissionMode::default(),
            origin: None,
            origin_label: default_origin_label(),
            base_url: None,
            endpoints: EndpointsConfig::default(),
            timeout_ms: default_network_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl SubmissionConfig {
    /// Request timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Configured origin, when present.
    #[must_use]
    pub fn origin_id(&self) -> Option<OriginId> {
        self.origin.as_deref().map(str::trim).filter(|origin| !origin.is_empty()).map(OriginId::new)
    }

    /// Resolves every endpoint to an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an endpoint cannot be resolved.
    pub fn resolve_endpoints(&self) -> Result<SubmissionEndpoints, ConfigError> {
        let base = self.base_url.as_deref().map(|base| parse_http_url("submission.base_url", base)).transpose()?;
        let resolve = |field: &str, value: &str| resolve_endpoint(field, base.as_ref(), value);
        Ok(SubmissionEndpoints {
            fingerprint: resolve("submission.endpoints.fingerprint", &self.endpoints.fingerprint)?,
            event: resolve("submission.endpoints.event", &self.endpoints.event)?,
            unified: resolve("submission.endpoints.unified", &self.endpoints.unified)?,
            collect: resolve("submission.endpoints.collect", &self.endpoints.collect)?,
        })
    }

    /// Validates submission settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout("submission.timeout_ms", self.timeout_ms)?;
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_RESPONSE_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "submission.max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES_LIMIT}"
            )));
        }
        if self.origin_label.trim().is_empty() {
            return Err(ConfigError::Invalid("submission.origin_label must be non-empty".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("submission.user_agent must be non-empty".to_string()));
        }
        if let Some(origin) = &self.origin
            && origin.trim().is_empty()
        {
            return Err(ConfigError::Invalid("submission.origin must be non-empty when set".to_string()));
        }
        if self.enabled {
            self.resolve_endpoints()?;
        }
        Ok(())
    }
}

/// `[submission.endpoints]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointsConfig {
    /// Two-step fingerprint submission.
    #[serde(default = "default_fingerprint_endpoint")]
    pub fingerprint: String,
    /// Two-step event registration.
    #[serde(default = "default_event_endpoint")]
    pub event: String,
    /// Unified fingerprint + VIEW endpoint.
    #[serde(default = "default_unified_endpoint")]
    pub unified: String,
    /// Generic ingestion endpoint.
    #[serde(default = "default_collect_endpoint")]
    pub collect: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            fingerprint: default_fingerprint_endpoint(),
            event: default_event_endpoint(),
            unified: default_unified_endpoint(),
            collect: default_collect_endpoint(),
        }
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    None,
}

/// `[audit]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log path for `file` sinks.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates the audit sink settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for file sinks".to_string()))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Environment
// ============================================================================

/// `[environment]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    /// User-agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Preferred locale (BCP 47).
    #[serde(default)]
    pub language: Option<String>,
    /// IANA timezone identifier.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Screen dimensions as `WIDTHxHEIGHT`.
    #[serde(default)]
    pub screen: Option<ScreenDimensions>,
    /// Platform string.
    #[serde(default)]
    pub platform: Option<String>,
}

impl EnvironmentConfig {
    /// Rejects blank overrides.
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("environment.user_agent", &self.user_agent),
            ("environment.language", &self.language),
            ("environment.timezone", &self.timezone),
            ("environment.platform", &self.platform),
        ];
        for (field, value) in fields {
            if value.as_deref().is_some_and(|value| value.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!("{field} must be non-empty when set")));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Ensures a timeout sits within the accepted window.
fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
        )));
    }
    Ok(())
}

/// Parses an absolute `http`/`https` URL.
fn parse_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|err| ConfigError::Invalid(format!("{field} is not a valid url: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::Invalid(format!("{field} uses unsupported scheme: {scheme}"))),
    }
}

/// Resolves an endpoint against the optional base URL.
fn resolve_endpoint(field: &str, base: Option<&Url>, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    match Url::parse(trimmed) {
        Ok(_) => parse_http_url(field, trimmed).map(String::from),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| {
                ConfigError::Invalid(format!("{field} is relative and submission.base_url is not set"))
            })?;
            base.join(trimmed)
                .map(String::from)
                .map_err(|err| ConfigError::Invalid(format!("{field} cannot be joined: {err}")))
        }
        Err(err) => Err(ConfigError::Invalid(format!("{field} is not a valid url: {err}"))),
    }
}

/// Default profile document path.
fn default_profiles_path() -> String {
    DEFAULT_PROFILES_PATH.to_string()
}

/// Default profile document cap.
const fn default_profile_max_bytes() -> usize {
    MAX_PROFILE_DOCUMENT_BYTES
}

/// Default network timeout.
const fn default_network_timeout_ms() -> u64 {
    DEFAULT_NETWORK_TIMEOUT_MS
}

/// Default engine timeout.
const fn default_engine_timeout_ms() -> u64 {
    DEFAULT_ENGINE_TIMEOUT_MS
}

/// Default env engine allowlist.
fn default_env_allowlist() -> Vec<String> {
    DEFAULT_ENV_KEYS.iter().map(|key| (*key).to_string()).collect()
}

/// Default env value cap.
const fn default_env_max_value_bytes() -> usize {
    4 * 1024
}

/// Default env key cap.
const fn default_env_max_key_bytes() -> usize {
    MAX_PATH_COMPONENT_LENGTH
}

/// Default file engine cap.
const fn default_file_engine_max_bytes() -> usize {
    DEFAULT_FILE_ENGINE_MAX_BYTES
}

/// Default origin label.
fn default_origin_label() -> String {
    DEFAULT_ORIGIN_LABEL.to_string()
}

/// Default acknowledgement cap.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default user agent.
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Default fingerprint endpoint.
fn default_fingerprint_endpoint() -> String {
    DEFAULT_FINGERPRINT_ENDPOINT.to_string()
}

/// Default event endpoint.
fn default_event_endpoint() -> String {
    DEFAULT_EVENT_ENDPOINT.to_string()
}

/// Default unified endpoint.
fn default_unified_endpoint() -> String {
    DEFAULT_UNIFIED_ENDPOINT.to_string()
}

/// Default collect endpoint.
fn default_collect_endpoint() -> String {
    DEFAULT_COLLECT_ENDPOINT.to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only assertions are permitted.")]

    use super::*;

    #[test]
    fn validate_path_string_rejects_blank_and_long_components() {
        assert!(validate_path_string("p", "./captures/browser.json").is_ok());
        assert!(validate_path_string("p", "   ").unwrap_err().to_string().contains("non-empty"));
        let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        assert!(validate_path_string("p", &long).unwrap_err().to_string().contains("component"));
    }

    #[test]
    fn timeout_bounds_are_inclusive() {
        assert!(validate_timeout("t", MIN_TIMEOUT_MS).is_ok());
        assert!(validate_timeout("t", MAX_TIMEOUT_MS).is_ok());
        assert!(validate_timeout("t", 0).is_err());
        assert!(validate_timeout("t", MAX_TIMEOUT_MS + 1).is_err());
    }

    #[test]
    fn relative_endpoints_join_base() {
        let base = Url::parse("https://collector.example.com/api/").unwrap();
        let joined = resolve_endpoint("e", Some(&base), "/webhook/fingerprint").unwrap();
        assert_eq!(joined, "https://collector.example.com/webhook/fingerprint");
        let absolute = resolve_endpoint("e", Some(&base), "http://other.test/x").unwrap();
        assert_eq!(absolute, "http://other.test/x");
    }

    #[test]
    fn relative_endpoint_without_base_is_invalid() {
        let err = resolve_endpoint("e", None, "/webhook/fingerprint").unwrap_err();
        assert!(err.to_string().contains("base_url"));
        let err = resolve_endpoint("e", None, "ftp://files.test/drop").unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }
}
