// crates/fingerprint-beacon-cli/src/wiring.rs
// ============================================================================
// Module: Runner Wiring
// Description: Builds sources, sinks, engines, and transports from config.
// Purpose: Single assembly point for the fingerprint runner.
// Dependencies: fingerprint-beacon-broker, fingerprint-beacon-config, fingerprint-beacon-core, fingerprint-beacon-engines
// ============================================================================

//! ## Overview
//! Each builder maps one config section onto its runtime component. The
//! delivery choice (disabled, dry run, HTTP) is made once by the caller and
//! passed in as [`Delivery`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use fingerprint_beacon_broker::DryRunTransport;
use fingerprint_beacon_broker::FileProfileSource;
use fingerprint_beacon_broker::HttpProfileSource;
use fingerprint_beacon_broker::HttpTransport;
use fingerprint_beacon_broker::HttpTransportConfig;
use fingerprint_beacon_broker::InlineProfileSource;
use fingerprint_beacon_config::AuditConfig;
use fingerprint_beacon_config::AuditSinkKind;
use fingerprint_beacon_config::FingerprintBeaconConfig;
use fingerprint_beacon_config::ProfileSourceKind;
use fingerprint_beacon_config::ProfilesConfig;
use fingerprint_beacon_core::AuditSink;
use fingerprint_beacon_core::Clock;
use fingerprint_beacon_core::FileAuditSink;
use fingerprint_beacon_core::FingerprintRunner;
use fingerprint_beacon_core::NoopAuditSink;
use fingerprint_beacon_core::Orchestrator;
use fingerprint_beacon_core::ProfileSource;
use fingerprint_beacon_core::ProfileSourceError;
use fingerprint_beacon_core::StderrAuditSink;
use fingerprint_beacon_core::SubmissionPipeline;
use fingerprint_beacon_core::Transport;
use fingerprint_beacon_core::TransportError;
use fingerprint_beacon_engines::EngineRegistry;
use fingerprint_beacon_engines::HostEnvironment;
use fingerprint_beacon_engines::RegistryError;
use fingerprint_beacon_engines::SystemClock;
use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// How envelopes leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// No submission; outcomes report `disabled`.
    Disabled,
    /// Requests are logged to stderr instead of sent.
    DryRun,
    /// Requests go to the configured backend.
    Http,
}

impl Delivery {
    /// Picks the delivery mode from config and command-line switches.
    #[must_use]
    pub const fn select(config: &FingerprintBeaconConfig, dry_run: bool, no_submit: bool) -> Self {
        if no_submit {
            Self::Disabled
        } else if dry_run {
            Self::DryRun
        } else if config.submission.enabled {
            Self::Http
        } else {
            Self::Disabled
        }
    }
}

/// Errors raised while assembling components.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum WiringError {
    /// Audit sink could not be opened.
    #[error("audit sink error: {0}")]
    Audit(String),
    /// Engine registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Profile source could not be built.
    #[error("profile source error: {0}")]
    Source(#[from] ProfileSourceError),
    /// Transport could not be built.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Submission settings are unusable.
    #[error("submission config error: {0}")]
    Submission(String),
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Opens the configured audit sink.
///
/// # Errors
///
/// Returns [`WiringError::Audit`] when a file sink cannot be opened.
pub fn audit_sink(config: &AuditConfig) -> Result<Arc<dyn AuditSink>, WiringError> {
    match config.sink {
        AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
        AuditSinkKind::File => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| WiringError::Audit("audit.path is required for file sinks".to_string()))?;
            let sink = FileAuditSink::new(Path::new(path))
                .map_err(|err| WiringError::Audit(format!("{path}: {err}")))?;
            Ok(Arc::new(sink))
        }
    }
}

/// Builds the profile document source.
///
/// # Errors
///
/// Returns [`WiringError::Source`] when the source cannot be constructed.
pub fn profile_source(config: &ProfilesConfig) -> Result<Arc<dyn ProfileSource>, WiringError> {
    match config.source {
        ProfileSourceKind::File => {
            Ok(Arc::new(FileProfileSource::new(&config.path).with_max_bytes(config.max_bytes)))
        }
        ProfileSourceKind::Http => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| ProfileSourceError::Request("profiles.url is not set".to_string()))?;
            let source = HttpProfileSource::new(url, config.timeout())?.with_max_bytes(config.max_bytes);
            Ok(Arc::new(source))
        }
        ProfileSourceKind::Inline => {
            let document = config
                .document
                .as_ref()
                .ok_or_else(|| ProfileSourceError::Io("profiles.document is not set".to_string()))?;
            Ok(Arc::new(InlineProfileSource::from_document(document)?))
        }
    }
}

/// Builds the engine registry with built-in engines and access policy.
///
/// # Errors
///
/// Returns [`WiringError::Registry`] when engine identifiers collide.
pub fn engine_registry(config: &FingerprintBeaconConfig) -> Result<EngineRegistry, WiringError> {
    Ok(EngineRegistry::with_builtin_engines(config.access_policy(), config.builtin_engine_configs())?)
}

/// Builds the transport for a delivery mode.
///
/// # Errors
///
/// Returns [`WiringError::Transport`] when the HTTP client cannot be built.
pub fn transport(
    config: &FingerprintBeaconConfig,
    delivery: Delivery,
) -> Result<Option<Arc<dyn Transport>>, WiringError> {
    match delivery {
        Delivery::Disabled => Ok(None),
        Delivery::DryRun => Ok(Some(Arc::new(DryRunTransport::stderr()))),
        Delivery::Http => {
            let transport = HttpTransport::new(&HttpTransportConfig {
                timeout: config.submission.timeout(),
                max_response_bytes: config.submission.max_response_bytes,
                user_agent: config.submission.user_agent.clone(),
            })?;
            Ok(Some(Arc::new(transport)))
        }
    }
}

/// Assembles a runner for the chosen delivery mode.
///
/// # Errors
///
/// Returns [`WiringError`] when any component cannot be built.
pub fn build_runner(
    config: &FingerprintBeaconConfig,
    delivery: Delivery,
    audit: Arc<dyn AuditSink>,
) -> Result<FingerprintRunner, WiringError> {
    let transport = transport(config, delivery)?;
    build_runner_with_transport(config, transport, audit)
}

/// Assembles a runner around an explicit transport; `None` disables delivery.
///
/// # Errors
///
/// Returns [`WiringError`] when any component cannot be built.
pub fn build_runner_with_transport(
    config: &FingerprintBeaconConfig,
    transport: Option<Arc<dyn Transport>>,
    audit: Arc<dyn AuditSink>,
) -> Result<FingerprintRunner, WiringError> {
    let profiles = profile_source(&config.profiles)?;
    let registry = engine_registry(config)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let environment = Arc::new(HostEnvironment::new(config.environment_overrides()));
    let orchestrator = Orchestrator::new(
        Arc::new(registry),
        environment,
        Arc::clone(&clock),
        Arc::clone(&audit),
        config.orchestrator_config(),
    );
    let pipeline = match transport {
        None => None,
        Some(transport) => {
            let endpoints = config
                .submission
                .resolve_endpoints()
                .map_err(|err| WiringError::Submission(err.to_string()))?;
            Some(SubmissionPipeline::new(
                transport,
                clock,
                Arc::clone(&audit),
                config.submission.mode,
                endpoints,
                config.submission.origin_label.clone(),
            ))
        }
    };
    Ok(FingerprintRunner::new(profiles, orchestrator, pipeline, audit))
}
