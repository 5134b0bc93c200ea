// crates/fingerprint-beacon-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Fixtures
// Description: In-memory engines, loaders, transports, and sinks.
// ============================================================================
//! ## Overview
//! Scriptable collaborators that record how the runtime calls them.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use fingerprint_beacon_core::AuditSink;
use fingerprint_beacon_core::Clock;
use fingerprint_beacon_core::Engine;
use fingerprint_beacon_core::EngineError;
use fingerprint_beacon_core::EngineId;
use fingerprint_beacon_core::EngineLoader;
use fingerprint_beacon_core::EngineReport;
use fingerprint_beacon_core::EntropyEstimate;
use fingerprint_beacon_core::EnvironmentSnapshot;
use fingerprint_beacon_core::ExecutionMode;
use fingerprint_beacon_core::Orchestrator;
use fingerprint_beacon_core::OrchestratorConfig;
use fingerprint_beacon_core::ProfileSource;
use fingerprint_beacon_core::ProfileSourceError;
use fingerprint_beacon_core::ScreenDimensions;
use fingerprint_beacon_core::StaticEnvironment;
use fingerprint_beacon_core::Transport;
use fingerprint_beacon_core::TransportError;
use fingerprint_beacon_core::audit::EngineAuditEvent;
use fingerprint_beacon_core::audit::RunAuditEvent;
use fingerprint_beacon_core::audit::SubmissionAuditEvent;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Engines
// ============================================================================

/// Scripted engine behavior.
#[derive(Clone)]
pub enum Behavior {
    /// Return the report.
    Succeed(EngineReport),
    /// Fail during `run()`.
    Fail(String),
    /// Sleep, then return the report.
    Slow(Duration, EngineReport),
    /// Panic inside `run()`.
    Panic,
}

/// Engine executing a scripted behavior and counting runs.
struct ScriptedEngine {
    behavior: Behavior,
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Engine for ScriptedEngine {
    async fn run(&self) -> Result<EngineReport, EngineError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Succeed(report) => Ok(report.clone()),
            Behavior::Fail(message) => Err(EngineError::Runtime(message.clone())),
            Behavior::Slow(delay, report) => {
                tokio::time::sleep(*delay).await;
                Ok(report.clone())
            }
            Behavior::Panic => panic!("scripted engine panic"),
        }
    }
}

/// Loader with per-engine load and run counters.
#[derive(Default)]
pub struct ScriptedLoader {
    behaviors: BTreeMap<String, Behavior>,
    loads: Mutex<BTreeMap<String, usize>>,
    runs: Mutex<BTreeMap<String, Arc<AtomicUsize>>>,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, engine: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(engine.to_string(), behavior);
        self
    }

    pub fn load_count(&self, engine: &str) -> usize {
        self.loads.lock().unwrap().get(engine).copied().unwrap_or(0)
    }

    pub fn run_count(&self, engine: &str) -> usize {
        self.runs.lock().unwrap().get(engine).map_or(0, |count| count.load(Ordering::SeqCst))
    }

    pub fn total_loads(&self) -> usize {
        self.loads.lock().unwrap().values().sum()
    }
}

impl EngineLoader for ScriptedLoader {
    fn load(&self, engine_id: &EngineId) -> Result<Box<dyn Engine>, EngineError> {
        *self.loads.lock().unwrap().entry(engine_id.to_string()).or_default() += 1;
        let behavior = self
            .behaviors
            .get(engine_id.as_str())
            .cloned()
            .ok_or_else(|| EngineError::NotFound(engine_id.to_string()))?;
        let runs = Arc::clone(self.runs.lock().unwrap().entry(engine_id.to_string()).or_default());
        Ok(Box::new(ScriptedEngine {
            behavior,
            runs,
        }))
    }
}

/// Builds a valid report for `engine`.
pub fn report(engine: &str, confidence: f64, data: Value) -> EngineReport {
    EngineReport {
        engine: engine.to_string(),
        version: "v1".to_string(),
        confidence,
        data,
        entropy: EntropyEstimate {
            bits: 2.0,
            signals: 1,
        },
    }
}

// ============================================================================
// SECTION: Host Context
// ============================================================================

/// Clock frozen at a fixed instant.
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// 2024-05-01T12:00:00Z.
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(OffsetDateTime::from_unix_timestamp(1_714_564_800).unwrap()))
}

/// Deterministic host snapshot.
pub fn environment() -> Arc<StaticEnvironment> {
    Arc::new(StaticEnvironment::new(EnvironmentSnapshot {
        user_agent: "test-agent/1.0".to_string(),
        language: "es-ES".to_string(),
        timezone: "Europe/Madrid".to_string(),
        screen: Some(ScreenDimensions {
            width: 1920,
            height: 1080,
        }),
        platform: "Linux x86_64".to_string(),
    }))
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink capturing events in memory.
#[derive(Default)]
pub struct RecordingAudit {
    pub runs: Mutex<Vec<RunAuditEvent>>,
    pub engines: Mutex<Vec<EngineAuditEvent>>,
    pub submissions: Mutex<Vec<SubmissionAuditEvent>>,
}

impl AuditSink for RecordingAudit {
    fn record_run(&self, event: &RunAuditEvent) {
        self.runs.lock().unwrap().push(event.clone());
    }

    fn record_engine(&self, event: &EngineAuditEvent) {
        self.engines.lock().unwrap().push(event.clone());
    }

    fn record_submission(&self, event: &SubmissionAuditEvent) {
        self.submissions.lock().unwrap().push(event.clone());
    }
}

/// Orchestrator over scripted collaborators.
pub fn orchestrator(
    loader: Arc<ScriptedLoader>,
    audit: Arc<RecordingAudit>,
    execution: ExecutionMode,
    engine_timeout: Duration,
) -> Orchestrator {
    Orchestrator::new(
        loader,
        environment(),
        fixed_clock(),
        audit,
        OrchestratorConfig {
            execution,
            engine_timeout,
        },
    )
}

// ============================================================================
// SECTION: Profile Sources
// ============================================================================

/// Profile source serving fixed bytes and counting fetches.
pub struct StaticSource {
    body: Option<Vec<u8>>,
    pub fetches: AtomicUsize,
}

impl StaticSource {
    pub fn json(value: &Value) -> Self {
        Self {
            body: Some(serde_json::to_vec(value).unwrap()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            body: None,
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ProfileSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<u8>, ProfileSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.body.clone().ok_or_else(|| ProfileSourceError::Io("not found".to_string()))
    }
}

/// Two-profile document: `basic` (a on, b off) and `full` (a, b, c on).
pub fn profile_document() -> Value {
    json!({
        "default": "basic",
        "profiles": {
            "basic": {"engines": {"a": true, "b": false}, "hash_strategy": "sha256"},
            "full": {"engines": {"a": true, "b": true, "c": true}, "hash_strategy": "weighted"}
        }
    })
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// One recorded transport call.
#[derive(Debug, Clone)]
pub struct Call {
    pub endpoint: String,
    pub body: Value,
}

/// Transport answering from a per-endpoint script and recording calls.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<BTreeMap<String, VecDeque<Result<Value, TransportError>>>>,
    pub calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, endpoint: &str, response: Result<Value, TransportError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(Call {
            endpoint: endpoint.to_string(),
            body: body.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::Status(404)))
    }
}
