// crates/fingerprint-beacon-core/src/audit.rs
// ============================================================================
// Module: Fingerprint Beacon Audit Logging
// Description: Structured audit events for runs, engine failures, and submissions.
// Purpose: Record swallowed failures as JSON lines without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Engine failures and submission failures never abort a run; they are
//! recorded here instead. Sinks write one JSON object per line so operators
//! can route events to any log pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::EngineId;
use crate::core::EnvelopeSummary;
use crate::core::HashDigest;
use crate::core::ProfileId;
use crate::interfaces::EngineError;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Milliseconds since the Unix epoch, zero if the clock is before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|elapsed| elapsed.as_millis()).unwrap_or(0)
}

// ============================================================================
// SECTION: Event Payloads
// ============================================================================

/// Severity attached to each audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    /// Normal operation.
    Info,
    /// Swallowed failure.
    Warn,
}

/// Emitted once per fingerprint run.
#[derive(Debug, Clone, Serialize)]
pub struct RunAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Severity.
    pub level: AuditLevel,
    /// Selected profile, absent when configuration failed before selection.
    pub profile: Option<ProfileId>,
    /// Hash strategy declared by the profile.
    pub hash_strategy: Option<String>,
    /// Engine counts for completed runs.
    pub summary: Option<EnvelopeSummary>,
    /// Canonical envelope digest for completed runs.
    pub digest: Option<HashDigest>,
    /// Configuration error message when the run aborted.
    pub error: Option<String>,
}

impl RunAuditEvent {
    /// Builds a completed-run event.
    #[must_use]
    pub fn completed(
        profile: ProfileId,
        hash_strategy: String,
        summary: EnvelopeSummary,
        digest: Option<HashDigest>,
    ) -> Self {
        Self {
            event: "fingerprint_run",
            timestamp_ms: now_ms(),
            level: AuditLevel::Info,
            profile: Some(profile),
            hash_strategy: Some(hash_strategy),
            summary: Some(summary),
            digest,
            error: None,
        }
    }

    /// Builds an aborted-run event.
    #[must_use]
    pub fn aborted(profile: Option<ProfileId>, error: String) -> Self {
        Self {
            event: "fingerprint_run",
            timestamp_ms: now_ms(),
            level: AuditLevel::Warn,
            profile,
            hash_strategy: None,
            summary: None,
            digest: None,
            error: Some(error),
        }
    }
}

/// Emitted for each enabled engine that failed.
#[derive(Debug, Clone, Serialize)]
pub struct EngineAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Severity.
    pub level: AuditLevel,
    /// Profile being run.
    pub profile: ProfileId,
    /// Failing engine.
    pub engine: EngineId,
    /// Stable failure kind.
    pub kind: &'static str,
    /// Failure message as recorded in the envelope.
    pub message: String,
}

impl EngineAuditEvent {
    /// Builds an engine-failure event.
    #[must_use]
    pub fn failure(profile: ProfileId, engine: EngineId, error: &EngineError) -> Self {
        Self {
            event: "engine_failure",
            timestamp_ms: now_ms(),
            level: AuditLevel::Warn,
            profile,
            engine,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Emitted for each network step of the submission pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Severity.
    pub level: AuditLevel,
    /// Pipeline step (`submit`, `register`, `unified`, `collect`).
    pub step: &'static str,
    /// Endpoint called.
    pub endpoint: String,
    /// Generated fingerprint identifier when known.
    pub fingerprint_id: Option<String>,
    /// Failure message when the step failed.
    pub error: Option<String>,
}

impl SubmissionAuditEvent {
    /// Builds a successful-step event.
    #[must_use]
    pub fn succeeded(step: &'static str, endpoint: &str, fingerprint_id: Option<String>) -> Self {
        Self {
            event: "submission",
            timestamp_ms: now_ms(),
            level: AuditLevel::Info,
            step,
            endpoint: endpoint.to_string(),
            fingerprint_id,
            error: None,
        }
    }

    /// Builds a failed-step event.
    #[must_use]
    pub fn failed(step: &'static str, endpoint: &str, error: String) -> Self {
        Self {
            event: "submission",
            timestamp_ms: now_ms(),
            level: AuditLevel::Warn,
            step,
            endpoint: endpoint.to_string(),
            fingerprint_id: None,
            error: Some(error),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for fingerprint events.
pub trait AuditSink: Send + Sync {
    /// Record a run event.
    fn record_run(&self, event: &RunAuditEvent);

    /// Record an engine failure event.
    fn record_engine(&self, _event: &EngineAuditEvent) {}

    /// Record a submission event.
    fn record_submission(&self, _event: &SubmissionAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Serializes `event` and writes it to stderr.
    fn emit<T: Serialize>(event: &T) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

impl AuditSink for StderrAuditSink {
    fn record_run(&self, event: &RunAuditEvent) {
        Self::emit(event);
    }

    fn record_engine(&self, event: &EngineAuditEvent) {
        Self::emit(event);
    }

    fn record_submission(&self, event: &SubmissionAuditEvent) {
        Self::emit(event);
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Serializes `event` and appends it to the log file.
    fn emit<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_run(&self, event: &RunAuditEvent) {
        self.emit(event);
    }

    fn record_engine(&self, event: &EngineAuditEvent) {
        self.emit(event);
    }

    fn record_submission(&self, event: &SubmissionAuditEvent) {
        self.emit(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_run(&self, _event: &RunAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only assertions.")]

    use super::*;

    #[test]
    fn engine_failure_event_carries_kind_and_message() {
        let event = EngineAuditEvent::failure(
            ProfileId::new("basic"),
            EngineId::new("canvas"),
            &EngineError::Timeout {
                timeout_ms: 250,
            },
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "engine_failure");
        assert_eq!(value["level"], "warn");
        assert_eq!(value["kind"], "timeout");
        assert_eq!(value["message"], "engine timed out after 250 ms");
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = FileAuditSink::new(&path).unwrap();
        sink.record_submission(&SubmissionAuditEvent::failed(
            "submit",
            "https://collector.test/webhook/fingerprint",
            "endpoint returned status 500".to_string(),
        ));
        sink.record_run(&RunAuditEvent::aborted(None, "profile not found: x".to_string()));
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["step"], "submit");
    }
}
