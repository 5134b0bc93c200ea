// crates/fingerprint-beacon-broker/src/transport/dry_run.rs
// ============================================================================
// Module: Dry-Run Transport
// Description: Transport that records requests instead of sending them.
// Purpose: Let operators inspect submission bodies without a backend.
// Dependencies: fingerprint-beacon-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every call is written as one JSON line and answered with a fixed
//! response. The default response is `null`, so two-step submissions stop
//! after the first call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use fingerprint_beacon_core::Transport;
use fingerprint_beacon_core::TransportError;
use serde::Serialize;
use serde_json::Value;

use crate::transport::http::parse_endpoint;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Logged request record.
#[derive(Debug, Serialize)]
struct DryRunRecord<'a> {
    /// Event identifier.
    event: &'static str,
    /// Target endpoint.
    endpoint: &'a str,
    /// Request body.
    body: &'a Value,
}

/// Transport writing requests to a sink.
pub struct DryRunTransport {
    /// Destination for request records.
    writer: Mutex<Box<dyn Write + Send>>,
    /// Response returned for every call.
    response: Value,
}

impl DryRunTransport {
    /// Records requests to `writer` and answers `null`.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            response: Value::Null,
        }
    }

    /// Records requests to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Overrides the canned response.
    #[must_use]
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }
}

#[async_trait]
impl Transport for DryRunTransport {
    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError> {
        parse_endpoint(endpoint)?;
        let record = DryRunRecord {
            event: "dry_run_request",
            endpoint,
            body,
        };
        let line = serde_json::to_string(&record).map_err(|err| TransportError::Io(err.to_string()))?;
        let mut writer =
            self.writer.lock().map_err(|_| TransportError::Io("dry-run writer poisoned".to_string()))?;
        writeln!(writer, "{line}").map_err(|err| TransportError::Io(err.to_string()))?;
        writer.flush().map_err(|err| TransportError::Io(err.to_string()))?;
        drop(writer);
        Ok(self.response.clone())
    }
}
