// crates/fingerprint-beacon-broker/src/transport/http.rs
// ============================================================================
// Module: HTTP Transport
// Description: JSON POST transport for the collection backend.
// Purpose: Send submission bodies and parse acknowledgements.
// Dependencies: fingerprint-beacon-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! Each call is a single `POST` with a JSON body. The client refuses
//! redirects and applies a whole-request timeout. Responses must carry a
//! success status; bodies are streamed under a hard size cap. An empty body
//! parses as `null`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use fingerprint_beacon_core::Transport;
use fingerprint_beacon_core::TransportError;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde_json::Value;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Default maximum response size.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Maximum accepted response body size.
    pub max_response_bytes: usize,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: format!("fingerprint-beacon/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// reqwest-backed JSON transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client used for submission requests.
    client: Client,
    /// Maximum accepted response body size.
    max_response_bytes: usize,
}

impl HttpTransport {
    /// Builds a transport from settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when the client cannot be built.
    pub fn new(config: &HttpTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        Ok(Self {
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError> {
        let url = parse_endpoint(endpoint)?;
        let payload = serde_json::to_vec(body).map_err(|err| TransportError::Request(err.to_string()))?;
        let mut response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let too_large = TransportError::TooLarge {
            max_bytes: self.max_response_bytes,
        };
        if let Some(length) = response.content_length()
            && usize::try_from(length).map_or(true, |length| length > self.max_response_bytes)
        {
            return Err(too_large);
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|err| TransportError::Request(err.to_string()))? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() > self.max_response_bytes {
                return Err(too_large);
            }
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|err| TransportError::Decode(err.to_string()))
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url, TransportError> {
    let url = Url::parse(endpoint).map_err(|err| TransportError::Request(format!("invalid endpoint: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(TransportError::Request(format!("unsupported endpoint scheme: {scheme}"))),
    }
}
