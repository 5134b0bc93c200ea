// crates/fingerprint-beacon-broker/src/source/http.rs
// ============================================================================
// Module: HTTP Profile Source
// Description: Profile document fetched with HTTP GET.
// Purpose: Serve profile documents published next to the page assets.
// Dependencies: fingerprint-beacon-core, reqwest, url
// ============================================================================

//! ## Overview
//! `HttpProfileSource` fetches an `http://` or `https://` URL. Redirects are
//! refused, non-success status codes fail, and bodies are size-capped while
//! streaming.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use fingerprint_beacon_core::ProfileSource;
use fingerprint_beacon_core::ProfileSourceError;
use reqwest::Client;
use reqwest::redirect::Policy;
use url::Url;

use crate::source::MAX_PROFILE_DOCUMENT_BYTES;
use crate::source::enforce_max_bytes;

// ============================================================================
// SECTION: HTTP Source
// ============================================================================

/// HTTP-backed profile document source.
#[derive(Debug, Clone)]
pub struct HttpProfileSource {
    /// HTTP client used for fetch requests.
    client: Client,
    /// Document URL.
    url: Url,
    /// Maximum document size.
    max_bytes: usize,
}

impl HttpProfileSource {
    /// Builds a source for `url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileSourceError`] when the URL is invalid or the client
    /// cannot be constructed.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ProfileSourceError> {
        let url = Url::parse(url).map_err(|err| ProfileSourceError::Request(format!("invalid url: {err}")))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ProfileSourceError::Request(format!("unsupported url scheme: {scheme}")));
            }
        }
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|err| ProfileSourceError::Request(err.to_string()))?;
        Ok(Self {
            client,
            url,
            max_bytes: MAX_PROFILE_DOCUMENT_BYTES,
        })
    }

    /// Overrides the size limit.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn fetch(&self) -> Result<Vec<u8>, ProfileSourceError> {
        let mut response = self
            .client
            .get(self.url.as_str())
            .send()
            .await
            .map_err(|err| ProfileSourceError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ProfileSourceError::Request(format!("http status {}", response.status())));
        }
        if let Some(length) = response.content_length()
            && usize::try_from(length).map_or(true, |length| length > self.max_bytes)
        {
            return Err(ProfileSourceError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }
        let mut bytes = Vec::new();
        while let Some(chunk) =
            response.chunk().await.map_err(|err| ProfileSourceError::Request(err.to_string()))?
        {
            bytes.extend_from_slice(&chunk);
            enforce_max_bytes(bytes.len(), self.max_bytes)?;
        }
        Ok(bytes)
    }
}
