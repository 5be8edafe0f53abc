// crates/riskscore-client/src/transport.rs
// ============================================================================
// Module: Vendor Transport
// Description: HTTP transport seam and reqwest implementation.
// Purpose: Send ApiRequest values against one fixed base endpoint.
// Dependencies: async-trait, reqwest, tracing, url
// ============================================================================

//! ## Overview
//! [`VendorTransport`] is the single seam between the client and the network.
//! [`ReqwestTransport`] resolves request paths against the configured base
//! URL, encodes query/JSON/form bodies, and applies the per-request timeout.
//! Invariants:
//! - Redirects are not followed.
//! - Non-success statuses are returned as responses, never as errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use url::Url;

use crate::error::ClientError;
use crate::request::ApiRequest;
use crate::request::ApiResponse;
use crate::request::RequestBody;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Base URL of the vendor API.
pub const DEFAULT_BASE_URL: &str = "https://seam.riskscore.cards";
/// Per-request timeout applied to every vendor call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Connection settings for the vendor endpoint.
///
/// # Invariants
/// - `base_url` uses the `http` or `https` scheme.
/// - `timeout` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL every request path is resolved against.
    pub base_url: Url,
    /// Timeout applied to each request.
    pub timeout: Duration,
}

impl ClientSettings {
    /// Builds settings from a base URL string and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the URL is invalid, uses an
    /// unsupported scheme, or the timeout is zero.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ClientError::Config(format!("invalid base url {base_url}: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported base url scheme: {}",
                base_url.scheme()
            )));
        }
        if timeout.is_zero() {
            return Err(ClientError::Config("timeout must be greater than zero".to_string()));
        }
        Ok(Self {
            base_url,
            timeout,
        })
    }

    /// Returns settings for the production vendor endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the built-in base URL fails to parse.
    pub fn vendor_default() -> Result<Self, ClientError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }
}

// ============================================================================
// SECTION: Transport Trait
// ============================================================================

/// Sends vendor requests and returns raw responses.
#[async_trait]
pub trait VendorTransport: Send + Sync {
    /// Sends a request and returns the uninterpreted response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the request cannot be sent or
    /// the response body cannot be read.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError>;
}

// ============================================================================
// SECTION: Reqwest Transport
// ============================================================================

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Reqwest client instance.
    client: Client,
    /// Base URL request paths are joined onto.
    base_url: Url,
}

impl ReqwestTransport {
    /// Builds a transport from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the HTTP client cannot be built.
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| ClientError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self::with_client(settings.base_url.clone(), client))
    }

    /// Builds a transport from an existing reqwest client.
    #[must_use]
    pub const fn with_client(base_url: Url, client: Client) -> Self {
        Self {
            client,
            base_url,
        }
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path against the base URL.
    fn resolve(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Config(format!("invalid request path {path}: {err}")))
    }
}

#[async_trait]
impl VendorTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = self.resolve(request.path())?;
        tracing::debug!(
            method = %request.method(),
            path = request.path(),
            body = request.body().kind(),
            "sending vendor request"
        );
        let mut builder = self
            .client
            .request(request.method().clone(), url)
            .headers(request.headers().clone());
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(pairs) => builder.form(pairs),
        };
        let response = builder.send().await.map_err(|err| ClientError::Transport(err.to_string()))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|err| ClientError::Transport(err.to_string()))?;
        tracing::debug!(
            method = %request.method(),
            path = request.path(),
            status = status.as_u16(),
            "vendor response received"
        );
        Ok(ApiResponse::new(status, headers, body))
    }
}
