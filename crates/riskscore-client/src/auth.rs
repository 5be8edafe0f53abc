// crates/riskscore-client/src/auth.rs
// ============================================================================
// Module: Client Credentials Auth
// Description: OAuth2 client-credentials request and token types.
// Purpose: Build the token exchange request and hold the resulting token.
// Dependencies: serde, reqwest (http types)
// ============================================================================

//! ## Overview
//! The vendor issues bearer tokens through a form-encoded client-credentials
//! exchange. [`ClientCredentials`] and [`AuthToken`] never print their secret
//! parts through `Debug`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;
use std::time::Instant;

use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderValue;
use serde::Deserialize;

use crate::request::ApiRequest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Token endpoint path.
pub const TOKEN_PATH: &str = "/api/v2/oauth/token";
/// OAuth2 grant type used for the exchange.
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Vendor API client credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// Client identifier.
    client_id: String,
    /// Client secret.
    client_secret: String,
}

impl ClientCredentials {
    /// Creates a credentials pair.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns the client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Builds the form-encoded token exchange request.
    #[must_use]
    pub fn token_request(&self) -> ApiRequest {
        ApiRequest::post(TOKEN_PATH)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"))
            .form([
                ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SECTION: Token
// ============================================================================

/// Token endpoint response body.
#[derive(Deserialize)]
pub struct TokenResponse {
    /// Issued bearer token.
    pub access_token: String,
    /// Token type label (normally `Bearer`).
    #[serde(default)]
    pub token_type: String,
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires_in: u64,
}

/// Bearer token held by an authenticated client.
///
/// # Invariants
/// - `access_token` is non-empty.
/// - `expires_at` is derived from the local receive time, not vendor clocks.
#[derive(Clone)]
pub struct AuthToken {
    /// Bearer token value.
    access_token: String,
    /// Token type label.
    token_type: String,
    /// Lifetime reported by the vendor.
    expires_in: Duration,
    /// Local instant the token was received.
    issued_at: Instant,
}

impl AuthToken {
    /// Creates a token from a decoded token response.
    #[must_use]
    pub fn from_response(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: Duration::from_secs(response.expires_in),
            issued_at: Instant::now(),
        }
    }

    /// Returns the token type label.
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the lifetime reported by the vendor.
    #[must_use]
    pub const fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Returns true once the reported lifetime has elapsed.
    ///
    /// A zero lifetime means the vendor did not report one.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self.expires_in.is_zero() && self.issued_at.elapsed() >= self.expires_in
    }

    /// Returns the `Authorization` header value.
    pub(crate) fn bearer_value(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}
