// crates/riskscore-client/src/client.rs
// ============================================================================
// Module: Authenticated Client
// Description: Bearer-token client for the risk score vendor API.
// Purpose: Obtain a token once and attach it to subsequent requests.
// Dependencies: reqwest (http types), tracing
// ============================================================================

//! ## Overview
//! [`AuthenticatedClient`] owns one transport and at most one bearer token.
//! `authenticate` replaces the stored token; `with_auth_header` refuses to
//! decorate requests until a token exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderValue;

use crate::auth::AuthToken;
use crate::auth::ClientCredentials;
use crate::auth::TokenResponse;
use crate::error::ClientError;
use crate::request::ApiRequest;
use crate::request::ApiResponse;
use crate::transport::ClientSettings;
use crate::transport::ReqwestTransport;
use crate::transport::VendorTransport;

// ============================================================================
// SECTION: Client
// ============================================================================

/// OAuth2 client-credentials authenticated vendor client.
///
/// # Invariants
/// - `token` is `Some` only after a successful `authenticate` call.
/// - The token is never refreshed; re-authenticating overwrites it.
pub struct AuthenticatedClient {
    /// Transport used for every request.
    transport: Arc<dyn VendorTransport>,
    /// Bearer token from the last successful exchange.
    token: Option<AuthToken>,
}

impl AuthenticatedClient {
    /// Creates a client backed by [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the HTTP client cannot be built.
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(settings)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Creates a client over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn VendorTransport>) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    /// Exchanges client credentials for a bearer token and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] with the raw body on a
    /// non-success status, [`ClientError::Decode`] when the body is not a
    /// token response, or [`ClientError::Transport`] when the call fails.
    pub async fn authenticate(
        &mut self,
        credentials: &ClientCredentials,
    ) -> Result<&AuthToken, ClientError> {
        tracing::info!(client_id = credentials.client_id(), "requesting vendor access token");
        let response = self.transport.send(credentials.token_request()).await?;
        if !response.is_success() {
            return Err(ClientError::Authentication {
                status: response.status().as_u16(),
                body: response.body().to_string(),
            });
        }
        let parsed: TokenResponse = response
            .json()
            .map_err(|err| ClientError::Decode(format!("invalid token response: {err}")))?;
        if parsed.access_token.trim().is_empty() {
            return Err(ClientError::Decode("token response has an empty access_token".to_string()));
        }
        let token = self.token.insert(AuthToken::from_response(parsed));
        tracing::info!(
            token_type = token.token_type(),
            expires_in_secs = token.expires_in().as_secs(),
            "vendor access token issued"
        );
        Ok(token)
    }

    /// Returns the current token, if any.
    #[must_use]
    pub const fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// Returns true once a token has been obtained.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Attaches `Authorization: Bearer <token>` to a request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] before `authenticate` has
    /// succeeded, or [`ClientError::InvalidHeader`] when the token is not a
    /// valid header value.
    pub fn with_auth_header(&self, request: ApiRequest) -> Result<ApiRequest, ClientError> {
        let token = self.token.as_ref().ok_or(ClientError::NotAuthenticated)?;
        if token.is_expired() {
            tracing::warn!("vendor access token has expired; requests may be rejected");
        }
        let mut value = HeaderValue::from_str(&token.bearer_value())
            .map_err(|_| ClientError::InvalidHeader("bearer token".to_string()))?;
        value.set_sensitive(true);
        Ok(request.header(AUTHORIZATION, value))
    }

    /// Sends a request as-is and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the call fails.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.transport.send(request).await
    }

    /// Attaches the bearer token and sends the request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the client is unauthenticated or the call fails.
    pub async fn send_authorized(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let request = self.with_auth_header(request)?;
        self.execute(request).await
    }
}
