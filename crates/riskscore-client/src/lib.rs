// crates/riskscore-client/src/lib.rs
// ============================================================================
// Module: Risk Score Client Library
// Description: OAuth2-authenticated REST client for the risk score vendor API.
// Purpose: Exchange client credentials for a bearer token and send requests.
// Dependencies: reqwest, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`AuthenticatedClient`] performs the client-credentials token exchange,
//! stores the resulting bearer token, and decorates outgoing [`ApiRequest`]s
//! with an `Authorization` header. Requests are sent through the
//! [`VendorTransport`] seam; [`ReqwestTransport`] is the production transport.
//! Invariants:
//! - Responses are returned uninterpreted; status checks belong to callers.
//! - Bearer tokens and client secrets are redacted from `Debug` output.
//! - Tokens are never refreshed automatically.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod client;
pub mod error;
pub mod request;
pub mod transport;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::AuthToken;
pub use auth::ClientCredentials;
pub use auth::TOKEN_PATH;
pub use auth::TokenResponse;
pub use client::AuthenticatedClient;
pub use error::ClientError;
pub use request::ApiRequest;
pub use request::ApiResponse;
pub use request::RequestBody;
pub use reqwest::Method;
pub use reqwest::StatusCode;
pub use reqwest::header::HeaderMap;
pub use transport::ClientSettings;
pub use transport::DEFAULT_BASE_URL;
pub use transport::DEFAULT_TIMEOUT;
pub use transport::ReqwestTransport;
pub use transport::VendorTransport;
