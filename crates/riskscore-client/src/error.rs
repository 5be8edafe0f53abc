// crates/riskscore-client/src/error.rs
// ============================================================================
// Module: Client Errors
// Description: Error taxonomy for the vendor REST client.
// Purpose: Separate transport, authentication, and decoding failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ClientError`] covers transport, authentication, and decoding failures.

use thiserror::Error;

/// Vendor client errors.
///
/// # Invariants
/// - Variants are stable for scenario error mapping and tests.
/// - String payloads may include untrusted vendor response text.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid client configuration (base URL, timeout).
    #[error("client config error: {0}")]
    Config(String),
    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    /// The token endpoint answered with a non-success status.
    #[error("authentication failed with http status {status}: {body}")]
    Authentication {
        /// HTTP status code returned by the token endpoint.
        status: u16,
        /// Raw response body returned by the token endpoint.
        body: String,
    },
    /// An authorized request was attempted before a token was obtained.
    #[error("client is not authenticated; authenticate before sending requests")]
    NotAuthenticated,
    /// A response body did not match the expected JSON shape.
    #[error("response decode error: {0}")]
    Decode(String),
    /// A header value could not be encoded.
    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}
