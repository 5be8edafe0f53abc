// crates/riskscore-scenario/src/error.rs
// ============================================================================
// Module: Scenario Errors
// Description: Failure taxonomy for scenario steps.
// Purpose: Keep client failures, assertion failures, and poll exhaustion apart.
// Dependencies: riskscore-client, thiserror
// ============================================================================

//! ## Overview
//! [`ScenarioError`] attributes every failure to the step that raised it.

use riskscore_client::ApiResponse;
use riskscore_client::ClientError;
use thiserror::Error;

/// Maximum number of response body characters kept in an assertion error.
pub const MAX_BODY_EXCERPT_CHARS: usize = 2048;

/// Scenario step failures.
///
/// # Invariants
/// - `Assertion` carries the step label and, when available, the response.
/// - `PollExhausted` is only produced by the scan-status poll.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The client failed before a response was available.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A step's assertion did not hold.
    #[error("step `{step}` failed: {message}{}", response_context(*.status, .body.as_deref()))]
    Assertion {
        /// Label of the failing step.
        step: &'static str,
        /// Human-readable assertion message.
        message: String,
        /// HTTP status of the offending response, when one exists.
        status: Option<u16>,
        /// Truncated body of the offending response, when one exists.
        body: Option<String>,
    },
    /// The expected scan status was never observed.
    #[error(
        "scan status `{expected}` not reached after {attempts} attempts (last seen: {})",
        last_seen.as_deref().unwrap_or("<none>")
    )]
    PollExhausted {
        /// Status the poll was waiting for.
        expected: String,
        /// Last status reported by the vendor.
        last_seen: Option<String>,
        /// Number of fetches performed.
        attempts: u32,
    },
    /// A step read context state that no earlier step wrote.
    #[error("scenario state `{field}` is not set; run the step that records it first")]
    MissingState {
        /// Name of the missing context field.
        field: &'static str,
    },
}

impl ScenarioError {
    /// Builds an assertion failure without response context.
    #[must_use]
    pub fn assertion(step: &'static str, message: impl Into<String>) -> Self {
        Self::Assertion {
            step,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    /// Builds an assertion failure carrying the offending response.
    #[must_use]
    pub fn response(step: &'static str, message: impl Into<String>, response: &ApiResponse) -> Self {
        Self::Assertion {
            step,
            message: message.into(),
            status: Some(response.status().as_u16()),
            body: Some(body_excerpt(response.body())),
        }
    }
}

/// Truncates a response body to [`MAX_BODY_EXCERPT_CHARS`] characters.
fn body_excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &body[.. cut]),
        None => body.to_string(),
    }
}

/// Renders the optional response suffix of an assertion message.
fn response_context(status: Option<u16>, body: Option<&str>) -> String {
    match (status, body) {
        (Some(status), Some(body)) if !body.is_empty() => {
            format!(" (http status {status}, body: {body})")
        }
        (Some(status), _) => format!(" (http status {status})"),
        _ => String::new(),
    }
}
