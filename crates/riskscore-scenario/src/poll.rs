// crates/riskscore-scenario/src/poll.rs
// ============================================================================
// Module: Bounded Poll
// Description: Fixed-interval, fixed-attempt polling helper.
// Purpose: Wait for an eventually-consistent vendor value without unbounded retry.
// Dependencies: tokio (time), tracing
// ============================================================================

//! ## Overview
//! [`poll_until`] fetches a value, checks it, and sleeps between attempts.
//! Invariants:
//! - At most `max_attempts` fetches are made.
//! - The interval is slept only between attempts, never after the last one.
//! - A fetch error ends the poll immediately; only predicate mismatches retry.

use std::future::Future;
use std::time::Duration;

/// Default delay between poll attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Default maximum number of poll attempts.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 20;

/// Poll cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between attempts.
    pub interval: Duration,
    /// Maximum number of fetches, at least one.
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Creates a policy; zero attempts is raised to one.
    #[must_use]
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Upper bound of time spent sleeping under this policy.
    #[must_use]
    pub fn max_wait(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts.saturating_sub(1))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_POLL_ATTEMPTS)
    }
}

/// Result of a poll that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The predicate held for `value`.
    Satisfied {
        /// Accepted value.
        value: T,
        /// Fetches performed, including the successful one.
        attempts: u32,
    },
    /// Every attempt was used without the predicate holding.
    Exhausted {
        /// Value seen on the final attempt.
        last: T,
        /// Fetches performed.
        attempts: u32,
    },
}

/// Fetches until `accept` holds or the policy runs out of attempts.
///
/// # Errors
///
/// Returns the first error produced by `fetch`.
pub async fn poll_until<T, E, F, Fut, P>(
    policy: PollPolicy,
    mut fetch: F,
    mut accept: P,
) -> Result<PollOutcome<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&T) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let value = fetch(attempt).await?;
        if accept(&value) {
            tracing::info!(attempt, "poll condition satisfied");
            return Ok(PollOutcome::Satisfied {
                value,
                attempts: attempt,
            });
        }
        if attempt >= max_attempts {
            tracing::warn!(attempts = attempt, "poll attempts exhausted");
            return Ok(PollOutcome::Exhausted {
                last: value,
                attempts: attempt,
            });
        }
        tracing::info!(
            attempt,
            max_attempts,
            retry_in_ms = u64::try_from(policy.interval.as_millis()).unwrap_or(u64::MAX),
            "poll condition not met; retrying"
        );
        tokio::time::sleep(policy.interval).await;
        attempt += 1;
    }
}
