use super::classify::{classify_attempt, AttemptKind};
use crate::transport::RequestOutcome;
use std::time::Duration;

/// Decision returned by the retry policy after one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RetryDecision {
    /// Hand this outcome back to the caller.
    StopWithResult(RequestOutcome),
    /// Try again after the given delay.
    RetryAfter(Duration),
}

/// Fixed attempt budget with linear backoff.
///
/// After the n-th retryable attempt the loop sleeps `n * backoff_unit`, so
/// the default schedule is 1s then 2s, with no fourth attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Backoff step; the delay grows by this much per attempt already made.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do with the outcome of attempt number `attempt` (1-based).
    pub(crate) fn decide(&self, attempt: u32, outcome: RequestOutcome) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::StopWithResult(outcome);
        }
        match classify_attempt(&outcome) {
            AttemptKind::Final => RetryDecision::StopWithResult(outcome),
            AttemptKind::RetryableStatus(_) | AttemptKind::TransportFailed => {
                RetryDecision::RetryAfter(self.backoff_unit.saturating_mul(attempt))
            }
        }
    }
}
