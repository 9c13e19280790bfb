//! Retry loop: repeat an attempt until the policy says stop.

use super::policy::{RetryDecision, RetryPolicy};
use crate::transport::RequestOutcome;
use std::convert::Infallible;
use std::time::Duration;

/// Runs `attempt` until the policy stops, sleeping through `sleep` between
/// retryable attempts.
///
/// An `Err` from `attempt` means the request could not be issued at all; it
/// abandons the call immediately without consuming the remaining budget.
pub fn run_with_retry<F, S, E>(policy: &RetryPolicy, mut sleep: S, mut attempt: F) -> Result<RequestOutcome, E>
where
    F: FnMut() -> Result<RequestOutcome, E>,
    S: FnMut(Duration),
{
    let mut n = 1u32;
    loop {
        let outcome = attempt()?;
        match policy.decide(n, outcome) {
            RetryDecision::StopWithResult(outcome) => return Ok(outcome),
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(attempt = n, delay_ms = delay.as_millis() as u64, "retryable outcome, backing off");
                sleep(delay);
                n += 1;
            }
        }
    }
}

impl RetryPolicy {
    /// Run an infallible attempt function under this policy with real sleeps.
    pub fn execute<F>(&self, attempt: F) -> RequestOutcome
    where
        F: FnMut() -> RequestOutcome,
    {
        self.execute_with_sleep(std::thread::sleep, attempt)
    }

    /// Same as [`execute`](Self::execute) with a caller-supplied sleep.
    pub fn execute_with_sleep<F, S>(&self, sleep: S, mut attempt: F) -> RequestOutcome
    where
        F: FnMut() -> RequestOutcome,
        S: FnMut(Duration),
    {
        match run_with_retry::<_, _, Infallible>(self, sleep, || Ok(attempt())) {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }
}
