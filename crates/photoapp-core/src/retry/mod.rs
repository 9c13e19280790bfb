//! Retry and backoff policy.
//!
//! A request attempt either reaches a final answer (HTTP 200, 400 or 500) or
//! is retryable (any other status, or no response at all). Retryable attempts
//! are repeated with linear backoff until the attempt budget is spent, and the
//! last outcome is returned as-is.

mod classify;
mod policy;
mod run;

pub use classify::{classify_attempt, is_final_status, AttemptKind};
pub use policy::RetryPolicy;
pub use run::run_with_retry;
