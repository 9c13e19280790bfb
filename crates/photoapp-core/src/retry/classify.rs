//! Classify a single attempt's outcome for retry purposes.

use crate::transport::RequestOutcome;

/// What one attempt means for the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    /// The service answered meaningfully (200, 400 or 500). Stop.
    Final,
    /// The service answered with some other status.
    RetryableStatus(u16),
    /// No response was obtained.
    TransportFailed,
}

/// Statuses that count as a meaningful answer, including the two error codes.
pub fn is_final_status(status: u16) -> bool {
    matches!(status, 200 | 400 | 500)
}

pub fn classify_attempt(outcome: &RequestOutcome) -> AttemptKind {
    match outcome {
        RequestOutcome::Responded { status, .. } if is_final_status(*status) => AttemptKind::Final,
        RequestOutcome::Responded { status, .. } => AttemptKind::RetryableStatus(*status),
        RequestOutcome::TransportFailed(_) => AttemptKind::TransportFailed,
    }
}
