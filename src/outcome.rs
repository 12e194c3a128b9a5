use std::time::Duration;

use chrono::{DateTime, Utc};

/// How one request attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The server answered. Any status code counts as a completed attempt.
    Response { status: u16 },
    /// The descriptor could not be built for this attempt.
    BuildFailed { reason: String },
    /// The transport failed before a response arrived.
    TransportFailed { reason: String },
    /// The per-request timeout expired.
    TimedOut,
}

/// The recorded result of executing one request attempt. Streamed from
/// the dispatcher to the aggregator in completion order.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// Position of the originating target in the run's target list.
    pub target_index: usize,
    /// Wall-clock time the attempt started.
    pub started_at: DateTime<Utc>,
    /// Time from send to the response body being fully drained. Zero for
    /// attempts that never produced a request.
    pub latency: Duration,
    pub kind: OutcomeKind,
    /// Response body bytes drained. Zero for failures.
    pub response_bytes: u64,
}

impl RequestOutcome {
    /// A 2xx or 3xx response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.kind, OutcomeKind::Response { status } if (200..400).contains(&status))
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            OutcomeKind::Response { status } => Some(*status),
            OutcomeKind::BuildFailed { .. }
            | OutcomeKind::TransportFailed { .. }
            | OutcomeKind::TimedOut => None,
        }
    }
}
