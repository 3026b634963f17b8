//! Transfer statistics for a session
//!
//! Counters are monotonically non-decreasing for the session's lifetime.
//! After any sequence of non-blocking completions the identity
//! `attempted == enqueued + dropped_oldest + dropped_newest + errors`
//! holds, and `overflow_events` counts exactly one per send that could not
//! be satisfied without eviction or blocking.

use serde::{Deserialize, Serialize};

/// Statistics for session transfer operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Sends started, regardless of outcome
    pub attempted: u64,
    /// Messages admitted to the queue
    pub enqueued: u64,
    /// Head messages evicted by the `dropoldest` policy
    pub dropped_oldest: u64,
    /// New messages rejected by the `dropnewest` policy
    pub dropped_newest: u64,
    /// Sends that entered a `block`-policy wait
    pub blocked: u64,
    /// Sends that failed (full queue under `error`, wait timeout, disconnect)
    pub errors: u64,
    /// Sends that found the queue full
    pub overflow_events: u64,
    /// Largest queue length observed after any admission
    pub max_queue_len: u64,
}

impl SessionStats {
    /// Messages that made it into the queue
    pub fn accepted(&self) -> u64 {
        self.enqueued
    }

    /// Messages lost to either drop policy
    pub fn dropped(&self) -> u64 {
        self.dropped_oldest + self.dropped_newest
    }
}
