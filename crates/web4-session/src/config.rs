//! Session configuration
//!
//! Every key is optional with a conservative default, so a session can be
//! built from an empty config table.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rule applied when a bounded queue is full at send time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackpressurePolicy {
    /// Wait for room, up to `block_timeout_s`, re-checking on every wakeup
    Block,
    /// Fail the send immediately
    Error,
    /// Evict the head of the queue and admit the new message
    DropOldest,
    /// Silently reject the new message
    DropNewest,
}

/// Configuration for a single session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Identity of the session, stamped on hook calls and observability events
    pub session_id: u64,
    /// Queue capacity; the queue never holds more than this at rest
    pub max_queue: usize,
    /// Admission rule when the queue is full
    pub backpressure_policy: BackpressurePolicy,
    /// Upper bound on a `block`-policy wait, in seconds
    pub block_timeout_s: f64,
    /// Maximum silence before the session is presumed dead, in seconds
    pub heartbeat_timeout_s: f64,
    /// Suggested pause before re-dialing a dead connection, in seconds
    pub reconnect_backoff_s: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: 0,
            max_queue: 16,
            backpressure_policy: BackpressurePolicy::Error,
            block_timeout_s: 0.1,
            heartbeat_timeout_s: 30.0,
            reconnect_backoff_s: 0.1,
        }
    }
}

impl SessionConfig {
    /// Block-policy wait budget as a `Duration` (negative values clamp to zero)
    pub fn block_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.block_timeout_s.max(0.0))
    }

    /// Heartbeat silence budget as a `Duration` (negative values clamp to zero)
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.heartbeat_timeout_s.max(0.0))
    }

    /// Effective capacity; a zero `max_queue` is treated as one slot
    pub fn capacity(&self) -> usize {
        self.max_queue.max(1)
    }
}
