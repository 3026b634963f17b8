//! Session error types
//!
//! Queue admission failures and disconnection are raised to the immediate
//! caller; they are never swallowed inside the core. A blocked sender that
//! times out must be distinguishable from one that hit a full queue under
//! the `error` policy, so operators can tell congestion from
//! misconfiguration.

use thiserror::Error;

/// Why a send was refused by backpressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackpressureKind {
    /// The queue was full under the `error` policy
    QueueFull,
    /// A `block`-policy wait exceeded its timeout
    Timeout,
}

impl std::fmt::Display for BackpressureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackpressureKind::QueueFull => write!(f, "queue is full"),
            BackpressureKind::Timeout => write!(f, "block timeout"),
        }
    }
}

/// Error types for session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The queue could not admit the message under the configured policy.
    #[error("backpressure: {kind}")]
    Backpressure {
        /// Whether the refusal came from a full queue or a wait timeout
        kind: BackpressureKind,
    },

    /// The session is disconnected; no policy can admit the message.
    #[error("session is disconnected")]
    Disconnected,
}

impl SessionError {
    /// Shorthand for the full-queue refusal under the `error` policy
    pub fn queue_full() -> Self {
        SessionError::Backpressure {
            kind: BackpressureKind::QueueFull,
        }
    }

    /// Shorthand for a `block`-policy wait that hit its deadline
    pub fn block_timeout() -> Self {
        SessionError::Backpressure {
            kind: BackpressureKind::Timeout,
        }
    }

    /// True when this is the timeout-flavored backpressure failure
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            SessionError::Backpressure {
                kind: BackpressureKind::Timeout
            }
        )
    }
}
