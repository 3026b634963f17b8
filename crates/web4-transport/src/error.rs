//! Transport error types

use thiserror::Error;
use web4_session::SessionError;

/// Error types for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The registry was asked for a type name nobody registered.
    #[error("unknown transport: {0}")]
    UnknownTransport(String),

    /// The underlying session refused the operation.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl TransportError {
    /// True when the failure came from session backpressure
    pub fn is_backpressure(&self) -> bool {
        matches!(
            self,
            TransportError::Session(SessionError::Backpressure { .. })
        )
    }

    /// True when the underlying session is disconnected
    pub fn is_disconnected(&self) -> bool {
        matches!(self, TransportError::Session(SessionError::Disconnected))
    }
}
