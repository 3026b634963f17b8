//! Protocol error types
//!
//! Protocol-level refusals (consent denial, dispatch miss, deferred
//! queuing) are return values, not errors. Only envelope wire codec
//! failures surface here.

use thiserror::Error;

/// Error types for protocol envelope handling.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An envelope could not be decoded from its wire form.
    #[error("envelope decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// An envelope could not be encoded to its wire form.
    #[error("envelope encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}
