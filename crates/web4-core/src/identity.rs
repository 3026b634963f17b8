//! Peer identity carried in every protocol envelope

use serde::{Deserialize, Serialize};

/// Identity of a peer participating in the runtime.
///
/// The `id` is the routing key; the `fingerprint` is an opaque commitment
/// to the peer's key material, carried verbatim on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Stable peer identifier used as the trust-map key
    pub id: String,
    /// Opaque key fingerprint presented during handshake
    pub fingerprint: String,
}

impl Identity {
    /// Create an identity from its two wire fields
    pub fn new(id: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
