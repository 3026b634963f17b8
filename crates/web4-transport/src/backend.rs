//! Core transport trait definition

use crate::TransportResult;
use web4_session::SessionStats;

/// Uniform interface every transport implementation exposes.
///
/// A transport is a (type label, owned session) pair: it forwards all
/// session operations and identifies itself so observability payloads can
/// carry the label.
pub trait TransportBackend: Send + Sync {
    /// Payload type moved through this transport
    type Message;

    /// Transport type identifier, e.g. `"rtt"`
    fn transport_type(&self) -> &'static str;

    /// Identity of the wrapped session
    fn session_id(&self) -> u64;

    /// Bring the underlying session up
    fn connect(&self);

    /// Tear the underlying session down
    fn disconnect(&self);

    /// Send one message under the session's admission policy
    fn send(&self, message: Self::Message) -> TransportResult<()>;

    /// Pop the oldest queued message, never blocking
    fn receive(&self) -> TransportResult<Option<Self::Message>>;

    /// Current queue length
    fn pending(&self) -> usize;

    /// Snapshot of the session's transfer statistics
    fn stats(&self) -> SessionStats;

    /// Record proof of life from the peer
    fn heartbeat(&self);

    /// Check liveness; true when the session just timed out and disconnected
    fn check_heartbeat_timeout(&self) -> bool;
}

impl<M> core::fmt::Debug for dyn TransportBackend<Message = M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransportBackend")
            .field("transport_type", &self.transport_type())
            .field("session_id", &self.session_id())
            .finish()
    }
}
