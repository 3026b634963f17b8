//! Real-time transfer transport backed by an in-process session

use crate::backend::TransportBackend;
use crate::TransportResult;
use web4_session::{Session, SessionConfig, SessionStats};

/// In-process transport wrapping one [`Session`].
///
/// The default transport for local components; remote implementations
/// register alongside it in the [`crate::TransportRegistry`].
pub struct RttTransport<M> {
    session: Session<M>,
}

impl<M> RttTransport<M> {
    /// Wrap an existing session
    pub fn new(session: Session<M>) -> Self {
        Self { session }
    }

    /// Build the session from a config and wrap it
    pub fn from_config(config: SessionConfig) -> Self {
        Self::new(Session::new(config))
    }

    /// Direct access to the wrapped session, for hook registration
    pub fn session(&self) -> &Session<M> {
        &self.session
    }
}

impl<M: Send> TransportBackend for RttTransport<M> {
    type Message = M;

    fn transport_type(&self) -> &'static str {
        "rtt"
    }

    fn session_id(&self) -> u64 {
        self.session.session_id()
    }

    fn connect(&self) {
        self.session.reconnect();
    }

    fn disconnect(&self) {
        self.session.disconnect("transport disconnect");
    }

    fn send(&self, message: M) -> TransportResult<()> {
        self.session.send(message)?;
        Ok(())
    }

    fn receive(&self) -> TransportResult<Option<M>> {
        Ok(self.session.receive()?)
    }

    fn pending(&self) -> usize {
        self.session.pending()
    }

    fn stats(&self) -> SessionStats {
        self.session.stats()
    }

    fn heartbeat(&self) {
        self.session.heartbeat();
    }

    fn check_heartbeat_timeout(&self) -> bool {
        self.session.check_heartbeat_timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_session_operations() {
        let transport = RttTransport::from_config(SessionConfig {
            session_id: 3,
            max_queue: 2,
            ..Default::default()
        });
        assert_eq!(transport.transport_type(), "rtt");
        assert_eq!(transport.session_id(), 3);

        transport.send("a").unwrap();
        transport.send("b").unwrap();
        assert_eq!(transport.pending(), 2);
        assert_eq!(transport.receive().unwrap(), Some("a"));
        assert_eq!(transport.stats().enqueued, 2);
    }

    #[test]
    fn disconnect_and_connect_map_to_session_lifecycle() {
        let transport: RttTransport<u8> = RttTransport::from_config(SessionConfig::default());
        transport.disconnect();
        assert!(transport.send(1).is_err());
        transport.connect();
        transport.send(1).unwrap();
    }
}
