//! Transport-agnostic session facade
//!
//! Callers hold a [`Web4Session`] and never depend on which transport
//! implementation is underneath. Every observability payload is stamped
//! with the wrapped transport's type label and session id.

use crate::backend::TransportBackend;
use crate::TransportResult;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use web4_core::ObservabilityHub;
use web4_session::SessionStats;

/// Uniform session interface over any [`TransportBackend`].
pub struct Web4Session<M> {
    transport: Box<dyn TransportBackend<Message = M>>,
    observability: Option<Arc<ObservabilityHub>>,
}

impl<M> Web4Session<M> {
    /// Wrap a transport without observability
    pub fn new(transport: Box<dyn TransportBackend<Message = M>>) -> Self {
        Self {
            transport,
            observability: None,
        }
    }

    /// Wrap a transport and report lifecycle/transfer events to a hub
    pub fn with_observability(
        transport: Box<dyn TransportBackend<Message = M>>,
        hub: Arc<ObservabilityHub>,
    ) -> Self {
        Self {
            transport,
            observability: Some(hub),
        }
    }

    /// Type label of the wrapped transport
    pub fn transport_type(&self) -> &'static str {
        self.transport.transport_type()
    }

    /// Bring the transport up and record the transition
    pub fn connect(&self) {
        self.transport.connect();
        self.record("transport_connect", Map::new());
    }

    /// Tear the transport down and record the transition
    pub fn disconnect(&self) {
        self.transport.disconnect();
        self.record("transport_disconnect", Map::new());
    }

    /// Send one message; records a `transport_send` event on success
    pub fn send(&self, message: M) -> TransportResult<()> {
        self.transport.send(message)?;
        let mut extra = Map::new();
        extra.insert("pending".to_string(), json!(self.transport.pending()));
        self.record("transport_send", extra);
        Ok(())
    }

    /// Receive the oldest message if any; records only when one surfaced
    pub fn receive(&self) -> TransportResult<Option<M>> {
        let item = self.transport.receive()?;
        if item.is_some() {
            let mut extra = Map::new();
            extra.insert("pending".to_string(), json!(self.transport.pending()));
            self.record("transport_receive", extra);
        }
        Ok(item)
    }

    /// Current queue length
    pub fn pending(&self) -> usize {
        self.transport.pending()
    }

    /// Transfer statistics of the wrapped session
    pub fn stats(&self) -> SessionStats {
        self.transport.stats()
    }

    /// Record proof of life from the peer
    pub fn heartbeat(&self) {
        self.transport.heartbeat();
    }

    /// Delegate the liveness check; records on an actual timeout
    pub fn check_heartbeat_timeout(&self) -> bool {
        let timed_out = self.transport.check_heartbeat_timeout();
        if timed_out {
            self.record("transport_heartbeat_timeout", Map::new());
        }
        timed_out
    }

    fn record(&self, event_type: &str, mut payload: Map<String, Value>) {
        let Some(hub) = &self.observability else {
            return;
        };
        payload.insert(
            "transport_type".to_string(),
            json!(self.transport.transport_type()),
        );
        payload.insert("session_id".to_string(), json!(self.transport.session_id()));
        hub.record(event_type, payload);
    }
}
