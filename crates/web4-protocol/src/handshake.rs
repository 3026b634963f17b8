//! Handshake runtime
//!
//! Builds and consumes identity-exchange envelopes and drives the shared
//! trust state machine: greetings start probing, fact confirmations
//! promote to trusted, fact challenges demote or block.

use crate::envelope::{Envelope, EnvelopeBody};
use crate::trust::{TrustFsm, TrustLink};
use serde_json::{Map, Value};
use std::sync::Arc;
use web4_core::Identity;

/// Runtime for identity-exchange envelopes.
pub struct HandshakeRuntime {
    identity: Identity,
    trust: Arc<TrustFsm>,
}

impl HandshakeRuntime {
    /// Create a runtime for the local identity, sharing the trust FSM
    pub fn new(identity: Identity, trust: Arc<TrustFsm>) -> Self {
        Self { identity, trust }
    }

    /// The local identity stamped as sender on built envelopes
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The shared trust state machine
    pub fn trust(&self) -> &Arc<TrustFsm> {
        &self.trust
    }

    /// Build a `hello` greeting, optionally advertising local state
    pub fn build_hello(&self, receiver: &Identity, state: Option<Map<String, Value>>) -> Envelope {
        Envelope::new(
            self.identity.clone(),
            receiver.clone(),
            EnvelopeBody::Hello {
                handshake: "hello".to_string(),
                state,
                extra: Map::new(),
            },
        )
    }

    /// Build the `ack` reply to a greeting
    pub fn build_ack(&self, receiver: &Identity, state: Option<Map<String, Value>>) -> Envelope {
        Envelope::new(
            self.identity.clone(),
            receiver.clone(),
            EnvelopeBody::Hello {
                handshake: "ack".to_string(),
                state,
                extra: Map::new(),
            },
        )
    }

    /// Feed an inbound envelope through the trust FSM.
    ///
    /// Returns the resulting transition, or `None` for kinds this runtime
    /// does not own.
    pub fn handle_envelope(&self, envelope: &Envelope) -> Option<TrustLink> {
        let peer = envelope.sender.id.as_str();
        match &envelope.body {
            EnvelopeBody::Hello { .. } => Some(self.trust.on_handshake(peer)),
            EnvelopeBody::FactConfirm { .. } => Some(self.trust.on_verified(peer)),
            EnvelopeBody::FactChallenge { .. } => Some(self.trust.on_conflict(peer)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trust::TrustLevel;
    use serde_json::json;

    fn runtime() -> HandshakeRuntime {
        HandshakeRuntime::new(Identity::new("local", "fp-local"), Arc::new(TrustFsm::new()))
    }

    fn from_peer(body: EnvelopeBody) -> Envelope {
        Envelope::new(
            Identity::new("peer", "fp-peer"),
            Identity::new("local", "fp-local"),
            body,
        )
    }

    #[test]
    fn hello_starts_probing() {
        let runtime = runtime();
        let envelope = from_peer(EnvelopeBody::Hello {
            handshake: "hello".to_string(),
            state: None,
            extra: Map::new(),
        });
        let link = runtime.handle_envelope(&envelope).unwrap();
        assert_eq!(link.level, TrustLevel::Probing);
        assert_eq!(runtime.trust().get("peer"), TrustLevel::Probing);
    }

    #[test]
    fn fact_confirm_promotes_to_trusted() {
        let runtime = runtime();
        runtime.trust().on_handshake("peer");
        let envelope = from_peer(EnvelopeBody::FactConfirm {
            fact: json!({"sky": "blue"}),
            extra: Map::new(),
        });
        let link = runtime.handle_envelope(&envelope).unwrap();
        assert_eq!(link.level, TrustLevel::Trusted);
    }

    #[test]
    fn fact_challenge_feeds_conflict() {
        let runtime = runtime();
        runtime.trust().on_verified("peer");
        let envelope = from_peer(EnvelopeBody::FactChallenge {
            claim: json!({"sky": "green"}),
            extra: Map::new(),
        });
        let link = runtime.handle_envelope(&envelope).unwrap();
        assert_eq!(link.level, TrustLevel::Probing);
    }

    #[test]
    fn unowned_kinds_return_none() {
        let runtime = runtime();
        let envelope = from_peer(EnvelopeBody::Unknown);
        assert!(runtime.handle_envelope(&envelope).is_none());
    }

    #[test]
    fn build_hello_stamps_local_identity() {
        let runtime = runtime();
        let receiver = Identity::new("peer", "fp-peer");
        let envelope = runtime.build_hello(&receiver, None);
        assert_eq!(envelope.sender.id, "local");
        assert_eq!(envelope.receiver.id, "peer");
        assert_eq!(envelope.kind(), "hello");

        let ack = runtime.build_ack(&receiver, None);
        match ack.body {
            EnvelopeBody::Hello { handshake, .. } => assert_eq!(handshake, "ack"),
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
