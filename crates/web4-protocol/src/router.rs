//! Protocol router
//!
//! Inspects an inbound envelope's kind and dispatches it to the owning
//! runtime. A dispatch miss is a result, not an error: unrecognized kinds
//! come back with `handled = false` and the caller decides whether that is
//! fatal.

use crate::consent::ConsentRuntime;
use crate::deferred::DeferredRuntime;
use crate::envelope::{Envelope, EnvelopeBody};
use crate::handshake::HandshakeRuntime;
use crate::trust::{TrustFsm, TrustLink};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runtime-specific outcome of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterOutcome {
    /// Handshake-family envelope; the trust transition it caused, if any
    Trust(Option<TrustLink>),
    /// Consent-gated envelope; whether interaction is allowed
    Consent {
        /// Verdict of the consent runtime
        allowed: bool,
    },
    /// Source update; whether it was queued pending trust
    Deferred {
        /// True when the update went to the deferred queue
        deferred: bool,
    },
    /// No runtime owns this kind
    Unhandled,
}

/// Uniform result of routing one envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    /// Whether any runtime owned the envelope
    pub handled: bool,
    /// What the owning runtime did with it
    pub outcome: RouterOutcome,
}

/// Dispatches envelopes to the three protocol runtimes.
pub struct ProtocolRouter {
    handshake: HandshakeRuntime,
    consent: ConsentRuntime,
    deferred: DeferredRuntime,
    trust: Arc<TrustFsm>,
}

impl ProtocolRouter {
    /// Assemble a router; the handshake runtime's FSM is the shared one
    pub fn new(
        handshake: HandshakeRuntime,
        consent: ConsentRuntime,
        deferred: DeferredRuntime,
    ) -> Self {
        let trust = handshake.trust().clone();
        Self {
            handshake,
            consent,
            deferred,
            trust,
        }
    }

    /// The trust state machine shared by all runtimes
    pub fn trust(&self) -> &Arc<TrustFsm> {
        &self.trust
    }

    /// The deferred-acceptance runtime, for releasing queued updates
    pub fn deferred(&self) -> &DeferredRuntime {
        &self.deferred
    }

    /// Route one envelope to the runtime that owns its kind.
    pub fn dispatch(&self, envelope: &Envelope) -> DispatchResult {
        let result = match &envelope.body {
            EnvelopeBody::Hello { .. }
            | EnvelopeBody::FactConfirm { .. }
            | EnvelopeBody::FactChallenge { .. } => DispatchResult {
                handled: true,
                outcome: RouterOutcome::Trust(self.handshake.handle_envelope(envelope)),
            },
            EnvelopeBody::HumanState { human, .. } => DispatchResult {
                handled: true,
                outcome: RouterOutcome::Consent {
                    allowed: self.consent.allow_interaction(human),
                },
            },
            EnvelopeBody::SourceUpdate { .. } => {
                let level = self.trust.get(&envelope.sender.id);
                DispatchResult {
                    handled: true,
                    outcome: RouterOutcome::Deferred {
                        deferred: self.deferred.defer_if_untrusted(envelope, level),
                    },
                }
            }
            EnvelopeBody::Unknown => {
                warn!(
                    peer_id = %envelope.sender.id,
                    "dispatch miss, no runtime owns this kind"
                );
                DispatchResult {
                    handled: false,
                    outcome: RouterOutcome::Unhandled,
                }
            }
        };
        debug!(
            kind = envelope.kind(),
            peer_id = %envelope.sender.id,
            handled = result.handled,
            "envelope dispatched"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::ConsentPolicy;
    use crate::envelope::{Consent, HumanStateFields, SourceDescriptor};
    use crate::trust::TrustLevel;
    use chrono::Utc;
    use serde_json::{json, Map};
    use web4_core::Identity;

    fn router() -> ProtocolRouter {
        let local = Identity::new("local", "fp-local");
        let trust = Arc::new(TrustFsm::new());
        ProtocolRouter::new(
            HandshakeRuntime::new(local.clone(), trust),
            ConsentRuntime::new(local.clone(), ConsentPolicy::default()),
            DeferredRuntime::new(local),
        )
    }

    fn from_peer(body: EnvelopeBody) -> Envelope {
        Envelope::new(
            Identity::new("peer", "fp-peer"),
            Identity::new("local", "fp-local"),
            body,
        )
    }

    #[test]
    fn handshake_envelope_produces_a_trust_transition() {
        let router = router();
        let result = router.dispatch(&from_peer(EnvelopeBody::Hello {
            handshake: "hello".to_string(),
            state: None,
            extra: Map::new(),
        }));
        assert!(result.handled);
        match result.outcome {
            RouterOutcome::Trust(Some(link)) => assert_eq!(link.level, TrustLevel::Probing),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn consent_envelope_reports_the_verdict() {
        let router = router();
        let result = router.dispatch(&from_peer(EnvelopeBody::HumanState {
            human: HumanStateFields {
                presence: "present".to_string(),
                mood: "strained".to_string(),
                pressure: 9,
                max_pressure_context: None,
                consent: Consent::Granted,
            },
            extra: Map::new(),
        }));
        assert_eq!(
            result,
            DispatchResult {
                handled: true,
                outcome: RouterOutcome::Consent { allowed: false },
            }
        );
    }

    #[test]
    fn source_update_from_untrusted_peer_is_deferred() {
        let router = router();
        let mut data = Map::new();
        data.insert("value".to_string(), json!(1));
        let envelope = from_peer(EnvelopeBody::SourceUpdate {
            data,
            source: SourceDescriptor {
                origin: "https://example.test".to_string(),
                tier: "community".to_string(),
                fetched_at: Utc::now(),
            },
            extra: Map::new(),
        });

        let result = router.dispatch(&envelope);
        assert_eq!(result.outcome, RouterOutcome::Deferred { deferred: true });
        assert_eq!(router.deferred().deferred_len(), 1);

        // establish trust, replay the queue, and the next update passes
        router.trust().on_verified("peer");
        let released = router.deferred().release_deferred(router.trust().get("peer"));
        assert_eq!(released.len(), 1);

        let result = router.dispatch(&envelope);
        assert_eq!(result.outcome, RouterOutcome::Deferred { deferred: false });
    }

    #[test]
    fn unknown_kind_is_a_miss_not_an_error() {
        let router = router();
        let result = router.dispatch(&from_peer(EnvelopeBody::Unknown));
        assert!(!result.handled);
        assert_eq!(result.outcome, RouterOutcome::Unhandled);
    }
}
