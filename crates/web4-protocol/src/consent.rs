//! Consent runtime
//!
//! Gates human-directed interactions on pressure and consent fields.
//! Refusal is a return value, never an error: callers branch on the
//! boolean. The runtime is side-effect free and never mutates envelopes.

use crate::envelope::{Consent, Envelope, EnvelopeBody, HumanStateFields};
use serde_json::Map;
use web4_core::Identity;

/// Ceiling on interaction pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentPolicy {
    /// Interactions are refused once pressure reaches this level
    pub max_pressure: u8,
}

impl Default for ConsentPolicy {
    fn default() -> Self {
        Self { max_pressure: 7 }
    }
}

/// Runtime for consent-gated envelopes.
pub struct ConsentRuntime {
    identity: Identity,
    policy: ConsentPolicy,
}

impl ConsentRuntime {
    /// Create a runtime with the given pressure policy
    pub fn new(identity: Identity, policy: ConsentPolicy) -> Self {
        Self { identity, policy }
    }

    /// The pressure policy in force
    pub fn policy(&self) -> ConsentPolicy {
        self.policy
    }

    /// Build a human-state update envelope
    pub fn build_state_update(&self, receiver: &Identity, human: HumanStateFields) -> Envelope {
        Envelope::new(
            self.identity.clone(),
            receiver.clone(),
            EnvelopeBody::HumanState {
                human,
                extra: Map::new(),
            },
        )
    }

    /// Whether interaction is currently allowed.
    ///
    /// False when `pressure >= max_pressure` regardless of consent, false
    /// when consent is anything but granted regardless of pressure.
    pub fn allow_interaction(&self, human: &HumanStateFields) -> bool {
        human.pressure < self.policy.max_pressure && human.consent == Consent::Granted
    }

    /// Evaluate an inbound envelope; `None` for kinds this runtime does
    /// not own
    pub fn handle_envelope(&self, envelope: &Envelope) -> Option<bool> {
        match &envelope.body {
            EnvelopeBody::HumanState { human, .. } => Some(self.allow_interaction(human)),
            _ => None,
        }
    }
}
