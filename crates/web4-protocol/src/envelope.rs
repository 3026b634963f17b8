//! Protocol envelopes
//!
//! The unit of message exchange between peers and protocol runtimes:
//! sender/receiver identity, a kind tag, and a kind-specific payload
//! object keyed `payload` on the wire. Kinds are a closed, tagged enum;
//! each variant keeps a flattened extension map for protocol-specific
//! fields not yet promoted to first-class ones. Envelopes are immutable
//! once built and consumed by exactly one runtime or the router.

use crate::error::ProtocolError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use web4_core::Identity;

/// Consent value carried in human-state payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consent {
    /// The human has granted interaction
    Granted,
    /// The human has denied interaction
    Denied,
}

/// Human-state fields gating consent-checked interactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanStateFields {
    /// Presence descriptor, e.g. `"present"`
    pub presence: String,
    /// Coarse mood descriptor
    pub mood: String,
    /// Current pressure level; interactions stop at the policy maximum
    pub pressure: u8,
    /// Context for the pressure ceiling, when the sender supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pressure_context: Option<String>,
    /// Whether interaction is consented to
    pub consent: Consent,
}

/// Provenance descriptor attached to source updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Where the data came from, e.g. a URI
    pub origin: String,
    /// Trust tier claimed for the origin
    pub tier: String,
    /// When the data was fetched
    pub fetched_at: DateTime<Utc>,
}

/// Kind-specific envelope payload.
///
/// Adjacently tagged: the kind rides next to a `payload` object holding
/// the variant fields, matching the wire form peers exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum EnvelopeBody {
    /// Identity-exchange handshake (`"hello"` or `"ack"` phase)
    Hello {
        /// Handshake phase marker
        handshake: String,
        /// Optional sender state advertised with the greeting
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<Map<String, Value>>,
        /// Extension fields
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    /// Confirmation of previously exchanged knowledge
    FactConfirm {
        /// The confirmed fact
        fact: Value,
        /// Extension fields
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    /// Challenge against previously exchanged knowledge
    FactChallenge {
        /// The disputed claim
        claim: Value,
        /// Extension fields
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    /// Consent-gated human state update
    HumanState {
        /// The human's current state
        human: HumanStateFields,
        /// Extension fields
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    /// Data update carrying source provenance
    SourceUpdate {
        /// Update payload
        data: Map<String, Value>,
        /// Provenance of the data
        source: SourceDescriptor,
        /// Extension fields
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    /// Kind tag nobody in this runtime recognizes
    #[serde(other)]
    Unknown,
}

impl EnvelopeBody {
    /// Kind tag for routing and logging
    pub fn kind(&self) -> &'static str {
        match self {
            EnvelopeBody::Hello { .. } => "hello",
            EnvelopeBody::FactConfirm { .. } => "fact_confirm",
            EnvelopeBody::FactChallenge { .. } => "fact_challenge",
            EnvelopeBody::HumanState { .. } => "human_state",
            EnvelopeBody::SourceUpdate { .. } => "source_update",
            EnvelopeBody::Unknown => "unknown",
        }
    }
}

/// A single protocol message between two peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique message identifier
    pub msg_id: Uuid,
    /// UTC timestamp taken when the envelope was built
    pub timestamp: DateTime<Utc>,
    /// Originating peer
    pub sender: Identity,
    /// Destination peer
    pub receiver: Identity,
    /// Kind tag plus kind-specific payload
    #[serde(flatten)]
    pub body: EnvelopeBody,
}

impl Envelope {
    /// Build an envelope, stamping a fresh message id and timestamp
    pub fn new(sender: Identity, receiver: Identity, body: EnvelopeBody) -> Self {
        Self {
            msg_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sender,
            receiver,
            body,
        }
    }

    /// Kind tag for routing and logging
    pub fn kind(&self) -> &'static str {
        self.body.kind()
    }

    /// Encode to the JSON wire form
    pub fn to_wire(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Decode from the JSON wire form
    pub fn from_wire(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(id: &str) -> Identity {
        Identity::new(id, format!("fp-{id}"))
    }

    #[test]
    fn wire_round_trip_preserves_kind_and_fields() {
        let envelope = Envelope::new(
            identity("alice"),
            identity("bob"),
            EnvelopeBody::Hello {
                handshake: "hello".to_string(),
                state: None,
                extra: Map::new(),
            },
        );
        let wire = envelope.to_wire().unwrap();
        let decoded = Envelope::from_wire(&wire).unwrap();
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.kind(), "hello");
    }

    #[test]
    fn kind_fields_ride_under_the_payload_key() {
        let envelope = Envelope::new(
            identity("alice"),
            identity("bob"),
            EnvelopeBody::Hello {
                handshake: "hello".to_string(),
                state: None,
                extra: Map::new(),
            },
        );
        let value: Value = serde_json::from_str(&envelope.to_wire().unwrap()).unwrap();
        assert_eq!(value["kind"], json!("hello"));
        assert_eq!(value["payload"]["handshake"], json!("hello"));
        // kind fields never leak to the envelope top level
        assert!(value.get("handshake").is_none());
    }

    #[test]
    fn payload_nested_wire_form_decodes() {
        let raw = json!({
            "msg_id": Uuid::new_v4(),
            "timestamp": Utc::now(),
            "sender": {"id": "alice", "fingerprint": "fp-a"},
            "receiver": {"id": "bob", "fingerprint": "fp-b"},
            "kind": "hello",
            "payload": {"handshake": "hello"},
        })
        .to_string();
        let decoded = Envelope::from_wire(&raw).unwrap();
        match decoded.body {
            EnvelopeBody::Hello { handshake, .. } => assert_eq!(handshake, "hello"),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn unrecognized_kind_decodes_as_unknown() {
        let raw = json!({
            "msg_id": Uuid::new_v4(),
            "timestamp": Utc::now(),
            "sender": {"id": "alice", "fingerprint": "fp-a"},
            "receiver": {"id": "bob", "fingerprint": "fp-b"},
            "kind": "telepathy",
            "payload": {"thought": 42},
        })
        .to_string();
        let decoded = Envelope::from_wire(&raw).unwrap();
        assert_eq!(decoded.body, EnvelopeBody::Unknown);
    }

    #[test]
    fn extension_fields_survive_the_wire() {
        let mut extra = Map::new();
        extra.insert("hop_count".to_string(), json!(2));
        let envelope = Envelope::new(
            identity("alice"),
            identity("bob"),
            EnvelopeBody::FactConfirm {
                fact: json!({"sky": "blue"}),
                extra,
            },
        );
        let decoded = Envelope::from_wire(&envelope.to_wire().unwrap()).unwrap();
        match decoded.body {
            EnvelopeBody::FactConfirm { extra, .. } => {
                assert_eq!(extra["hop_count"], json!(2));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn consent_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Consent::Granted).unwrap(), json!("granted"));
        assert_eq!(serde_json::to_value(Consent::Denied).unwrap(), json!("denied"));
    }
}
