//! Deferred-acceptance runtime
//!
//! Source updates from peers that are not yet trusted are queued rather
//! than acted on. Once trust is established the queue is released in the
//! original insertion order, exactly once.

use crate::envelope::{Envelope, EnvelopeBody, SourceDescriptor};
use crate::trust::TrustLevel;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use tracing::debug;
use web4_core::Identity;

/// Runtime for provenance-tagged source updates.
pub struct DeferredRuntime {
    identity: Identity,
    deferred: Mutex<VecDeque<Envelope>>,
}

impl DeferredRuntime {
    /// Create a runtime with an empty deferred queue
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            deferred: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of updates waiting on trust
    pub fn deferred_len(&self) -> usize {
        self.deferred.lock().len()
    }

    /// Build a source-update envelope
    pub fn build_source_update(
        &self,
        receiver: &Identity,
        data: Map<String, Value>,
        source: SourceDescriptor,
    ) -> Envelope {
        Envelope::new(
            self.identity.clone(),
            receiver.clone(),
            EnvelopeBody::SourceUpdate {
                data,
                source,
                extra: Map::new(),
            },
        )
    }

    /// Queue the envelope unless the sender is trusted.
    ///
    /// Returns true when the envelope was deferred; false means the caller
    /// should process it now.
    pub fn defer_if_untrusted(&self, envelope: &Envelope, trust_level: TrustLevel) -> bool {
        if trust_level == TrustLevel::Trusted {
            return false;
        }
        debug!(
            peer_id = %envelope.sender.id,
            level = %trust_level,
            "source update deferred pending trust"
        );
        self.deferred.lock().push_back(envelope.clone());
        true
    }

    /// Drain the deferred queue in insertion order.
    ///
    /// Only a trusted caller gets the queue; anything else gets an empty
    /// sequence and the queue is left untouched.
    pub fn release_deferred(&self, trust_level: TrustLevel) -> Vec<Envelope> {
        if trust_level != TrustLevel::Trusted {
            return Vec::new();
        }
        self.deferred.lock().drain(..).collect()
    }
}
