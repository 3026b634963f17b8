//! Agent loop adapter
//!
//! Bridges router dispatch results into an external reasoning loop. The
//! adapter owns no reasoning logic: the collaborator supplies the loop and
//! the output queue, the adapter serializes handled envelopes into text
//! prompts and forwards whatever the loop answers.

use crate::envelope::Envelope;
use crate::router::ProtocolRouter;
use crate::trust::TrustLevel;
use serde_json::{json, Map};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tracing::{debug, warn};
use web4_core::ObservabilityHub;

/// External reasoning loop supplied by the collaborator.
///
/// Accepts a text prompt and may answer with text; returning `None` means
/// the loop chose not to respond.
pub trait ReasoningLoop: Send + Sync {
    /// Produce a response for one prompt
    fn respond(&self, prompt: &str) -> Option<String>;
}

impl<F> ReasoningLoop for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn respond(&self, prompt: &str) -> Option<String> {
        self(prompt)
    }
}

/// Result of bridging one envelope into the reasoning loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterOutcome {
    /// Whether the router found an owning runtime
    pub handled: bool,
    /// Sender's trust level after dispatch
    pub trust: TrustLevel,
    /// What the reasoning loop answered, if anything
    pub response: Option<String>,
}

/// Bridges router output to an external reasoning loop.
pub struct AgentLoopAdapter {
    router: ProtocolRouter,
    reasoning: Arc<dyn ReasoningLoop>,
    output: Sender<String>,
    observability: Option<Arc<ObservabilityHub>>,
}

impl AgentLoopAdapter {
    /// Wire a router to a collaborator-supplied loop and output queue
    pub fn new(
        router: ProtocolRouter,
        reasoning: Arc<dyn ReasoningLoop>,
        output: Sender<String>,
    ) -> Self {
        Self {
            router,
            reasoning,
            output,
            observability: None,
        }
    }

    /// Also report `envelope_routed` events to a hub
    pub fn with_observability(mut self, hub: Arc<ObservabilityHub>) -> Self {
        self.observability = Some(hub);
        self
    }

    /// The router this adapter feeds
    pub fn router(&self) -> &ProtocolRouter {
        &self.router
    }

    /// Dispatch an envelope and, when handled, run its payload through the
    /// reasoning loop, pushing any response onto the output queue.
    pub fn handle_envelope(&self, envelope: &Envelope) -> AdapterOutcome {
        let dispatch = self.router.dispatch(envelope);
        let trust = self.router.trust().get(&envelope.sender.id);

        if let Some(hub) = &self.observability {
            let mut payload = Map::new();
            payload.insert("handled".to_string(), json!(dispatch.handled));
            payload.insert("kind".to_string(), json!(envelope.kind()));
            payload.insert("peer_id".to_string(), json!(envelope.sender.id));
            payload.insert("trust_state".to_string(), json!(trust.to_string()));
            hub.record("envelope_routed", payload);
        }

        let mut response = None;
        if dispatch.handled {
            match serde_json::to_string(&envelope.body) {
                Ok(prompt) => {
                    response = self.reasoning.respond(&prompt);
                    if let Some(text) = &response {
                        // A gone collaborator is not the adapter's failure to report.
                        if self.output.send(text.clone()).is_err() {
                            debug!(peer_id = %envelope.sender.id, "output queue closed, response dropped");
                        }
                    }
                }
                Err(err) => {
                    // An unencodable body never reaches the loop as an empty prompt.
                    warn!(peer_id = %envelope.sender.id, kind = envelope.kind(), %err, "envelope body not encodable, reasoning loop skipped");
                }
            }
        }

        AdapterOutcome {
            handled: dispatch.handled,
            trust,
            response,
        }
    }
}
