//! Append-only observability event log
//!
//! Sessions and transports record structured lifecycle and transfer events
//! here. The log is append-only: events are never mutated after recording,
//! and `snapshot` hands out clones so callers cannot reach back into hub
//! state.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single recorded lifecycle or transfer event.
///
/// The payload must carry a `session_id` field (and a `transport_type`
/// field when the event was emitted through a transport) so operators can
/// attribute events without out-of-band context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityEvent {
    /// Event type tag, e.g. `transport_send`
    pub event_type: String,
    /// Structured event payload, including identifying fields
    pub payload: Map<String, Value>,
    /// UTC timestamp taken at emission
    pub occurred_at: DateTime<Utc>,
}

/// Shared recorder of runtime events.
///
/// A single lock guards the event vec, which keeps concurrent recorders
/// safe and preserves emission order.
#[derive(Debug, Default)]
pub struct ObservabilityHub {
    events: Mutex<Vec<ObservabilityEvent>>,
}

impl ObservabilityHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a timestamped event and return a copy of what was recorded
    pub fn record(
        &self,
        event_type: impl Into<String>,
        payload: Map<String, Value>,
    ) -> ObservabilityEvent {
        let event = ObservabilityEvent {
            event_type: event_type.into(),
            payload,
            occurred_at: Utc::now(),
        };
        self.events.lock().push(event.clone());
        event
    }

    /// All recorded events in emission order
    pub fn snapshot(&self) -> Vec<ObservabilityEvent> {
        self.events.lock().clone()
    }

    /// Number of events recorded so far
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True when nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}
