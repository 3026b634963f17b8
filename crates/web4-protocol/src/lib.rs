//! # Web4 Protocol - trust negotiation and envelope routing
//!
//! Three protocol runtimes of equal rank share one per-peer trust state
//! machine: a handshake runtime that builds and consumes identity-exchange
//! envelopes, a consent runtime that gates human-directed interactions, and
//! a deferred-acceptance runtime that queues untrusted updates until trust
//! is established. The router inspects an inbound envelope's kind and
//! dispatches it to the owning runtime; the agent adapter bridges dispatch
//! results into an external reasoning loop.

pub mod agent;
pub mod consent;
pub mod deferred;
pub mod envelope;
pub mod error;
pub mod handshake;
pub mod router;
pub mod trust;

pub use agent::{AdapterOutcome, AgentLoopAdapter, ReasoningLoop};
pub use consent::{ConsentPolicy, ConsentRuntime};
pub use deferred::DeferredRuntime;
pub use envelope::{Consent, Envelope, EnvelopeBody, HumanStateFields, SourceDescriptor};
pub use error::ProtocolError;
pub use handshake::HandshakeRuntime;
pub use router::{DispatchResult, ProtocolRouter, RouterOutcome};
pub use trust::{TrustFsm, TrustLevel, TrustLink};
