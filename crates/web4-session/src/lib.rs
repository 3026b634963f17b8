//! # Web4 Session - bounded QoS message queue
//!
//! A session is a single bounded, typed message queue with a configurable
//! backpressure policy, transfer statistics, connectivity state, heartbeat
//! tracking, and lifecycle hooks. It is the leaf of the runtime stack:
//! transports wrap sessions, and everything above routes through transports.
//!
//! ## Concurrency model
//!
//! One mutex guards the queue, the statistics block, and the connectivity
//! flag; one condition variable associated with that mutex serves the
//! `block` backpressure policy. Blocking senders re-check their predicate
//! on every wakeup, so spurious wakeups and broadcast notifications are
//! harmless. Lifecycle hooks run synchronously on the thread that triggered
//! the transition, after the internal lock has been released, with a
//! per-event-type reentrancy guard.

pub mod config;
pub mod error;
pub mod hooks;
pub mod session;
pub mod stats;

pub use config::{BackpressurePolicy, SessionConfig};
pub use error::{BackpressureKind, SessionError};
pub use hooks::{HookId, SessionEvent};
pub use session::Session;
pub use stats::SessionStats;
