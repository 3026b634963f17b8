//! # Web4 Core - shared runtime types
//!
//! Leaf crate of the workspace. Holds the types every other layer agrees
//! on: peer identity and the append-only observability hub that sessions
//! and transports report into.

pub mod identity;
pub mod observability;

pub use identity::Identity;
pub use observability::{ObservabilityEvent, ObservabilityHub};
