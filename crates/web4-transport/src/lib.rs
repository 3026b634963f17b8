//! # Web4 Transport - pluggable transport layer
//!
//! Wraps a session behind a uniform send/receive/pending/heartbeat-check
//! interface tagged with a transport-type label. Transports are created
//! through a named factory registry, and the [`Web4Session`] facade keeps
//! callers independent of which implementation is underneath while stamping
//! every observability payload with the wrapped transport's type.

pub mod backend;
pub mod error;
pub mod facade;
pub mod registry;
pub mod rtt;

pub use backend::TransportBackend;
pub use error::TransportError;
pub use facade::Web4Session;
pub use registry::TransportRegistry;
pub use rtt::RttTransport;

/// Result alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
