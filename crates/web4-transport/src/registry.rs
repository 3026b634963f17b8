//! Named factory directory for transport implementations
//!
//! Factories are zero-argument constructors stored under a type name.
//! Asking for an unregistered name is an [`TransportError::UnknownTransport`]
//! error; callers that can fall back branch on it, everyone else propagates.

use crate::backend::TransportBackend;
use crate::error::TransportError;
use crate::TransportResult;
use std::collections::HashMap;
use tracing::debug;

type Factory<M> = Box<dyn Fn() -> Box<dyn TransportBackend<Message = M>> + Send + Sync>;

/// Directory of named transport constructors.
pub struct TransportRegistry<M> {
    factories: HashMap<String, Factory<M>>,
}

impl<M> Default for TransportRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> TransportRegistry<M> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Store a factory under a type name, replacing any previous one
    pub fn register<F>(&mut self, transport_type: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn TransportBackend<Message = M>> + Send + Sync + 'static,
    {
        let transport_type = transport_type.into();
        debug!(transport_type, "transport registered");
        self.factories.insert(transport_type, Box::new(factory));
    }

    /// Instantiate a transport by type name
    pub fn create(
        &self,
        transport_type: &str,
    ) -> TransportResult<Box<dyn TransportBackend<Message = M>>> {
        match self.factories.get(transport_type) {
            Some(factory) => Ok(factory()),
            None => Err(TransportError::UnknownTransport(transport_type.to_string())),
        }
    }

    /// Registered type names, sorted (insertion order is irrelevant)
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}
