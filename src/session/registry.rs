//! Session backend registry
//!
//! Maps `session_type` identifiers to session backends.

use std::collections::HashMap;
use std::sync::Arc;

use super::{MemoryBackend, SessionBackend};
use crate::error::AuthError;

/// Registry of available session backends
#[derive(Default)]
pub struct SessionRegistry {
    backends: HashMap<String, Arc<dyn SessionBackend>>,
}

impl SessionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the in-memory backend under `native` and `memory`
    pub fn with_defaults() -> Self {
        let memory: Arc<dyn SessionBackend> = Arc::new(MemoryBackend::new());
        let mut registry = Self::new();
        registry.register("native", Arc::clone(&memory));
        registry.register("memory", memory);
        registry
    }

    pub fn register(&mut self, session_type: &str, backend: Arc<dyn SessionBackend>) {
        self.backends.insert(session_type.to_string(), backend);
    }

    /// Resolve the backend for `session_type`
    pub fn resolve(&self, session_type: &str) -> Result<Arc<dyn SessionBackend>, AuthError> {
        self.backends
            .get(session_type)
            .cloned()
            .ok_or_else(|| AuthError::Session(format!("Unknown session type: {}", session_type)))
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
