//! Session capability
//!
//! The authentication layer never stores session data itself. It reads and
//! writes through a `Session` handle opened from a `SessionBackend`, which is
//! selected by `session_type`.

pub mod memory;
pub mod registry;

pub use memory::{MemoryBackend, MemorySession};
pub use registry::SessionRegistry;

use serde_json::Value;

use crate::error::AuthError;

/// Request scoped key/value session.
pub trait Session: Send {
    /// Current session identifier
    fn id(&self) -> &str;

    fn get(&self, key: &str) -> Option<Value>;

    /// Read `key`, falling back to `default` when absent
    fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), AuthError>;

    fn delete(&mut self, key: &str) -> Result<(), AuthError>;

    /// Rotate the session identifier, keeping the data. Returns the new id.
    fn regenerate(&mut self) -> Result<String, AuthError>;

    /// Invalidate all session data.
    fn destroy(&mut self) -> Result<(), AuthError>;
}

/// Source of session handles for one `session_type`.
pub trait SessionBackend: Send + Sync {
    /// Open a fresh, empty session
    fn open(&self) -> Result<Box<dyn Session>, AuthError>;

    /// Reattach to an existing session, `Ok(None)` if the id is unknown
    fn resume(&self, id: &str) -> Result<Option<Box<dyn Session>>, AuthError>;
}
