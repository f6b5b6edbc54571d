//! In-memory session backend
//!
//! Keeps every session's data in a shared map keyed by session id, so a
//! session opened in one request can be resumed in the next. Sessions live
//! until destroyed, rotated away or evicted; nothing expires on its own, so
//! this backend suits single-process deployments and tests.

use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Session, SessionBackend};
use crate::error::AuthError;

type SessionData = HashMap<String, Value>;
type SessionStore = Arc<Mutex<HashMap<String, SessionData>>>;

/// Generates a 128-bit random session id as lowercase hex
fn new_session_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

fn lock(store: &SessionStore) -> MutexGuard<'_, HashMap<String, SessionData>> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

fn stale(id: &str) -> AuthError {
    AuthError::Session(format!("Session {} no longer exists", id))
}

/// Backend holding all sessions in process memory
#[derive(Clone, Default)]
pub struct MemoryBackend {
    store: SessionStore,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        lock(&self.store).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop a session, e.g. one abandoned by its client. Returns whether it existed.
    pub fn evict(&self, id: &str) -> bool {
        lock(&self.store).remove(id).is_some()
    }
}

impl SessionBackend for MemoryBackend {
    fn open(&self) -> Result<Box<dyn Session>, AuthError> {
        let id = new_session_id();
        lock(&self.store).insert(id.clone(), SessionData::new());
        Ok(Box::new(MemorySession {
            id,
            store: Arc::clone(&self.store),
        }))
    }

    fn resume(&self, id: &str) -> Result<Option<Box<dyn Session>>, AuthError> {
        if !lock(&self.store).contains_key(id) {
            return Ok(None);
        }
        Ok(Some(Box::new(MemorySession {
            id: id.to_string(),
            store: Arc::clone(&self.store),
        })))
    }
}

/// Handle to one session inside a `MemoryBackend`.
///
/// Once its id is rotated away or evicted through another handle, writes
/// through this one fail instead of bringing the id back.
pub struct MemorySession {
    id: String,
    store: SessionStore,
}

impl Session for MemorySession {
    fn id(&self) -> &str {
        &self.id
    }

    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.store)
            .get(&self.id)
            .and_then(|data| data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), AuthError> {
        lock(&self.store)
            .get_mut(&self.id)
            .ok_or_else(|| stale(&self.id))?
            .insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), AuthError> {
        lock(&self.store)
            .get_mut(&self.id)
            .ok_or_else(|| stale(&self.id))?
            .remove(key);
        Ok(())
    }

    fn regenerate(&mut self) -> Result<String, AuthError> {
        let new_id = new_session_id();
        let mut store = lock(&self.store);
        let data = store.remove(&self.id).ok_or_else(|| stale(&self.id))?;
        store.insert(new_id.clone(), data);
        debug!("Session regenerated");
        self.id = new_id.clone();
        Ok(new_id)
    }

    fn destroy(&mut self) -> Result<(), AuthError> {
        let new_id = new_session_id();
        let mut store = lock(&self.store);
        store.remove(&self.id);
        store.insert(new_id.clone(), SessionData::new());
        self.id = new_id;
        debug!("Session destroyed");
        Ok(())
    }
}
