//! Thread-safe in-memory implementation of SessionStore.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use hostbound_api::{ApiError, ApiResult, Session, SessionStore, SessionValue};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub struct InMemorySession {
    id: String,
    attributes: RwLock<HashMap<String, SessionValue>>,
}

impl InMemorySession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: RwLock::new(HashMap::new()),
        }
    }
}

impl Session for InMemorySession {
    fn id(&self) -> &str {
        &self.id
    }

    fn get_attribute(&self, key: &str) -> Option<SessionValue> {
        self.attributes.read().get(key).cloned()
    }

    fn set_attribute(&self, key: &str, value: SessionValue) {
        self.attributes.write().insert(key.to_string(), value);
    }

    fn remove_attribute(&self, key: &str) -> Option<SessionValue> {
        self.attributes.write().remove(key)
    }
}

/// Sessions keyed by id
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Arc<InMemorySession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the session with `id`, creating it under that id if missing
    pub fn get_or_insert(&self, id: &str) -> Arc<dyn Session> {
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(InMemorySession::new(id)))
            .clone()
    }

    /// Expire a session; returns whether it existed
    pub fn destroy(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

}

/// 256 bits from the OS random source, base64url without padding
fn next_id() -> ApiResult<String> {
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf)
        .map_err(|e| ApiError::Unavailable(format!("random source: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: &str) -> Option<Arc<dyn Session>> {
        self.sessions
            .get(id)
            .map(|s| s.value().clone() as Arc<dyn Session>)
    }

    fn create(&self) -> ApiResult<Arc<dyn Session>> {
        loop {
            let id = next_id()?;
            if let Entry::Vacant(slot) = self.sessions.entry(id.clone()) {
                let session = Arc::new(InMemorySession::new(id));
                slot.insert(session.clone());
                return Ok(session);
            }
        }
    }
}
