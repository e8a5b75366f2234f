//! Host-owned session store abstraction.
//!
//! The host creates and expires sessions; this workspace only reads and writes
//! attributes on them.

use crate::auth::{AuthenticationRecord, RequestBody};
use crate::error::ApiResult;
use std::sync::Arc;

/// Value stored under a session attribute
#[derive(Debug, Clone)]
pub enum SessionValue {
    Text(String),
    Body(RequestBody),
    Authentication(Arc<AuthenticationRecord>),
}

impl SessionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SessionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_body(&self) -> Option<&RequestBody> {
        match self {
            SessionValue::Body(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_authentication(&self) -> Option<&Arc<AuthenticationRecord>> {
        match self {
            SessionValue::Authentication(r) => Some(r),
            _ => None,
        }
    }
}

/// One client's mutable key/value store, shared across its requests
pub trait Session: Send + Sync {
    /// Stable identity of the session, also used as its lock key
    fn id(&self) -> &str;

    fn get_attribute(&self, key: &str) -> Option<SessionValue>;

    fn set_attribute(&self, key: &str, value: SessionValue);

    fn remove_attribute(&self, key: &str) -> Option<SessionValue>;
}

/// Session lookup and creation, supplied by the host
pub trait SessionStore: Send + Sync {
    /// Open an existing session without creating one
    fn get(&self, id: &str) -> Option<Arc<dyn Session>>;

    /// Create a new, empty session under a fresh unguessable id
    fn create(&self) -> ApiResult<Arc<dyn Session>>;
}
