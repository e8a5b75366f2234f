#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hostbound_api::{
    ApiError, ApiResult, ArtifactHandle, AuthRequest, Credential, Logins, ModuleResolver, Session,
    SessionStore, UserIdentity, Validates,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// ==================== Module graphs ====================

#[derive(Default)]
pub struct MapResolver {
    pub name: &'static str,
    classes: HashMap<String, ArtifactHandle>,
    resources: HashMap<String, Vec<ArtifactHandle>>,
    pub class_calls: AtomicUsize,
    pub resource_calls: AtomicUsize,
}

impl MapResolver {
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn with_class(mut self, name: &str) -> Self {
        let origin = format!("{}:{}", self.name, name);
        self.classes
            .insert(name.to_string(), ArtifactHandle::new(name, origin));
        self
    }

    pub fn with_resource(mut self, name: &str, origin: &str) -> Self {
        self.resources
            .entry(name.to_string())
            .or_default()
            .push(ArtifactHandle::new(name, origin));
        self
    }
}

impl ModuleResolver for MapResolver {
    fn find_class(&self, name: &str) -> Option<ArtifactHandle> {
        self.class_calls.fetch_add(1, Ordering::SeqCst);
        self.classes.get(name).cloned()
    }

    fn find_resources(&self, name: &str) -> Vec<ArtifactHandle> {
        self.resource_calls.fetch_add(1, Ordering::SeqCst);
        self.resources.get(name).cloned().unwrap_or_default()
    }

    fn name(&self) -> &str {
        self.name
    }
}

// ==================== Identity subsystem ====================

/// Scheme engine stand-in: passwords are checked against a table, every other
/// credential kind is accepted as already verified by the engine.
#[derive(Default)]
pub struct TableLogins {
    passwords: HashMap<String, String>,
    pub calls: AtomicUsize,
    pub unavailable: AtomicBool,
}

impl TableLogins {
    pub fn with_user(mut self, user: &str, password: &str) -> Self {
        self.passwords.insert(user.to_string(), password.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Logins for TableLogins {
    fn login(
        &self,
        username: Option<&str>,
        credential: &Credential,
        _request: &AuthRequest,
    ) -> ApiResult<Option<UserIdentity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("realm offline".to_string()));
        }
        let identity = match (username, credential) {
            (Some(user), Credential::Password(pw)) => self
                .passwords
                .get(user)
                .filter(|expected| *expected == pw)
                .map(|_| UserIdentity::new(user)),
            (None, Credential::Token(_)) => Some(UserIdentity::new("kerberos-user")),
            (Some(user), _) => Some(UserIdentity::new(user)),
            (None, _) => None,
        };
        Ok(identity)
    }
}

pub struct SwitchValidator {
    pub valid: AtomicBool,
    pub broken: AtomicBool,
    pub calls: AtomicUsize,
}

impl SwitchValidator {
    pub fn new() -> Self {
        Self {
            valid: AtomicBool::new(true),
            broken: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn revoke(&self) {
        self.valid.store(false, Ordering::SeqCst);
    }

    pub fn break_backend(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }
}

impl Validates for SwitchValidator {
    fn validate(&self, _identity: &UserIdentity) -> ApiResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("identity store unreachable".to_string()));
        }
        Ok(self.valid.load(Ordering::SeqCst))
    }
}

/// Host store that has no sessions and cannot open any
pub struct ExhaustedStore;

impl SessionStore for ExhaustedStore {
    fn get(&self, _id: &str) -> Option<Arc<dyn Session>> {
        None
    }

    fn create(&self) -> ApiResult<Arc<dyn Session>> {
        Err(ApiError::Unavailable("session limit reached".to_string()))
    }
}

// ==================== Requests ====================

pub fn basic_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}

pub fn digest_header(user: &str) -> String {
    format!(
        r#"Digest username="{}", realm="hostbound", nonce="dcd98b7102dd2f0e", uri="/app", response="6629fae49393a05397450978507c4ef1""#,
        user
    )
}
