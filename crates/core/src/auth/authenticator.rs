//! One authenticator body shared by every scheme.
//!
//! The scheme tag selects credential extraction and the challenge; the scheme
//! engine is injected as a [`Logins`] capability.

use crate::auth::cache::{Revalidation, SessionAuthenticationCache};
use crate::auth::restore::RestoredRequest;
use crate::auth::scheme::extract_credentials;
use hostbound_api::{
    AuthRequest, AuthScheme, Logins, Session, SessionStore, UserIdentity, Validates,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated {
        identity: UserIdentity,
        /// Scheme that produced the identity, which may differ from the
        /// authenticator's own for a cached record
        scheme: AuthScheme,
        session_id: String,
        /// Whether the identity came from the session cache
        cached: bool,
        /// Interrupted request to resume, when this request revisits it
        restored: Option<RestoredRequest>,
    },
    /// No identity; the pipeline answers with a challenge (401), not an error
    Unauthenticated {
        scheme: AuthScheme,
        challenge: Option<String>,
    },
    /// The target does not require authentication
    Deferred,
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        match self {
            AuthOutcome::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }
}

pub struct SchemeAuthenticator<L: Logins> {
    scheme: AuthScheme,
    realm: String,
    logins: L,
    validator: Arc<dyn Validates>,
    sessions: Arc<dyn SessionStore>,
    cache: Arc<SessionAuthenticationCache>,
}

impl<L: Logins> SchemeAuthenticator<L> {
    pub fn new(
        scheme: AuthScheme,
        realm: impl Into<String>,
        logins: L,
        validator: Arc<dyn Validates>,
        sessions: Arc<dyn SessionStore>,
        cache: Arc<SessionAuthenticationCache>,
    ) -> Self {
        Self {
            scheme,
            realm: realm.into(),
            logins,
            validator,
            sessions,
            cache,
        }
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Authenticate a request, preferring a cached session identity.
    ///
    /// A cached identity that still validates skips the scheme login entirely.
    pub fn authenticate(&self, request: &AuthRequest) -> AuthOutcome {
        if !request.mandatory {
            return AuthOutcome::Deferred;
        }

        let session = self.open_session(request);
        if let Some(session) = &session {
            if let Some(outcome) = self.authenticate_cached(session.as_ref(), request) {
                return outcome;
            }
        }

        self.authenticate_fresh(session, request)
    }

    /// Drop the cached identity of a session; returns whether one existed
    pub fn logout(&self, session_id: &str) -> bool {
        let Some(session) = self.sessions.get(session_id) else {
            return false;
        };
        let removed = self.cache.invalidate(session.as_ref());
        if removed {
            info!(
                "{}: Logged out session {}",
                self.scheme.log_label(),
                session_id
            );
        }
        removed
    }

    /// Existing session only, except for client certificates which open one eagerly
    fn open_session(&self, request: &AuthRequest) -> Option<Arc<dyn Session>> {
        let existing = request
            .session_id
            .as_deref()
            .and_then(|id| self.sessions.get(id));
        match existing {
            None if self.scheme == AuthScheme::ClientCert => match self.sessions.create() {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("{}: Could not open a session: {}", self.scheme.log_label(), e);
                    None
                }
            },
            other => other,
        }
    }

    fn authenticate_cached(
        &self,
        session: &dyn Session,
        request: &AuthRequest,
    ) -> Option<AuthOutcome> {
        let label = self.scheme.log_label();
        let Some(record) = self.cache.lookup(session) else {
            debug!(
                "{}: No cached authentication in session {}",
                label,
                session.id()
            );
            return None;
        };

        // Validation may block; no session lock is held here
        match self.cache.revalidate(&record, self.validator.as_ref()) {
            Revalidation::Valid => {
                debug!(
                    "{}: Using cached {} authentication of {} in session {}",
                    label,
                    record.scheme(),
                    record.identity().name,
                    session.id()
                );
                let restored = self
                    .cache
                    .restore_request(session, &request.uri)
                    .into_restored();
                Some(AuthOutcome::Authenticated {
                    identity: record.identity().clone(),
                    scheme: record.scheme(),
                    session_id: session.id().to_string(),
                    cached: true,
                    restored,
                })
            }
            Revalidation::Revoked => {
                debug!(
                    "{}: Cached authentication of {} revoked in session {}",
                    label,
                    record.identity().name,
                    session.id()
                );
                self.cache.invalidate_if_current(session, &record);
                None
            }
        }
    }

    fn authenticate_fresh(
        &self,
        session: Option<Arc<dyn Session>>,
        request: &AuthRequest,
    ) -> AuthOutcome {
        let label = self.scheme.log_label();
        let Some(attempt) = extract_credentials(self.scheme, request) else {
            debug!("{}: No credentials presented for {}", label, request.uri);
            return self.challenge();
        };

        let identity = match self
            .logins
            .login(attempt.username.as_deref(), &attempt.credential, request)
        {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                debug!(
                    "{}: Login rejected for {}",
                    label,
                    attempt.username.as_deref().unwrap_or("<unknown>")
                );
                return self.challenge();
            }
            Err(e) => {
                warn!("{}: Login failed for {}: {}", label, request.uri, e);
                return self.challenge();
            }
        };

        let session = match session {
            Some(session) => session,
            None => match self.sessions.create() {
                Ok(session) => session,
                Err(e) => {
                    warn!(
                        "{}: Could not open a session for {}: {}",
                        label, identity.name, e
                    );
                    return self.challenge();
                }
            },
        };
        self.cache.store(
            session.as_ref(),
            self.scheme,
            identity.clone(),
            attempt.credential,
        );
        info!(
            "{}: Cached authentication for user {} in session {}",
            label,
            identity.name,
            session.id()
        );

        let restored = self
            .cache
            .restore_request(session.as_ref(), &request.uri)
            .into_restored();
        AuthOutcome::Authenticated {
            identity,
            scheme: self.scheme,
            session_id: session.id().to_string(),
            cached: false,
            restored,
        }
    }

    fn challenge(&self) -> AuthOutcome {
        AuthOutcome::Unauthenticated {
            scheme: self.scheme,
            challenge: self.logins.challenge(self.scheme, &self.realm),
        }
    }
}
