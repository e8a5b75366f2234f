//! Per-session storage of one validated identity.

use crate::auth::AUTHENTICATED_ATTRIBUTE;
use crate::auth::locks::SessionLocks;
use crate::auth::restore::{self, RedirectRestoreState, RestoreOutcome};
use hostbound_api::{
    AuthRequest, AuthScheme, AuthenticationRecord, Credential, Session, SessionValue,
    UserIdentity, Validates,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of re-checking a cached identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revalidation {
    Valid,
    Revoked,
}

/// Session authentication cache shared by every scheme authenticator.
///
/// Only the authentication attribute and the restore attributes of a session
/// are touched, and only under that session's lock.
#[derive(Debug, Default)]
pub struct SessionAuthenticationCache {
    locks: SessionLocks,
}

impl SessionAuthenticationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locks(&self) -> &SessionLocks {
        &self.locks
    }

    /// Write a new record, replacing any previous one whatever its scheme
    pub fn store(
        &self,
        session: &dyn Session,
        scheme: AuthScheme,
        identity: UserIdentity,
        credential: Credential,
    ) -> Arc<AuthenticationRecord> {
        let record = Arc::new(AuthenticationRecord::new(scheme, identity, credential));
        self.locks.with_lock(session.id(), || {
            session.set_attribute(
                AUTHENTICATED_ATTRIBUTE,
                SessionValue::Authentication(record.clone()),
            );
        });
        record
    }

    pub fn lookup(&self, session: &dyn Session) -> Option<Arc<AuthenticationRecord>> {
        self.locks.with_lock(session.id(), || read_record(session))
    }

    /// Remove the record (logout or failed revalidation); returns whether one existed
    pub fn invalidate(&self, session: &dyn Session) -> bool {
        self.locks
            .with_lock(session.id(), || session.remove_attribute(AUTHENTICATED_ATTRIBUTE))
            .is_some()
    }

    /// Remove the record only if it is still `expected`.
    ///
    /// A concurrent fresh login may have replaced the record while it was being
    /// revalidated; that newer record is left alone.
    pub fn invalidate_if_current(
        &self,
        session: &dyn Session,
        expected: &Arc<AuthenticationRecord>,
    ) -> bool {
        self.locks.with_lock(session.id(), || match read_record(session) {
            Some(current) if Arc::ptr_eq(&current, expected) => {
                session.remove_attribute(AUTHENTICATED_ATTRIBUTE);
                true
            }
            Some(_) => {
                debug!(
                    "Record in session {} replaced during revalidation; keeping it",
                    session.id()
                );
                false
            }
            None => false,
        })
    }

    /// Re-check a record's identity with the login subsystem.
    ///
    /// Runs without holding any session lock. A collaborator error counts as
    /// revoked.
    pub fn revalidate(
        &self,
        record: &AuthenticationRecord,
        validator: &dyn Validates,
    ) -> Revalidation {
        match validator.validate(record.identity()) {
            Ok(true) => Revalidation::Valid,
            Ok(false) => Revalidation::Revoked,
            Err(e) => {
                warn!(
                    "Validation of {} failed, treating as revoked: {}",
                    record.identity().name,
                    e
                );
                Revalidation::Revoked
            }
        }
    }

    /// Record the request an authentication challenge is about to interrupt
    pub fn stash_request(&self, session: &dyn Session, request: &AuthRequest) {
        let state = RedirectRestoreState::capture(request);
        self.locks.with_lock(session.id(), || state.save(session));
    }

    /// Run the restore protocol for the request now being served.
    ///
    /// Pending state is consumed only when `current_uri` is byte-identical to the
    /// stashed URI; compare and clear happen under one lock acquisition.
    pub fn restore_request(&self, session: &dyn Session, current_uri: &str) -> RestoreOutcome {
        self.locks
            .with_lock(session.id(), || restore::restore(session, current_uri))
    }
}

fn read_record(session: &dyn Session) -> Option<Arc<AuthenticationRecord>> {
    session
        .get_attribute(AUTHENTICATED_ATTRIBUTE)
        .and_then(|value| value.as_authentication().cloned())
}
