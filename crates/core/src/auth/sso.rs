//! Factory handing out authenticators that share one session cache.

use crate::auth::authenticator::SchemeAuthenticator;
use crate::auth::cache::SessionAuthenticationCache;
use crate::config::AuthConfig;
use crate::error::Result;
use hostbound_api::{AuthScheme, Logins, SessionStore, Validates};
use std::sync::Arc;

/// Single sign-on domain: every authenticator built here reads and writes the
/// same cache, session store and validator.
pub struct SingleSignOn {
    cache: Arc<SessionAuthenticationCache>,
    sessions: Arc<dyn SessionStore>,
    validator: Arc<dyn Validates>,
    realm: String,
}

impl SingleSignOn {
    pub fn new(sessions: Arc<dyn SessionStore>, validator: Arc<dyn Validates>) -> Self {
        Self {
            cache: Arc::new(SessionAuthenticationCache::new()),
            sessions,
            validator,
            realm: AuthConfig::default().realm,
        }
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    pub fn cache(&self) -> &Arc<SessionAuthenticationCache> {
        &self.cache
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn authenticator<L: Logins>(
        &self,
        scheme: AuthScheme,
        logins: L,
    ) -> SchemeAuthenticator<L> {
        SchemeAuthenticator::new(
            scheme,
            self.realm.clone(),
            logins,
            self.validator.clone(),
            self.sessions.clone(),
            self.cache.clone(),
        )
    }

    /// Authenticator for a configured application; realm and scheme come from `config`
    pub fn authenticator_for<L: Logins>(
        &self,
        config: &AuthConfig,
        logins: L,
    ) -> Result<SchemeAuthenticator<L>> {
        let scheme = config.scheme()?;
        Ok(SchemeAuthenticator::new(
            scheme,
            config.realm.clone(),
            logins,
            self.validator.clone(),
            self.sessions.clone(),
            self.cache.clone(),
        ))
    }
}
