//! Cross-scheme session authentication (single sign-on).
//!
//! Every scheme authenticator reads and writes the same session attribute, so an
//! identity established under one scheme is accepted by applications guarded by
//! any other scheme in the same session.
//!
//! ```text
//! request ──▶ SchemeAuthenticator ──▶ SessionAuthenticationCache ──hit──▶ Validates
//!                    │                          │                            │
//!                    │ miss / revoked           │                       valid│
//!                    ▼                          ▼                            ▼
//!               Logins (scheme engine) ──▶ store record            restore protocol
//! ```
//!
//! All read-modify-write sequences on a session run under that session's lock
//! (see [`SessionLocks`]); the validation call itself runs outside it.

pub mod authenticator;
pub mod cache;
pub mod locks;
pub mod restore;
pub mod scheme;
pub mod sso;
pub mod store;

pub use authenticator::{AuthOutcome, SchemeAuthenticator};
pub use cache::{Revalidation, SessionAuthenticationCache};
pub use locks::SessionLocks;
pub use restore::{RedirectRestoreState, RestoreOutcome, RestoredRequest};
pub use scheme::{LoginAttempt, extract_credentials};
pub use sso::SingleSignOn;
pub use store::{InMemorySession, InMemorySessionStore};

/// Session attribute holding the [`hostbound_api::AuthenticationRecord`], shared by all schemes
pub const AUTHENTICATED_ATTRIBUTE: &str = "hostbound.security.authenticated";
