pub mod auth;
pub mod error;
pub mod module;
pub mod session;

// Re-export commonly used types
pub use auth::{
    AuthRequest, AuthScheme, AuthenticationRecord, ClientCertificate, Credential, Logins,
    RequestBody, SpnegoMethod, UserIdentity, Validates,
};
pub use error::{ApiError, ApiResult};
pub use module::{ArtifactHandle, LookupKind, LookupRequest, ModuleResolver};
pub use session::{Session, SessionStore, SessionValue};
