//! Authentication data and the capabilities a host's identity subsystem provides.
//!
//! Scheme engines (the Basic/Digest/SPNEGO/certificate handshakes themselves) live
//! outside this workspace; they are reached through [`Logins`]. Revalidation of an
//! already established identity goes through [`Validates`].

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

// ==================== Schemes ====================

/// Token-exchange flavour of the SPNEGO scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpnegoMethod {
    Spnego,
    Negotiate,
}

/// Authentication scheme that produced (or guards) an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthScheme {
    Basic,
    Digest,
    Spnego(SpnegoMethod),
    ClientCert,
}

impl AuthScheme {
    /// Select a scheme from a configured authentication type.
    ///
    /// An absent type means Basic. Matching is case-insensitive and accepts both
    /// spellings of the client-certificate type.
    pub fn from_auth_type(auth_type: Option<&str>) -> ApiResult<Self> {
        let Some(raw) = auth_type else {
            return Ok(AuthScheme::Basic);
        };
        match raw.trim().to_ascii_uppercase().as_str() {
            "BASIC" => Ok(AuthScheme::Basic),
            "DIGEST" => Ok(AuthScheme::Digest),
            "SPNEGO" => Ok(AuthScheme::Spnego(SpnegoMethod::Spnego)),
            "NEGOTIATE" => Ok(AuthScheme::Spnego(SpnegoMethod::Negotiate)),
            "CLIENT_CERT" | "CLIENT-CERT" => Ok(AuthScheme::ClientCert),
            _ => Err(ApiError::InvalidArgument(format!(
                "unsupported authentication type: {}",
                raw
            ))),
        }
    }

    /// Canonical authentication type name
    pub fn auth_type(&self) -> &'static str {
        match self {
            AuthScheme::Basic => "BASIC",
            AuthScheme::Digest => "DIGEST",
            AuthScheme::Spnego(SpnegoMethod::Spnego) => "SPNEGO",
            AuthScheme::Spnego(SpnegoMethod::Negotiate) => "NEGOTIATE",
            AuthScheme::ClientCert => "CLIENT_CERT",
        }
    }

    /// Prefix used in log lines
    pub fn log_label(&self) -> &'static str {
        match self {
            AuthScheme::Basic => "SSO BASIC",
            AuthScheme::Digest => "SSO DIGEST",
            AuthScheme::Spnego(_) => "SSO SPNEGO",
            AuthScheme::ClientCert => "SSO CLIENT_CERT",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.auth_type())
    }
}

// ==================== Identity & Credentials ====================

/// A validated user identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Credential material presented by a client.
///
/// Held in an authentication record only so the identity can be revalidated.
/// `Debug` never prints the material.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Cleartext password (Basic)
    Password(String),
    /// Digest authorization parameters as sent by the client
    Digest(String),
    /// SPNEGO/Negotiate token, still encoded
    Token(String),
    /// DER-encoded client certificate
    Certificate(Vec<u8>),
}

impl Credential {
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::Password(_) => "password",
            Credential::Digest(_) => "digest",
            Credential::Token(_) => "token",
            Credential::Certificate(_) => "certificate",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential::{}(<redacted>)", self.kind())
    }
}

/// Cached proof that a session holds a validated identity.
///
/// Immutable once built; a fresh login replaces the whole record.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationRecord {
    scheme: AuthScheme,
    identity: UserIdentity,
    credential: Credential,
    created_at: SystemTime,
}

impl AuthenticationRecord {
    pub fn new(scheme: AuthScheme, identity: UserIdentity, credential: Credential) -> Self {
        Self {
            scheme,
            identity,
            credential,
            created_at: SystemTime::now(),
        }
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
}

// ==================== Requests ====================

/// Request body kept for replay after an authentication challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

impl RequestBody {
    pub fn new(content_type: Option<&str>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            content: content.into(),
        }
    }

    pub fn form(content: impl Into<Vec<u8>>) -> Self {
        Self::new(Some("application/x-www-form-urlencoded"), content)
    }
}

/// Peer certificate presented during the TLS handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    /// Subject distinguished name
    pub subject: String,
    pub der: Vec<u8>,
}

/// The parts of an inbound request the authenticators look at
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub method: String,
    /// Full request URL including the query string, exactly as received
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub session_id: Option<String>,
    pub client_certificate: Option<ClientCertificate>,
    /// Whether the target resource requires authentication
    pub mandatory: bool,
}

impl AuthRequest {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers: Vec::new(),
            body: None,
            session_id: None,
            client_certificate: None,
            mandatory: true,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_client_certificate(mut self, certificate: ClientCertificate) -> Self {
        self.client_certificate = Some(certificate);
        self
    }

    /// Mark the target as not requiring authentication
    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    /// First header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn authorization(&self) -> Option<&str> {
        self.header("Authorization")
    }
}

// ==================== Capabilities ====================

/// Scheme-specific login primitive supplied by the host's scheme engine
pub trait Logins: Send + Sync {
    /// Complete a login for the extracted credentials.
    ///
    /// `Ok(None)` means the credentials were rejected.
    fn login(
        &self,
        username: Option<&str>,
        credential: &Credential,
        request: &AuthRequest,
    ) -> ApiResult<Option<UserIdentity>>;

    /// Challenge the pipeline should send back when no identity was established
    fn challenge(&self, scheme: AuthScheme, realm: &str) -> Option<String> {
        match scheme {
            AuthScheme::Basic => Some(format!("Basic realm=\"{}\"", realm)),
            AuthScheme::Digest => Some(format!("Digest realm=\"{}\"", realm)),
            AuthScheme::Spnego(_) => Some("Negotiate".to_string()),
            AuthScheme::ClientCert => None,
        }
    }
}

impl<T: Logins + ?Sized> Logins for Arc<T> {
    fn login(
        &self,
        username: Option<&str>,
        credential: &Credential,
        request: &AuthRequest,
    ) -> ApiResult<Option<UserIdentity>> {
        (**self).login(username, credential, request)
    }

    fn challenge(&self, scheme: AuthScheme, realm: &str) -> Option<String> {
        (**self).challenge(scheme, realm)
    }
}

/// Revalidation capability of the host's login subsystem
pub trait Validates: Send + Sync {
    /// Whether a previously established identity is still valid
    fn validate(&self, identity: &UserIdentity) -> ApiResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_type_selection() {
        assert_eq!(AuthScheme::from_auth_type(None).unwrap(), AuthScheme::Basic);
        assert_eq!(
            AuthScheme::from_auth_type(Some("digest")).unwrap(),
            AuthScheme::Digest
        );
        assert_eq!(
            AuthScheme::from_auth_type(Some("Negotiate")).unwrap(),
            AuthScheme::Spnego(SpnegoMethod::Negotiate)
        );
        assert_eq!(
            AuthScheme::from_auth_type(Some("CLIENT-CERT")).unwrap(),
            AuthScheme::ClientCert
        );
        assert_eq!(
            AuthScheme::from_auth_type(Some("client_cert")).unwrap(),
            AuthScheme::ClientCert
        );
        assert!(AuthScheme::from_auth_type(Some("FORM")).is_err());
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let rendered = format!("{:?}", Credential::Password("hunter2".to_string()));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("password"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = AuthRequest::new("GET", "/app").with_header("authorization", "Basic abc");
        assert_eq!(req.authorization(), Some("Basic abc"));
        assert_eq!(req.header("X-Missing"), None);
    }
}
