//! Pulling scheme-specific credentials out of a request.
//!
//! This is header decoding only; verifying the credentials is the scheme
//! engine's job behind [`hostbound_api::Logins`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hostbound_api::{AuthRequest, AuthScheme, Credential};

/// Credentials ready to hand to a scheme engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttempt {
    /// Absent when the scheme learns the user only from the engine (SPNEGO)
    pub username: Option<String>,
    pub credential: Credential,
}

/// Credentials the request presents for `scheme`, if any
pub fn extract_credentials(scheme: AuthScheme, request: &AuthRequest) -> Option<LoginAttempt> {
    match scheme {
        AuthScheme::Basic => basic(authorization_param(request, "Basic")?),
        AuthScheme::Digest => digest(authorization_param(request, "Digest")?),
        AuthScheme::Spnego(_) => negotiate(authorization_param(request, "Negotiate")?),
        AuthScheme::ClientCert => request.client_certificate.as_ref().map(|cert| LoginAttempt {
            username: Some(cert.subject.clone()),
            credential: Credential::Certificate(cert.der.clone()),
        }),
    }
}

/// The part of the Authorization header after `scheme `, matched case-insensitively
fn authorization_param<'a>(request: &'a AuthRequest, scheme: &str) -> Option<&'a str> {
    let header = request.authorization()?.trim();
    let (name, rest) = header.split_once(char::is_whitespace)?;
    name.eq_ignore_ascii_case(scheme).then(|| rest.trim())
}

fn basic(encoded: &str) -> Option<LoginAttempt> {
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some(LoginAttempt {
        username: Some(user.to_string()),
        credential: Credential::Password(password.to_string()),
    })
}

fn digest(params: &str) -> Option<LoginAttempt> {
    let username = digest_params(params)
        .into_iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("username"))
        .map(|(_, v)| v)?;
    Some(LoginAttempt {
        username: Some(username),
        credential: Credential::Digest(params.to_string()),
    })
}

fn negotiate(token: &str) -> Option<LoginAttempt> {
    if token.is_empty() {
        return None;
    }
    Some(LoginAttempt {
        username: None,
        credential: Credential::Token(token.to_string()),
    })
}

/// Split `k1="v, 1", k2=v2` into pairs, unquoting values
fn digest_params(params: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut chars = params.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}

        let key: String = std::iter::from_fn(|| chars.next_if(|c| *c != '=')).collect();
        if chars.next().is_none() {
            break;
        }

        let mut value = String::new();
        if chars.next_if_eq(&'"').is_some() {
            while let Some(c) = chars.next() {
                match c {
                    '\\' => value.extend(chars.next()),
                    '"' => break,
                    _ => value.push(c),
                }
            }
        } else {
            value.extend(std::iter::from_fn(|| chars.next_if(|c| *c != ',')));
        }

        pairs.push((key.trim().to_string(), value.trim().to_string()));
    }

    pairs
}
