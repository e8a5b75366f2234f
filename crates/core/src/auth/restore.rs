//! Resuming a request that an authentication challenge interrupted.
//!
//! The state lives in three session attributes next to the authentication
//! record. It exists only while a challenge is outstanding and is consumed by
//! the first authenticated request for exactly the same URI.

use hostbound_api::{AuthRequest, RequestBody, Session, SessionValue};
use tracing::debug;

pub const ORIGINAL_URI_ATTRIBUTE: &str = "hostbound.security.original_uri";
pub const ORIGINAL_METHOD_ATTRIBUTE: &str = "hostbound.security.original_method";
pub const ORIGINAL_BODY_ATTRIBUTE: &str = "hostbound.security.original_body";

/// Whether requests with this method carry a body worth replaying
pub fn method_has_body(method: &str) -> bool {
    ["POST", "PUT", "PATCH"]
        .iter()
        .any(|m| m.eq_ignore_ascii_case(method))
}

/// The interrupted request, as stashed in the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRestoreState {
    pub original_uri: String,
    pub original_method: String,
    /// Present only for methods that carry a body
    pub original_body: Option<RequestBody>,
}

impl RedirectRestoreState {
    pub fn capture(request: &AuthRequest) -> Self {
        let original_body = if method_has_body(&request.method) {
            request.body.clone()
        } else {
            None
        };
        Self {
            original_uri: request.uri.clone(),
            original_method: request.method.to_ascii_uppercase(),
            original_body,
        }
    }

    /// Read the pending state. Callers hold the session lock.
    pub fn load(session: &dyn Session) -> Option<Self> {
        let original_uri = session
            .get_attribute(ORIGINAL_URI_ATTRIBUTE)?
            .as_text()?
            .to_string();
        let original_method = session
            .get_attribute(ORIGINAL_METHOD_ATTRIBUTE)
            .and_then(|v| v.as_text().map(str::to_string))
            .unwrap_or_else(|| "GET".to_string());
        let original_body = session
            .get_attribute(ORIGINAL_BODY_ATTRIBUTE)
            .and_then(|v| v.as_body().cloned());
        Some(Self {
            original_uri,
            original_method,
            original_body,
        })
    }

    /// Write all three attributes, dropping any body left from an earlier stash
    pub(crate) fn save(&self, session: &dyn Session) {
        session.set_attribute(
            ORIGINAL_URI_ATTRIBUTE,
            SessionValue::Text(self.original_uri.clone()),
        );
        session.set_attribute(
            ORIGINAL_METHOD_ATTRIBUTE,
            SessionValue::Text(self.original_method.clone()),
        );
        match &self.original_body {
            Some(body) => {
                session.set_attribute(ORIGINAL_BODY_ATTRIBUTE, SessionValue::Body(body.clone()))
            }
            None => {
                session.remove_attribute(ORIGINAL_BODY_ATTRIBUTE);
            }
        }
    }

    pub(crate) fn clear(session: &dyn Session) {
        session.remove_attribute(ORIGINAL_URI_ATTRIBUTE);
        session.remove_attribute(ORIGINAL_METHOD_ATTRIBUTE);
        session.remove_attribute(ORIGINAL_BODY_ATTRIBUTE);
    }
}

/// The original request handed back to the pipeline after authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredRequest {
    pub uri: String,
    pub method: String,
    pub body: Option<RequestBody>,
}

impl RestoredRequest {
    /// Decode an `application/x-www-form-urlencoded` body into ordered pairs.
    ///
    /// Empty when there is no body or it has another content type.
    pub fn form_parameters(&self) -> Vec<(String, String)> {
        let Some(body) = &self.body else {
            return Vec::new();
        };
        let is_form = body
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|ct| {
                ct.trim()
                    .eq_ignore_ascii_case("application/x-www-form-urlencoded")
            });
        if !is_form {
            return Vec::new();
        }
        url::form_urlencoded::parse(&body.content)
            .into_owned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No challenge was outstanding
    NotPending,
    /// A challenge is outstanding for another URI; state left untouched
    Mismatch,
    Restored(RestoredRequest),
}

impl RestoreOutcome {
    pub fn into_restored(self) -> Option<RestoredRequest> {
        match self {
            RestoreOutcome::Restored(r) => Some(r),
            _ => None,
        }
    }
}

/// Compare-then-clear. Callers hold the session lock.
pub(crate) fn restore(session: &dyn Session, current_uri: &str) -> RestoreOutcome {
    let Some(state) = RedirectRestoreState::load(session) else {
        return RestoreOutcome::NotPending;
    };

    debug!("Restore pending {} -> {}", current_uri, state.original_uri);
    if state.original_uri != current_uri {
        return RestoreOutcome::Mismatch;
    }

    if state.original_body.is_some() {
        debug!("Replaying {} body for {}", state.original_method, state.original_uri);
    }
    RedirectRestoreState::clear(session);

    RestoreOutcome::Restored(RestoredRequest {
        uri: state.original_uri,
        method: state.original_method,
        body: state.original_body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::InMemorySessionStore;
    use hostbound_api::SessionStore;

    fn form_post(uri: &str, body: &str) -> AuthRequest {
        AuthRequest::new("POST", uri).with_body(RequestBody::form(body))
    }

    #[test]
    fn test_capture_keeps_body_only_for_body_methods() {
        let post = RedirectRestoreState::capture(&form_post("/app/form", "a=1"));
        assert!(post.original_body.is_some());

        let get = RedirectRestoreState::capture(
            &AuthRequest::new("get", "/app/form").with_body(RequestBody::form("a=1")),
        );
        assert_eq!(get.original_method, "GET");
        assert!(get.original_body.is_none());
    }

    #[test]
    fn test_exact_match_restores_and_clears() {
        let store = InMemorySessionStore::new();
        let session = store.create().unwrap();
        RedirectRestoreState::capture(&form_post("/app/form?x=1", "name=J%C3%BCrgen&tag=a&tag=b"))
            .save(session.as_ref());

        let restored = restore(session.as_ref(), "/app/form?x=1").into_restored().unwrap();
        assert_eq!(restored.method, "POST");
        assert_eq!(
            restored.form_parameters(),
            vec![
                ("name".to_string(), "Jürgen".to_string()),
                ("tag".to_string(), "a".to_string()),
                ("tag".to_string(), "b".to_string()),
            ]
        );

        assert!(session.get_attribute(ORIGINAL_URI_ATTRIBUTE).is_none());
        assert!(session.get_attribute(ORIGINAL_METHOD_ATTRIBUTE).is_none());
        assert!(session.get_attribute(ORIGINAL_BODY_ATTRIBUTE).is_none());
        assert_eq!(restore(session.as_ref(), "/app/form?x=1"), RestoreOutcome::NotPending);
    }

    #[test]
    fn test_near_miss_leaves_state_untouched() {
        let store = InMemorySessionStore::new();
        let session = store.create().unwrap();
        let state = RedirectRestoreState::capture(&form_post("/app/form?x=1", "a=1"));
        state.save(session.as_ref());

        for uri in ["/app/form?x=1 ", "/app/form?x=2", "/app/form", "/APP/form?x=1"] {
            assert_eq!(restore(session.as_ref(), uri), RestoreOutcome::Mismatch);
        }
        assert_eq!(RedirectRestoreState::load(session.as_ref()), Some(state));
    }

    #[test]
    fn test_restash_drops_stale_body() {
        let store = InMemorySessionStore::new();
        let session = store.create().unwrap();
        RedirectRestoreState::capture(&form_post("/a", "x=1")).save(session.as_ref());
        RedirectRestoreState::capture(&AuthRequest::new("GET", "/b")).save(session.as_ref());

        let loaded = RedirectRestoreState::load(session.as_ref()).unwrap();
        assert_eq!(loaded.original_uri, "/b");
        assert!(loaded.original_body.is_none());
    }

    #[test]
    fn test_non_form_body_has_no_parameters() {
        let restored = RestoredRequest {
            uri: "/api".to_string(),
            method: "PUT".to_string(),
            body: Some(RequestBody::new(Some("application/json"), "{\"a\":1}")),
        };
        assert!(restored.form_parameters().is_empty());
    }
}
