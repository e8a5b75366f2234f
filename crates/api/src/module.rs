//! Module graph abstractions shared between the host and the isolation boundary.
//!
//! A resolver is any graph of named artifacts (classes and resources) that can be
//! searched: the hosted application's local graph, the boot graph, or the host's
//! own delegation chain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of name a lookup is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKind {
    /// Dot-separated class name (e.g. "ch.qos.logback.classic.Logger")
    Class,
    /// Slash-separated resource path (e.g. "META-INF/services/org.slf4j.Provider")
    Resource,
}

/// A single lookup, created per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub name: String,
    pub kind: LookupKind,
}

impl LookupRequest {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LookupKind::Class,
        }
    }

    pub fn resource(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LookupKind::Resource,
        }
    }
}

/// Opaque reference to a resolved artifact.
///
/// Two handles are the same artifact when they share an `origin`; the content
/// behind the origin is never compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactHandle {
    /// Name the artifact was resolved under
    pub name: String,
    /// Where the artifact lives (e.g. "jar:file:/libs/app.jar!/com/acme/Foo.class")
    pub origin: String,
}

impl ArtifactHandle {
    pub fn new(name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
        }
    }
}

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.origin)
    }
}

/// A searchable module graph.
///
/// Implementations must be safe to call from many request threads at once.
pub trait ModuleResolver: Send + Sync {
    /// Find a class by its dotted name
    fn find_class(&self, name: &str) -> Option<ArtifactHandle>;

    /// Find every resource registered under `name`, in graph order
    fn find_resources(&self, name: &str) -> Vec<ArtifactHandle>;

    /// Resolver name (for logging/debugging)
    fn name(&self) -> &str;
}
