//! Host configuration for the boundary and the authenticators.
//!
//! Loaded from JSON; every section is optional and falls back to its default.

use crate::boundary::{PrefixPolicy, ProviderExclusionFilter, SERVICES_DIR};
use crate::error::{HostboundError, Result};
use hostbound_api::AuthScheme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Provider listing scanned by servlet containers at startup
pub const SERVLET_CONTAINER_INITIALIZER: &str =
    "META-INF/services/jakarta.servlet.ServletContainerInitializer";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub boundary: BoundaryConfig,
    pub auth: AuthConfig,
}

impl HostConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Exclusion patterns for one provider listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub resource: String,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Name prefixes reserved for the host runtime, in evaluation order
    pub host_prefixes: Vec<String>,
    pub provider_exclusions: Vec<ExclusionRule>,
}

impl BoundaryConfig {
    /// Runner dependencies that leak onto the hosted application's path and
    /// must stay hidden from it.
    pub fn runner_defaults() -> Self {
        let host_prefixes = [
            "ch.qos.logback.",
            "org.slf4j.",
            "groovy.",
            "org.codehaus.groovy.",
            "org.apache.commons.cli.",
            "org.apache.commons.io.",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        // The logback servlet initializer is listed by discovery but blocked by
        // the "ch.qos.logback." prefix when loaded.
        let provider_exclusions = vec![ExclusionRule {
            resource: SERVLET_CONTAINER_INITIALIZER.to_string(),
            patterns: vec![r"logback-classic(.*?).jar".to_string()],
        }];

        Self {
            host_prefixes,
            provider_exclusions,
        }
    }

    pub fn build_policy(&self) -> Result<PrefixPolicy> {
        PrefixPolicy::from_prefixes(self.host_prefixes.iter().map(String::as_str))
    }

    pub fn build_exclusions(&self) -> Result<ProviderExclusionFilter> {
        let mut builder = ProviderExclusionFilter::builder();
        for rule in &self.provider_exclusions {
            if !rule.resource.starts_with(SERVICES_DIR) {
                return Err(HostboundError::Config(format!(
                    "provider exclusion resource must be a provider listing under {}: {}",
                    SERVICES_DIR, rule.resource
                )));
            }
            for pattern in &rule.patterns {
                builder = builder.exclude(&rule.resource, pattern)?;
            }
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Authentication type of the guarded application (e.g. "BASIC", "CLIENT-CERT").
    /// Absent means Basic.
    pub auth_type: Option<String>,
    pub realm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_type: None,
            realm: "hostbound".to_string(),
        }
    }
}

impl AuthConfig {
    pub fn scheme(&self) -> Result<AuthScheme> {
        AuthScheme::from_auth_type(self.auth_type.as_deref()).map_err(|_| {
            HostboundError::UnsupportedScheme(self.auth_type.clone().unwrap_or_default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostbound_api::{ArtifactHandle, SpnegoMethod};
    use std::io::Write;

    #[test]
    fn test_runner_defaults_build() {
        let config = BoundaryConfig::runner_defaults();
        let policy = config.build_policy().unwrap();
        let initializer = "ch.qos.logback.classic.servlet.LogbackServletContainerInitializer";
        assert!(policy.matches(initializer));
        assert!(policy.matches("org/apache/commons/io/FileUtils.class"));
        assert!(!policy.matches("jakarta.servlet.ServletContainerInitializer"));

        let filter = config.build_exclusions().unwrap();
        let kept = filter.filter(
            SERVLET_CONTAINER_INITIALIZER,
            vec![
                ArtifactHandle::new(
                    SERVLET_CONTAINER_INITIALIZER,
                    "jar:file:/l/logback-classic-1.5.6.jar!/",
                ),
                ArtifactHandle::new(SERVLET_CONTAINER_INITIALIZER, "jar:file:/l/app.jar!/"),
            ],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].origin, "jar:file:/l/app.jar!/");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = HostConfig::from_json_str(
            r#"{ "boundary": { "host_prefixes": ["org.eclipse.jetty."] } }"#,
        )
        .unwrap();
        assert_eq!(config.boundary.host_prefixes, vec!["org.eclipse.jetty."]);
        assert!(config.boundary.provider_exclusions.is_empty());
        assert_eq!(config.auth, AuthConfig::default());
        assert_eq!(config.auth.scheme().unwrap(), AuthScheme::Basic);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "auth": {{ "auth_type": "negotiate", "realm": "corp" }} }}"#
        )
        .unwrap();

        let config = HostConfig::load(file.path()).unwrap();
        assert_eq!(config.auth.realm, "corp");
        assert_eq!(
            config.auth.scheme().unwrap(),
            AuthScheme::Spnego(SpnegoMethod::Negotiate)
        );
    }

    #[test]
    fn test_invalid_entries_are_rejected() {
        let config = BoundaryConfig {
            host_prefixes: vec!["".to_string()],
            provider_exclusions: vec![],
        };
        assert!(matches!(
            config.build_policy(),
            Err(HostboundError::InvalidRule(_))
        ));

        let config = BoundaryConfig {
            host_prefixes: vec![],
            provider_exclusions: vec![ExclusionRule {
                resource: "logback.xml".to_string(),
                patterns: vec!["x".to_string()],
            }],
        };
        assert!(matches!(
            config.build_exclusions(),
            Err(HostboundError::Config(_))
        ));

        let auth = AuthConfig {
            auth_type: Some("FORM".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            auth.scheme(),
            Err(HostboundError::UnsupportedScheme(s)) if s == "FORM"
        ));
        assert!(HostConfig::from_json_str("{ not json").is_err());
    }
}
