//! Literal prefix rules deciding which names belong to the host partition.

use crate::boundary::SERVICES_DIR;
use crate::error::{HostboundError, Result};
use std::fmt;
use tracing::debug;

/// Which derived form of a rule matched a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameForm {
    /// The prefix as written (class names, e.g. "ch.qos.logback.")
    Dotted,
    /// Dots replaced by slashes (resource paths, e.g. "ch/qos/logback/")
    Slashed,
    /// Provider listing for the prefix (e.g. "META-INF/services/ch.qos.logback.")
    ServiceListing,
}

impl fmt::Display for NameForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NameForm::Dotted => "dotted",
            NameForm::Slashed => "slashed",
            NameForm::ServiceListing => "service-listing",
        };
        f.write_str(s)
    }
}

/// The rule (and the form of it) that matched a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub prefix: &'a str,
    pub form: NameForm,
}

#[derive(Debug, Clone)]
struct PrefixRule {
    dotted: String,
    slashed: String,
    service_listing: String,
}

impl PrefixRule {
    fn new(prefix: &str) -> Self {
        Self {
            dotted: prefix.to_string(),
            slashed: prefix.replace('.', "/"),
            service_listing: format!("{}{}", SERVICES_DIR, prefix),
        }
    }

    fn form_matching(&self, name: &str) -> Option<NameForm> {
        if name.starts_with(&self.dotted) {
            Some(NameForm::Dotted)
        } else if name.starts_with(&self.slashed) {
            Some(NameForm::Slashed)
        } else if name.starts_with(&self.service_listing) {
            Some(NameForm::ServiceListing)
        } else {
            None
        }
    }
}

/// Append-only setup phase of a [`PrefixPolicy`]
#[derive(Debug, Default)]
pub struct PrefixPolicyBuilder {
    rules: Vec<PrefixRule>,
}

impl PrefixPolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    ///
    /// Empty prefixes are rejected: they would reserve every name for the host.
    pub fn add(mut self, prefix: &str) -> Result<Self> {
        if prefix.is_empty() {
            return Err(HostboundError::InvalidRule(
                "host prefix must not be empty".to_string(),
            ));
        }
        if self.rules.iter().any(|r| r.dotted == prefix) {
            debug!("Ignoring duplicate host prefix {}", prefix);
            return Ok(self);
        }
        self.rules.push(PrefixRule::new(prefix));
        Ok(self)
    }

    pub fn add_all<'a>(self, prefixes: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        prefixes.into_iter().try_fold(self, |b, p| b.add(p))
    }

    /// Freeze the rule set
    pub fn build(self) -> PrefixPolicy {
        PrefixPolicy { rules: self.rules }
    }
}

/// Frozen, ordered set of host prefixes. Read-only and freely shareable.
#[derive(Debug, Clone, Default)]
pub struct PrefixPolicy {
    rules: Vec<PrefixRule>,
}

impl PrefixPolicy {
    pub fn builder() -> PrefixPolicyBuilder {
        PrefixPolicyBuilder::new()
    }

    pub fn from_prefixes<'a>(prefixes: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        Ok(PrefixPolicyBuilder::new().add_all(prefixes)?.build())
    }

    /// Whether `name` belongs to the host partition
    pub fn matches(&self, name: &str) -> bool {
        self.matching_rule(name).is_some()
    }

    /// First rule (in insertion order) that matches `name`
    pub fn matching_rule(&self, name: &str) -> Option<RuleMatch<'_>> {
        self.rules.iter().find_map(|rule| {
            rule.form_matching(name).map(|form| RuleMatch {
                prefix: rule.dotted.as_str(),
                form,
            })
        })
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.dotted.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PrefixPolicy {
        PrefixPolicy::from_prefixes(["ch.qos.logback.", "org.slf4j."]).unwrap()
    }

    #[test]
    fn test_matches_all_forms() {
        let policy = policy();

        let m = policy.matching_rule("ch.qos.logback.classic.Logger").unwrap();
        assert_eq!(m.prefix, "ch.qos.logback.");
        assert_eq!(m.form, NameForm::Dotted);

        let m = policy.matching_rule("org/slf4j/impl/StaticLoggerBinder.class").unwrap();
        assert_eq!(m.prefix, "org.slf4j.");
        assert_eq!(m.form, NameForm::Slashed);

        let m = policy
            .matching_rule("META-INF/services/org.slf4j.spi.SLF4JServiceProvider")
            .unwrap();
        assert_eq!(m.form, NameForm::ServiceListing);
    }

    #[test]
    fn test_literal_prefix_only() {
        let policy = policy();
        assert!(!policy.matches("com.acme.Logger"));
        // No wildcard semantics: the dot is literal
        assert!(!policy.matches("chXqosXlogback.Foo"));
        // Prefix must be at the start
        assert!(!policy.matches("my.ch.qos.logback.Foo"));
        assert!(!policy.matches(""));
    }

    #[test]
    fn test_rule_order_decides_reported_match() {
        let policy = PrefixPolicy::from_prefixes(["org.", "org.slf4j."]).unwrap();
        assert_eq!(policy.matching_rule("org.slf4j.Logger").unwrap().prefix, "org.");
    }

    #[test]
    fn test_builder_rejects_empty_and_skips_duplicates() {
        assert!(matches!(
            PrefixPolicy::builder().add(""),
            Err(HostboundError::InvalidRule(_))
        ));

        let policy = PrefixPolicy::builder()
            .add("groovy.")
            .unwrap()
            .add("groovy.")
            .unwrap()
            .build();
        assert_eq!(policy.len(), 1);
        assert_eq!(policy.prefixes().collect::<Vec<_>>(), vec!["groovy."]);
    }

    #[test]
    fn test_empty_policy_matches_nothing() {
        let policy = PrefixPolicy::default();
        assert!(policy.is_empty());
        assert!(!policy.matches("anything.at.All"));
    }
}
