//! Drops blocked providers from service-provider discovery results.
//!
//! Discovery lists every provider registered under a listing, including ones the
//! boundary will later refuse to load. Removing them here keeps discovery and
//! loading consistent, so nothing downstream tries to instantiate a blocked
//! provider.

use crate::error::{HostboundError, Result};
use hostbound_api::ArtifactHandle;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Setup phase of a [`ProviderExclusionFilter`]
#[derive(Debug, Default)]
pub struct ProviderExclusionFilterBuilder {
    rules: HashMap<String, Vec<Regex>>,
}

impl ProviderExclusionFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop handles whose origin matches `pattern` from lookups of `resource`
    pub fn exclude(mut self, resource: &str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| HostboundError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.rules
            .entry(resource.to_string())
            .or_default()
            .push(regex);
        Ok(self)
    }

    pub fn build(self) -> ProviderExclusionFilter {
        ProviderExclusionFilter { rules: self.rules }
    }
}

/// Data-driven table: resource name → exclusion patterns over handle origins
#[derive(Debug, Clone, Default)]
pub struct ProviderExclusionFilter {
    rules: HashMap<String, Vec<Regex>>,
}

impl ProviderExclusionFilter {
    pub fn builder() -> ProviderExclusionFilterBuilder {
        ProviderExclusionFilterBuilder::new()
    }

    /// Whether lookups of `resource` are filtered at all
    pub fn applies_to(&self, resource: &str) -> bool {
        self.rules.contains_key(resource)
    }

    /// Remove excluded handles, keeping the survivors in their original order.
    ///
    /// Lookups of other resource names pass through unchanged.
    pub fn filter(&self, resource: &str, handles: Vec<ArtifactHandle>) -> Vec<ArtifactHandle> {
        let Some(patterns) = self.rules.get(resource) else {
            return handles;
        };

        handles
            .into_iter()
            .filter(|handle| {
                let blocked = patterns.iter().any(|p| p.is_match(&handle.origin));
                if blocked {
                    debug!("Excluding provider {} from {}", handle.origin, resource);
                }
                !blocked
            })
            .collect()
    }

    /// Resource names with at least one exclusion
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
