//! Per-lookup routing between the confined graphs and the host resolver.

use crate::boundary::exclusion::ProviderExclusionFilter;
use crate::boundary::policy::PrefixPolicy;
use crate::error::{HostboundError, Result};
use dashmap::DashMap;
use hostbound_api::{ArtifactHandle, LookupKind, LookupRequest, ModuleResolver};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Result of a successful lookup. Never partially resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Class(ArtifactHandle),
    Resources(Vec<ArtifactHandle>),
}

/// Decides, per lookup, whether resolution is confined to the hosted
/// application's graphs or delegated to the host.
pub struct ModuleIsolationBoundary {
    policy: PrefixPolicy,
    exclusions: ProviderExclusionFilter,
    /// Hosted application's own graph
    local: Arc<dyn ModuleResolver>,
    /// Shared boot graph, unioned into confined resource lookups
    boot: Arc<dyn ModuleResolver>,
    /// Host delegation chain, used only for names outside the policy
    host: Arc<dyn ModuleResolver>,
    /// Confined classes already resolved from the local graph
    loaded: DashMap<String, ArtifactHandle>,
}

impl ModuleIsolationBoundary {
    pub fn new(
        policy: PrefixPolicy,
        exclusions: ProviderExclusionFilter,
        local: Arc<dyn ModuleResolver>,
        boot: Arc<dyn ModuleResolver>,
        host: Arc<dyn ModuleResolver>,
    ) -> Self {
        Self {
            policy,
            exclusions,
            local,
            boot,
            host,
            loaded: DashMap::new(),
        }
    }

    pub fn policy(&self) -> &PrefixPolicy {
        &self.policy
    }

    pub fn exclusions(&self) -> &ProviderExclusionFilter {
        &self.exclusions
    }

    /// Whether lookups of `name` are confined to the local/boot graphs
    pub fn is_confined(&self, name: &str) -> bool {
        self.policy.matches(name)
    }

    pub fn resolve(&self, request: &LookupRequest) -> Result<LookupOutcome> {
        match request.kind {
            LookupKind::Class => self.resolve_class(&request.name).map(LookupOutcome::Class),
            LookupKind::Resource => self
                .resolve_resources(&request.name)
                .map(LookupOutcome::Resources),
        }
    }

    /// Resolve a class.
    ///
    /// A confined name is searched in the local graph only and fails with
    /// `NotFound` when absent there; it never falls through to the host.
    pub fn resolve_class(&self, name: &str) -> Result<ArtifactHandle> {
        if let Some(rule) = self.policy.matching_rule(name) {
            debug!(
                "Class {} confined by host prefix {} ({})",
                name, rule.prefix, rule.form
            );

            if let Some(handle) = self.loaded.get(name) {
                return Ok(handle.value().clone());
            }

            return match self.local.find_class(name) {
                Some(handle) => {
                    self.loaded.insert(name.to_string(), handle.clone());
                    Ok(handle)
                }
                None => {
                    debug!("Confined class {} not found in {}", name, self.local.name());
                    Err(HostboundError::not_found(name))
                }
            };
        }

        self.host
            .find_class(name)
            .ok_or_else(|| HostboundError::not_found(name))
    }

    /// Resolve every resource registered under `name`.
    ///
    /// Confined names search the boot graph followed by the local graph,
    /// deduplicated by origin, and fail with `NotFound` when nothing survives.
    /// Other names are delegated to the host as-is (an empty listing is not an
    /// error there). Provider discovery listings are then filtered.
    pub fn resolve_resources(&self, name: &str) -> Result<Vec<ArtifactHandle>> {
        if let Some(rule) = self.policy.matching_rule(name) {
            debug!(
                "Resource {} confined by host prefix {} ({})",
                name, rule.prefix, rule.form
            );

            let mut seen = HashSet::new();
            let combined: Vec<ArtifactHandle> = self
                .boot
                .find_resources(name)
                .into_iter()
                .chain(self.local.find_resources(name))
                .filter(|h| seen.insert(h.origin.clone()))
                .collect();

            let handles = self.exclusions.filter(name, combined);
            if handles.is_empty() {
                debug!("Confined resource {} not found", name);
                return Err(HostboundError::not_found(name));
            }
            return Ok(handles);
        }

        let handles = self.host.find_resources(name);
        Ok(self.exclusions.filter(name, handles))
    }
}
