//! Module visibility boundary between the shared host runtime and a hosted application.
//!
//! ```text
//!                 name
//!                  │
//!                  ▼
//!        ┌───────────────────┐   no match   ┌───────────────┐
//!        │   PrefixPolicy    │─────────────▶│ host resolver │
//!        └─────────┬─────────┘              └───────────────┘
//!                  │ match (confined)
//!                  ▼
//!        ┌───────────────────┐
//!        │ boot ∪ local only │──▶ NotFound if empty
//!        └─────────┬─────────┘
//!                  ▼
//!        ┌───────────────────────────┐
//!        │ ProviderExclusionFilter   │  (provider discovery names only)
//!        └───────────────────────────┘
//! ```
//!
//! A name reserved for the host can never be satisfied by the host's general
//! search path, and a hosted application cannot shadow it by shipping its own
//! artifact outside the confined graphs.

pub mod exclusion;
pub mod isolation;
pub mod policy;

pub use exclusion::{ProviderExclusionFilter, ProviderExclusionFilterBuilder};
pub use isolation::{LookupOutcome, ModuleIsolationBoundary};
pub use policy::{NameForm, PrefixPolicy, PrefixPolicyBuilder, RuleMatch};

/// Resource listing consulted when discovering service providers
pub const SERVICES_DIR: &str = "META-INF/services/";
