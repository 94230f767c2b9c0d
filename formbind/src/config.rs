//! Library configuration

use crate::connector::Capabilities;
use crate::connector::Capability;

/// What to do when a declared field has no value in the store snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Fail with [`ConfigError::MissingStoredField`](crate::error::ConfigError::MissingStoredField).
    #[default]
    Fail,
    /// Leave the field out of the validation data.
    Skip,
}

/// Configuration shared by the registry and the validation actions.
///
/// # Example
///
/// ```
/// use formbind::{FormsConfig, MissingFieldPolicy};
/// use formbind::connector::{Capabilities, Capability};
///
/// let config = FormsConfig::default()
///     .with_missing_field(MissingFieldPolicy::Skip)
///     .with_required_capabilities(Capabilities::all());
/// assert!(config.required_capabilities.contains(Capability::ToStore));
/// ```
#[derive(Debug, Clone)]
pub struct FormsConfig {
    /// Policy for declared fields absent from the store.
    ///
    /// Default: [`MissingFieldPolicy::Fail`]
    pub missing_field: MissingFieldPolicy,

    /// Capabilities every connector must provide to be registered.
    ///
    /// Default: `from_store`
    pub required_capabilities: Capabilities,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            missing_field: MissingFieldPolicy::Fail,
            required_capabilities: Capabilities::none().with(Capability::FromStore),
        }
    }
}

impl FormsConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the missing field policy.
    pub fn with_missing_field(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field = policy;
        self
    }

    /// Sets the capabilities checked at registration.
    pub fn with_required_capabilities(mut self, required: Capabilities) -> Self {
        self.required_capabilities = required;
        self
    }
}
