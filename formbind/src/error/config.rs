//! Configuration errors.
//!
//! These are programmer mistakes (a form that was never registered, a
//! connector lacking a capability, a store that does not match the
//! descriptor). They are always surfaced immediately.

use crate::connector::Capability;
use crate::path::StorePath;

/// A field whose connector lacks one or more required capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCapability {
    /// Field name as declared in the descriptor.
    pub field: String,
    /// Capabilities the field's connector does not provide.
    pub missing: Vec<Capability>,
}

impl std::fmt::Display for MissingCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.missing.iter().map(|c| c.name()).collect();
        write!(f, "'{}' needs {}", self.field, names.join(", "))
    }
}

fn list_missing(fields: &[MissingCapability]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error type for form setup and lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No form is registered under the given name.
    #[error("Could not find form registered as \"{name}\"")]
    FormNotFound { name: String },

    /// The form name is empty or contains an empty dotted segment.
    #[error("Invalid form name \"{name}\": names are dot separated and segments must not be empty")]
    InvalidFormName { name: String },

    /// Actions were run without a form registry in their services.
    #[error(
        "Could not find registered forms in services. When creating the controller, pass the form registry as a service"
    )]
    MissingFormsService,

    /// One or more connectors lack capabilities the operation requires.
    #[error("Connectors of form \"{form}\" are missing capabilities: {}", list_missing(.fields))]
    MissingCapabilities {
        form: String,
        fields: Vec<MissingCapability>,
    },

    /// A declared field has no stored value.
    #[error("Field '{field}' is declared by the form but missing from the store at '{path}'")]
    MissingStoredField { field: String, path: StorePath },

    /// A value was supplied for a field the form does not declare.
    #[error("Form \"{form}\" has no field named '{field}'")]
    UnknownField { form: String, field: String },

    /// The store does not hold the expected shape at a path.
    #[error("Expected {expected} at '{path}'")]
    InvalidStoreShape {
        path: StorePath,
        expected: &'static str,
    },
}

impl ConfigError {
    /// Creates a form-not-found error.
    pub fn form_not_found(name: impl Into<String>) -> Self {
        Self::FormNotFound { name: name.into() }
    }

    /// Creates a missing-capabilities error for a single field.
    pub fn missing_capability(
        form: impl Into<String>,
        field: impl Into<String>,
        capability: Capability,
    ) -> Self {
        Self::MissingCapabilities {
            form: form.into(),
            fields: vec![MissingCapability {
                field: field.into(),
                missing: vec![capability],
            }],
        }
    }
}
