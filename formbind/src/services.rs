//! Services handed to actions.

use crate::error::ConfigError;
use crate::registry::FormRegistry;
use crate::registry::RegisteredForm;

/// Collaborators available to every action.
#[derive(Debug, Clone, Default)]
pub struct Services {
    forms: Option<FormRegistry>,
}

impl Services {
    /// Services without a form registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Services backed by the given registry.
    pub fn with_forms(forms: FormRegistry) -> Self {
        Self { forms: Some(forms) }
    }

    /// The form registry, or [`ConfigError::MissingFormsService`].
    pub fn forms(&self) -> Result<&FormRegistry, ConfigError> {
        self.forms.as_ref().ok_or(ConfigError::MissingFormsService)
    }

    pub fn forms_mut(&mut self) -> Result<&mut FormRegistry, ConfigError> {
        self.forms.as_mut().ok_or(ConfigError::MissingFormsService)
    }

    pub fn set_forms(&mut self, forms: FormRegistry) {
        self.forms = Some(forms);
    }

    /// Look up a registered form by name.
    pub fn form(&self, name: &str) -> Result<&RegisteredForm, ConfigError> {
        self.forms()?.get(name)
    }
}
