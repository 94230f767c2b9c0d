//! Declarative form descriptions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::connector::Capabilities;
use crate::connector::Connector;
use crate::error::MissingCapability;
use crate::validator::ErrorPayload;
use crate::validator::Validator;
use crate::validator::Validators;

/// Clean values keyed by field name.
pub type FieldValues = BTreeMap<String, Value>;

/// Error payloads keyed by field name, in the order validators produced them.
pub type FieldErrors = BTreeMap<String, Vec<ErrorPayload>>;

/// Input and output of a form's clean function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanInput {
    pub fields: FieldValues,
    pub errors: FieldErrors,
}

/// Whole-form hook run after per-field validation.
pub type CleanFn = Arc<dyn Fn(CleanInput) -> CleanInput + Send + Sync>;

/// The clean function used when a form declares none.
pub fn identity_clean() -> CleanFn {
    Arc::new(|data: CleanInput| data)
}

/// How one field is connected and validated.
#[derive(Clone)]
pub struct FieldSpec {
    pub connector: Arc<dyn Connector>,
    pub validators: Validators,
    /// Free-form options handed to connector capabilities.
    pub options: Value,
}

impl FieldSpec {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            validators: Validators::default(),
            options: Value::Object(Map::new()),
        }
    }

    /// Set a literal validator list.
    pub fn validators(mut self, validators: Vec<Validator>) -> Self {
        self.validators = Validators::List(validators);
        self
    }

    /// Defer building the validator list until validation runs.
    pub fn validators_with<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Vec<Validator> + Send + Sync + 'static,
    {
        self.validators = Validators::factory(factory);
        self
    }

    pub fn options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }
}

impl From<Arc<dyn Connector>> for FieldSpec {
    fn from(connector: Arc<dyn Connector>) -> Self {
        Self::new(connector)
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("connector", &self.connector.name())
            .field("validators", &self.validators)
            .field("options", &self.options)
            .finish()
    }
}

/// Describes one form: its fields in declaration order and an optional
/// clean function.
///
/// # Example
///
/// ```
/// use formbind::connector::InputConnector;
/// use formbind::validator::rules;
/// use formbind::{FieldSpec, FormDescriptor};
///
/// let form = FormDescriptor::new()
///     .field(
///         "password1",
///         FieldSpec::new(InputConnector::shared()).validators(vec![rules::not_blank("Required")]),
///     )
///     .field("password2", InputConnector::shared())
///     .clean(|mut data| {
///         if data.fields.get("password1") != data.fields.get("password2") {
///             data.errors.insert(
///                 "password1".into(),
///                 vec!["Password1 must match password2".into()],
///             );
///         }
///         data
///     });
/// assert_eq!(form.field_names().collect::<Vec<_>>(), ["password1", "password2"]);
/// ```
#[derive(Clone, Default)]
pub struct FormDescriptor {
    fields: Vec<(String, FieldSpec)>,
    clean: Option<CleanFn>,
}

impl FormDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Re-declaring a name replaces the earlier spec in place.
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> Self {
        let name = name.into();
        let spec = spec.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = spec,
            None => self.fields.push((name, spec)),
        }
        self
    }

    /// Set the clean function.
    pub fn clean<F>(mut self, clean: F) -> Self
    where
        F: Fn(CleanInput) -> CleanInput + Send + Sync + 'static,
    {
        self.clean = Some(Arc::new(clean));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    pub fn has_clean(&self) -> bool {
        self.clean.is_some()
    }

    /// The clean function, or identity when none was declared.
    pub fn clean_fn(&self) -> CleanFn {
        self.clean.clone().unwrap_or_else(identity_clean)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields whose connector lacks any of `required`, in declaration order.
    pub fn missing_capabilities(&self, required: &Capabilities) -> Vec<MissingCapability> {
        self.fields()
            .filter_map(|(name, spec)| {
                let missing = required.missing_from(&spec.connector.capabilities());
                (!missing.is_empty()).then(|| MissingCapability {
                    field: name.to_string(),
                    missing,
                })
            })
            .collect()
    }
}

impl fmt::Debug for FormDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormDescriptor")
            .field("fields", &self.fields)
            .field("clean", &self.clean.is_some())
            .finish()
    }
}
