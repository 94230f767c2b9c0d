//! View binding: field props computed from store state.
//!
//! [`bind`] looks a form up once and returns a [`BoundForm`]. On each render
//! the view asks it for [`FormProps`]; field changes come back as
//! [`FieldChange`]s the view dispatches to the
//! [`formDriver.stateChanged`](crate::signal::form_driver::STATE_CHANGED) signal.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::config::MissingFieldPolicy;
use crate::connector::ChangeCallback;
use crate::connector::ConnectorProps;
use crate::descriptor::FieldErrors;
use crate::error::BindError;
use crate::error::ConfigError;
use crate::path::StorePath;
use crate::registry::FormRegistry;
use crate::registry::RegisteredForm;
use crate::store::Store;
use crate::validation::ValidationData;
use crate::validation::build_validation_data;

/// A new stored value for one field, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub store: StorePath,
    pub name: String,
    pub value: Value,
}

impl FieldChange {
    /// Signal input for `formDriver.stateChanged`.
    pub fn to_input(&self) -> Value {
        json!({ "store": self.store, "name": self.name, "value": self.value })
    }
}

/// Collects changes reported by connectors until the view drains them.
#[derive(Debug, Clone, Default)]
pub struct ChangeQueue {
    inner: Arc<Mutex<Vec<Result<FieldChange, BindError>>>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, change: Result<FieldChange, BindError>) {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.push(change);
    }

    /// Take every pending change in the order it was reported.
    pub fn drain(&self) -> Vec<Result<FieldChange, BindError>> {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *guard)
    }
}

/// Props for one field.
#[derive(Debug, Clone)]
pub struct FieldProps {
    pub props: ConnectorProps,
    pub errors: Vec<Value>,
}

/// Props for a whole form.
#[derive(Debug, Clone)]
pub struct FormProps {
    pub is_submitted: bool,
    pub fields: BTreeMap<String, FieldProps>,
    pub errors: FieldErrors,
}

/// A registered form bound to a change queue.
#[derive(Debug, Clone)]
pub struct BoundForm {
    name: String,
    entry: RegisteredForm,
    changes: ChangeQueue,
}

/// Look up `name` and bind it for rendering.
pub fn bind(registry: &FormRegistry, name: &str) -> Result<BoundForm, ConfigError> {
    let entry = registry.get(name)?.clone();
    Ok(BoundForm {
        name: name.to_string(),
        entry,
        changes: ChangeQueue::new(),
    })
}

impl BoundForm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store_path(&self) -> &StorePath {
        &self.entry.store
    }

    /// Queue receiving this form's field changes.
    pub fn changes(&self) -> &ChangeQueue {
        &self.changes
    }

    /// Compute field props from the current store state.
    ///
    /// Fields with nothing stored are left out.
    pub fn props(&self, store: &dyn Store) -> Result<FormProps, BindError> {
        let path = &self.entry.store;
        let form_state = store
            .get(path)
            .ok_or_else(|| BindError::MissingForm { path: path.clone() })?;
        let section = |key: &str| {
            form_state
                .get(key)
                .ok_or_else(|| BindError::MissingSection {
                    path: path.child(key),
                })
        };
        let stored_fields = section("fields")?;
        let stored_errors = section("errors")?;

        let errors: FieldErrors = serde_json::from_value(stored_errors.clone()).map_err(|_| {
            ConfigError::InvalidStoreShape {
                path: path.child("errors"),
                expected: "an object of error lists",
            }
        })?;

        let mut fields = BTreeMap::new();
        for (name, spec) in self.entry.form.fields() {
            let Some(stored) = stored_fields.get(name) else {
                continue;
            };
            let props = spec.connector.props(stored, self.done(name));
            fields.insert(
                name.to_string(),
                FieldProps {
                    props,
                    errors: errors.get(name).cloned().unwrap_or_default(),
                },
            );
        }

        Ok(FormProps {
            is_submitted: form_state
                .get("isSubmitted")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            fields,
            errors,
        })
    }

    /// Validation data for submitting the form in its current state.
    pub fn validation_data(
        &self,
        store: &dyn Store,
        policy: MissingFieldPolicy,
    ) -> Result<ValidationData, BindError> {
        let path = self.entry.store.child("fields");
        let snapshot = store
            .get(&path)
            .ok_or(BindError::MissingSection { path })?;
        Ok(build_validation_data(
            &self.entry.form,
            snapshot,
            &self.entry.store,
            policy,
        )?)
    }

    /// Change callback for one field. Non-object values are rejected.
    fn done(&self, field: &str) -> ChangeCallback {
        let queue = self.changes.clone();
        let store = self.entry.store.clone();
        let field = field.to_string();
        Arc::new(move |value: Value| {
            let change = if value.is_object() {
                Ok(FieldChange {
                    store: store.clone(),
                    name: field.clone(),
                    value,
                })
            } else {
                Err(BindError::NonObjectChange {
                    field: field.clone(),
                    value: value.to_string(),
                })
            };
            queue.push(change);
        })
    }
}
