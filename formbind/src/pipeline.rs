//! Validate-and-clean pipeline.
//!
//! Runs every field's validators, hands the result to the form's clean
//! function, and decides between [`Outcome::Success`] and
//! [`Outcome::Error`]. Failed validators are data, not faults: nothing here
//! returns an error because a value is invalid.

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::config::MissingFieldPolicy;
use crate::descriptor::CleanInput;
use crate::descriptor::FieldErrors;
use crate::descriptor::FieldValues;
use crate::error::ConfigError;
use crate::error::SignalError;
use crate::error::StoreError;
use crate::path::StorePath;
use crate::services::Services;
use crate::store::Store;
use crate::validation::ValidationData;
use crate::validation::build_validation_data;

/// Result of validating a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    Success {
        #[serde(rename = "cleanData")]
        clean_data: FieldValues,
        store: StorePath,
    },
    /// `clean_data` holds the fields that passed.
    Error {
        #[serde(rename = "cleanData")]
        clean_data: FieldValues,
        errors: FieldErrors,
        store: StorePath,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    pub fn store(&self) -> &StorePath {
        match self {
            Self::Success { store, .. } | Self::Error { store, .. } => store,
        }
    }

    /// Values of the fields that passed, including on `Error`.
    pub fn clean_data(&self) -> &FieldValues {
        match self {
            Self::Success { clean_data, .. } | Self::Error { clean_data, .. } => clean_data,
        }
    }

    /// Errors of an `Error` outcome; empty on success.
    pub fn errors(&self) -> FieldErrors {
        match self {
            Self::Success { .. } => FieldErrors::new(),
            Self::Error { errors, .. } => errors.clone(),
        }
    }

    /// The store fields this outcome merges into the form's state.
    pub fn store_patch(&self) -> Map<String, Value> {
        let (errors, has_errors) = match self {
            Self::Success { .. } => (json!({}), false),
            Self::Error { errors, .. } => (json!(errors), true),
        };
        let mut patch = Map::new();
        patch.insert("errors".to_string(), errors);
        patch.insert("isSubmitted".to_string(), Value::Bool(true));
        patch.insert("hasErrors".to_string(), Value::Bool(has_errors));
        patch
    }

    /// Signal payload: `{ cleanData, errors, store }`.
    pub fn to_payload(&self) -> Map<String, Value> {
        let errors = match self {
            Self::Success { .. } => json!({}),
            Self::Error { errors, .. } => json!(errors),
        };
        let mut payload = Map::new();
        payload.insert("cleanData".to_string(), json!(self.clean_data()));
        payload.insert("errors".to_string(), errors);
        payload.insert("store".to_string(), json!(self.store()));
        payload
    }
}

/// Validate a form without touching the store.
pub fn validate(data: &ValidationData) -> Outcome {
    let mut clean_data = FieldValues::new();
    let mut errors = FieldErrors::new();

    for (name, field) in &data.fields {
        let failures: Vec<Value> = field
            .validators
            .resolve()
            .iter()
            .filter_map(|validator| validator.check(&field.value).into_payload())
            .collect();

        if failures.is_empty() {
            clean_data.insert(name.clone(), field.value.clone());
        } else {
            errors.insert(name.clone(), failures);
        }
    }

    let cleaned = (data.clean)(CleanInput {
        fields: clean_data.clone(),
        errors: errors.clone(),
    });
    clean_data.extend(cleaned.fields);
    errors.extend(cleaned.errors);

    if errors.is_empty() {
        log::debug!("Form at '{}' is valid", data.store);
        Outcome::Success {
            clean_data,
            store: data.store.clone(),
        }
    } else {
        log::debug!(
            "Form at '{}' has errors in {} field(s)",
            data.store,
            errors.len()
        );
        Outcome::Error {
            clean_data,
            errors,
            store: data.store.clone(),
        }
    }
}

/// Validate a form and record the result on its store state.
pub fn validate_and_sync(
    store: &mut dyn Store,
    data: &ValidationData,
) -> Result<Outcome, StoreError> {
    let outcome = validate(data);
    store.merge(&data.store, outcome.store_patch())?;
    Ok(outcome)
}

/// Validate a registered form against the values currently in the store.
pub fn validate_form(
    services: &Services,
    store: &mut dyn Store,
    name: &str,
    policy: MissingFieldPolicy,
) -> Result<Outcome, SignalError> {
    let registered = services.form(name)?;
    let fields_path = registered.store.child("fields");
    let snapshot = store
        .get(&fields_path)
        .cloned()
        .ok_or(ConfigError::InvalidStoreShape {
            path: fields_path,
            expected: "an object of field values",
        })?;

    let data = build_validation_data(&registered.form, &snapshot, &registered.store, policy)?;
    Ok(validate_and_sync(store, &data)?)
}
