//! Converts a form descriptor and stored field values into data the
//! validation pipeline can run on.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::config::MissingFieldPolicy;
use crate::connector::Capability;
use crate::descriptor::CleanFn;
use crate::descriptor::FormDescriptor;
use crate::error::ConfigError;
use crate::path::StorePath;
use crate::validator::Validators;

/// One field ready for validation.
#[derive(Debug, Clone)]
pub struct FieldValidation {
    pub value: Value,
    pub validators: Validators,
}

/// Everything [`validate`](crate::pipeline::validate) needs for one form.
#[derive(Clone)]
pub struct ValidationData {
    pub fields: BTreeMap<String, FieldValidation>,
    pub store: StorePath,
    pub clean: CleanFn,
}

impl fmt::Debug for ValidationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationData")
            .field("fields", &self.fields)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Build validation data from a form and a snapshot of its stored `fields`.
///
/// `snapshot` must be the JSON object found at `<store_path>.fields`. Each
/// declared field's value is read through its connector's `from_store`
/// capability. Fields absent from the snapshot follow `policy`.
pub fn build_validation_data(
    form: &FormDescriptor,
    snapshot: &Value,
    store_path: &StorePath,
    policy: MissingFieldPolicy,
) -> Result<ValidationData, ConfigError> {
    let fields_path = store_path.child("fields");
    let Value::Object(stored) = snapshot else {
        return Err(ConfigError::InvalidStoreShape {
            path: fields_path,
            expected: "an object of field values",
        });
    };

    let mut fields = BTreeMap::new();
    for (name, spec) in form.fields() {
        let Some(data) = stored.get(name) else {
            match policy {
                MissingFieldPolicy::Fail => {
                    return Err(ConfigError::MissingStoredField {
                        field: name.to_string(),
                        path: fields_path,
                    });
                }
                MissingFieldPolicy::Skip => {
                    log::debug!("Skipping field '{}': nothing stored at '{}'", name, fields_path);
                    continue;
                }
            }
        };

        let reader = spec.connector.as_from_store().ok_or_else(|| {
            ConfigError::missing_capability(store_path.to_string(), name, Capability::FromStore)
        })?;

        fields.insert(
            name.to_string(),
            FieldValidation {
                value: reader.from_store(data),
                validators: spec.validators.clone(),
            },
        );
    }

    Ok(ValidationData {
        fields,
        store: store_path.clone(),
        clean: form.clean_fn(),
    })
}
