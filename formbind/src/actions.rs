//! Store-sync actions.
//!
//! Small state mutations used by field change events and by the validation
//! signal. None of these validate anything.

use serde_json::Map;
use serde_json::Value;

use crate::connector::Capability;
use crate::descriptor::FieldErrors;
use crate::descriptor::FormDescriptor;
use crate::error::ConfigError;
use crate::error::SignalError;
use crate::error::StoreError;
use crate::path::StorePath;
use crate::services::Services;
use crate::store::Store;

/// Write one field's stored value: `<path>.fields.<field> = value`.
pub fn set_field_value(
    store: &mut dyn Store,
    path: &StorePath,
    field: &str,
    value: Value,
) -> Result<(), StoreError> {
    store.set(&path.child("fields").child(field), value)
}

/// Replace `<path>.errors` with `errors`.
pub fn set_form_errors(
    store: &mut dyn Store,
    path: &StorePath,
    errors: &FieldErrors,
) -> Result<(), StoreError> {
    let errors = errors
        .iter()
        .map(|(field, payloads)| (field.clone(), Value::Array(payloads.clone())))
        .collect();
    store.set(&path.child("errors"), Value::Object(errors))
}

/// Replace `<path>.fields` with `fields`.
pub fn apply_field_defaults(
    store: &mut dyn Store,
    path: &StorePath,
    fields: Map<String, Value>,
) -> Result<(), StoreError> {
    store.set(&path.child("fields"), Value::Object(fields))
}

/// Default stored values for every field, from each connector's
/// `default_store_value` capability and the field options.
pub fn form_defaults(
    name: &str,
    form: &FormDescriptor,
) -> Result<Map<String, Value>, ConfigError> {
    let mut fields = Map::new();
    for (field, spec) in form.fields() {
        let defaults = spec.connector.as_default_store_value().ok_or_else(|| {
            ConfigError::missing_capability(name, field, Capability::DefaultStoreValue)
        })?;
        fields.insert(field.to_string(), defaults.default_store_value(&spec.options));
    }
    log::debug!("Computed store defaults for form \"{}\"", name);
    Ok(fields)
}

/// Convert raw UI values into stored values through each field's
/// connector `to_store` capability.
///
/// Only the given fields are converted; merge the result over
/// [`form_defaults`] to fill the rest.
pub fn convert_to_store(
    name: &str,
    form: &FormDescriptor,
    raw: Map<String, Value>,
) -> Result<Map<String, Value>, ConfigError> {
    let mut fields = Map::new();
    for (field, value) in raw {
        let spec = form.get_field(&field).ok_or_else(|| ConfigError::UnknownField {
            form: name.to_string(),
            field: field.clone(),
        })?;
        let writer = spec.connector.as_to_store().ok_or_else(|| {
            ConfigError::missing_capability(name, field.as_str(), Capability::ToStore)
        })?;
        let stored = writer.to_store(value, &spec.options);
        fields.insert(field, stored);
    }
    Ok(fields)
}

/// Replace a registered form's stored fields, resolving its path by name.
pub fn update_form_fields(
    services: &Services,
    store: &mut dyn Store,
    name: &str,
    fields: Map<String, Value>,
) -> Result<(), SignalError> {
    let registered = services.form(name)?;
    apply_field_defaults(store, &registered.store, fields)?;
    Ok(())
}
