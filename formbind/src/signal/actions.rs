//! Form actions for use in signals.
//!
//! ```text
//! mainPageOpened: [set_form("testform"), GetFormDefaults, UpdateFormFields]
//! formSubmitted:  [set_form("testform"), ValidateForm { success: [..], error: [SetFormErrors] }]
//! ```

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use super::controller::{Action, ActionContext, FnAction, Output, Payload};
use crate::actions;
use crate::descriptor::FieldErrors;
use crate::error::SignalError;
use crate::path::StorePath;
use crate::pipeline;

/// Deserialize an action's typed input from the signal payload.
fn read_input<T: DeserializeOwned>(action: &str, input: &Payload) -> Result<T, SignalError> {
    serde_json::from_value(Value::Object(input.clone()))
        .map_err(|e| SignalError::invalid_input(action, e))
}

fn single(key: &str, value: Value) -> Payload {
    let mut payload = Map::new();
    payload.insert(key.to_string(), value);
    payload
}

#[derive(Deserialize)]
struct NameInput {
    name: String,
}

#[derive(Deserialize)]
struct FieldsInput {
    name: String,
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct ErrorsInput {
    errors: FieldErrors,
    store: StorePath,
}

#[derive(Deserialize)]
struct StateValueInput {
    store: StorePath,
    name: String,
    value: Value,
}

/// Output `{ name }` so later actions know which form to work on.
pub fn set_form(name: impl Into<String>) -> FnAction {
    let name = name.into();
    FnAction::new(format!("set_form(\"{}\")", name), move |_, _| {
        Ok(Output::Continue(single("name", json!(name))))
    })
}

/// Input `{ name }`. Outputs `{ fields }` holding every connector's default
/// stored value.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetFormDefaults;

impl Action for GetFormDefaults {
    fn name(&self) -> &str {
        "get_form_defaults"
    }

    fn run(&self, input: &Payload, cx: &mut ActionContext<'_>) -> Result<Output, SignalError> {
        let NameInput { name } = read_input(self.name(), input)?;
        let registered = cx.services.form(&name)?;
        let fields = actions::form_defaults(&name, &registered.form)?;
        Ok(Output::Continue(single("fields", Value::Object(fields))))
    }
}

/// Input `{ name, fields }`. Replaces the form's stored fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateFormFields;

impl Action for UpdateFormFields {
    fn name(&self) -> &str {
        "update_form_fields"
    }

    fn run(&self, input: &Payload, cx: &mut ActionContext<'_>) -> Result<Output, SignalError> {
        let FieldsInput { name, fields } = read_input(self.name(), input)?;
        actions::update_form_fields(cx.services, cx.store, &name, fields)?;
        Ok(Output::none())
    }
}

/// Input `{ name }`. Validates the registered form and branches.
///
/// Both branches output `{ cleanData, errors, store }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateForm;

impl Action for ValidateForm {
    fn name(&self) -> &str {
        "validate_form"
    }

    fn run(&self, input: &Payload, cx: &mut ActionContext<'_>) -> Result<Output, SignalError> {
        let NameInput { name } = read_input(self.name(), input)?;
        let policy = cx.services.forms()?.config().missing_field;
        let outcome = pipeline::validate_form(cx.services, cx.store, &name, policy)?;
        let payload = outcome.to_payload();
        Ok(if outcome.is_success() {
            Output::Success(payload)
        } else {
            Output::Error(payload)
        })
    }
}

/// Input `{ errors, store }`. Replaces the form's error map.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetFormErrors;

impl Action for SetFormErrors {
    fn name(&self) -> &str {
        "set_form_errors"
    }

    fn run(&self, input: &Payload, cx: &mut ActionContext<'_>) -> Result<Output, SignalError> {
        let ErrorsInput { errors, store } = read_input(self.name(), input)?;
        actions::set_form_errors(cx.store, &store, &errors)?;
        Ok(Output::none())
    }
}

/// Input `{ store, name, value }`. Writes one field's stored value.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetStateValue;

impl Action for SetStateValue {
    fn name(&self) -> &str {
        "set_state_value"
    }

    fn run(&self, input: &Payload, cx: &mut ActionContext<'_>) -> Result<Output, SignalError> {
        let StateValueInput { store, name, value } = read_input(self.name(), input)?;
        actions::set_field_value(cx.store, &store, &name, value)?;
        Ok(Output::none())
    }
}
