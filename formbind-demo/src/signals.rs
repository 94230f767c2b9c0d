//! Signals wired the way an application would at startup.

use formbind::actions::convert_to_store;
use formbind::signal::actions::{
    GetFormDefaults, SetFormErrors, UpdateFormFields, ValidateForm, set_form,
};
use formbind::signal::{Controller, FnAction, Output, Payload, Signal, form_driver};
use formbind::store::Store;
use serde_json::{Map, Value, json};

use crate::form::NAME;

pub const MAIN_PAGE_OPENED: &str = "mainPageOpened";
pub const FORM_SUBMITTED: &str = "formSubmitted";

/// Overwrite some of the defaults with prefilled values.
fn setup_test_form() -> FnAction {
    FnAction::new("setup_test_form", |input, cx| {
        let registered = cx.services.form(NAME)?;
        let raw: Map<String, Value> = [
            ("password1", "foo"),
            ("password2", "bar"),
            ("name", "Hi!"),
            ("age", "28"),
        ]
        .into_iter()
        .map(|(field, value)| (field.to_string(), json!(value)))
        .collect();
        let converted = convert_to_store(NAME, &registered.form, raw)?;

        let mut fields = match input.get("fields") {
            Some(Value::Object(fields)) => fields.clone(),
            _ => Map::new(),
        };
        fields.extend(converted);

        let mut out = Payload::new();
        out.insert("fields".into(), Value::Object(fields));
        Ok(Output::Continue(out))
    })
}

/// Log the outcome of the validation branch.
fn report(label: &'static str) -> FnAction {
    FnAction::new(format!("report({})", label), move |input, _| {
        let errors = input.get("errors").cloned().unwrap_or(Value::Null);
        log::info!("Form submission took the {} path; errors: {}", label, errors);
        Ok(Output::none())
    })
}

pub fn register<S: Store>(controller: &mut Controller<S>) {
    form_driver::register(controller);

    controller.signal(
        MAIN_PAGE_OPENED,
        Signal::new()
            .then(set_form(NAME))
            .then(GetFormDefaults)
            .then(setup_test_form())
            .then(UpdateFormFields),
    );

    controller.signal(
        FORM_SUBMITTED,
        Signal::new().then(set_form(NAME)).branch(
            ValidateForm,
            Signal::new().then(report("success")),
            Signal::new().then(report("error")).then(SetFormErrors),
        ),
    );
}
