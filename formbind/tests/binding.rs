use formbind::binding::bind;
use std::sync::Arc;

use formbind::connector::{ChangeCallback, Connector, ConnectorProps, FromStore, InputConnector};
use formbind::error::{BindError, ConfigError};
use formbind::pipeline::validate;
use formbind::signal::{Controller, form_driver};
use formbind::store::{MemoryStore, Store};
use formbind::validator::rules;
use formbind::{FieldSpec, FormDescriptor, FormRegistry, MissingFieldPolicy, Services, StorePath};
use serde_json::{Value, json};

/// Passes raw UI values straight through as the stored value.
struct RawConnector;

impl Connector for RawConnector {
    fn name(&self) -> &str {
        "RawConnector"
    }

    fn props(&self, stored: &Value, on_change: ChangeCallback) -> ConnectorProps {
        ConnectorProps::new(stored.clone()).with_on_change(move |raw| on_change(raw))
    }

    fn as_from_store(&self) -> Option<&dyn FromStore> {
        Some(self)
    }
}

impl FromStore for RawConnector {
    fn from_store(&self, stored: &Value) -> Value {
        stored.clone()
    }
}

fn registry() -> FormRegistry {
    let mut registry = FormRegistry::new();
    let form = FormDescriptor::new()
        .field(
            "password1",
            FieldSpec::new(InputConnector::shared())
                .validators(vec![rules::not_blank("Input should not be blank")]),
        )
        .field("password2", InputConnector::shared());
    registry.register("test", form, ["testapp", "form"]).unwrap();
    registry
}

fn store() -> MemoryStore {
    MemoryStore::new(json!({
        "testapp": {
            "form": {
                "fields": {
                    "password1": { "value": "foo" },
                    "password2": { "value": "" }
                },
                "errors": { "password2": ["Input should not be blank"] },
                "isSubmitted": true
            }
        }
    }))
}

#[test]
fn test_bind_unknown_form() {
    assert_eq!(
        bind(&registry(), "nope").unwrap_err(),
        ConfigError::form_not_found("nope")
    );
}

#[test]
fn test_props_from_store() {
    let form = bind(&registry(), "test").unwrap();
    let props = form.props(&store()).unwrap();

    assert!(props.is_submitted);
    assert_eq!(props.fields["password1"].props.value, json!("foo"));
    assert!(props.fields["password1"].errors.is_empty());
    assert_eq!(
        props.fields["password2"].errors,
        vec![json!("Input should not be blank")]
    );
    assert_eq!(props.errors.len(), 1);
}

#[test]
fn test_props_skip_fields_without_stored_value() {
    let form = bind(&registry(), "test").unwrap();
    let store = MemoryStore::new(json!({
        "testapp": { "form": { "fields": { "password2": { "value": "" } }, "errors": {} } }
    }));

    let props = form.props(&store).unwrap();

    assert!(!props.is_submitted);
    assert_eq!(props.fields.len(), 1);
    assert!(props.fields.contains_key("password2"));
}

#[test]
fn test_props_report_missing_state() {
    let form = bind(&registry(), "test").unwrap();

    let err = form.props(&MemoryStore::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Can not find a form at path 'testapp.form'"
    );

    let store = MemoryStore::new(json!({ "testapp": { "form": { "fields": {} } } }));
    let err = form.props(&store).unwrap_err();
    assert_eq!(
        err,
        BindError::MissingSection {
            path: StorePath::from(["testapp", "form", "errors"])
        }
    );
}

#[test]
fn test_change_round_trips_through_signal() {
    let registry = registry();
    let form = bind(&registry, "test").unwrap();
    let mut controller = Controller::new(store(), Services::with_forms(registry));
    form_driver::register(&mut controller);

    let props = form.props(controller.store()).unwrap();
    props.fields["password2"].props.change(json!("bar"));

    for change in form.changes().drain() {
        let change = change.unwrap();
        assert_eq!(change.name, "password2");
        controller
            .run(form_driver::STATE_CHANGED, change.to_input())
            .unwrap();
    }

    assert_eq!(
        controller.store().get(&StorePath::from([
            "testapp", "form", "fields", "password2"
        ])),
        Some(&json!({ "value": "bar" }))
    );
    assert!(form.changes().drain().is_empty());
}

#[test]
fn test_validation_data_for_submit() {
    let form = bind(&registry(), "test").unwrap();
    let store = MemoryStore::new(json!({
        "testapp": {
            "form": {
                "fields": { "password1": { "value": "" }, "password2": { "value": "x" } },
                "errors": {}
            }
        }
    }));

    let data = form.validation_data(&store, MissingFieldPolicy::Fail).unwrap();
    let outcome = validate(&data);

    assert_eq!(outcome.store(), form.store_path());
    assert_eq!(
        outcome.errors()["password1"],
        vec![json!("Input should not be blank")]
    );
}

#[test]
fn test_non_object_change_is_rejected() {
    let mut registry = FormRegistry::new();
    let form = FormDescriptor::new().field("raw", FieldSpec::new(Arc::new(RawConnector)));
    registry.register("raw", form, ["raw"]).unwrap();
    let form = bind(&registry, "raw").unwrap();
    let store = MemoryStore::new(json!({ "raw": { "fields": { "raw": {} }, "errors": {} } }));

    let props = form.props(&store).unwrap();
    props.fields["raw"].props.change(json!("plain"));
    props.fields["raw"].props.change(json!({ "ok": true }));

    let changes = form.changes().drain();
    assert_eq!(changes.len(), 2);
    assert_eq!(
        changes[0],
        Err(BindError::NonObjectChange {
            field: "raw".into(),
            value: "\"plain\"".into()
        })
    );
    assert_eq!(changes[1].as_ref().unwrap().value, json!({ "ok": true }));
}
