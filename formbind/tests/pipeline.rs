use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use formbind::connector::InputConnector;
use formbind::error::{ConfigError, SignalError};
use formbind::pipeline::{validate, validate_and_sync, validate_form};
use formbind::store::{MemoryStore, Store};
use formbind::validation::build_validation_data;
use formbind::validator::{ValidationResult, Validator, rules};
use formbind::{
    FieldSpec, FormDescriptor, FormRegistry, MissingFieldPolicy, Outcome, Services, StorePath,
};
use serde_json::{Value, json};

fn failing(payload: Value) -> Validator {
    Validator::new(move |_| ValidationResult::Fail(payload.clone()))
}

fn passing() -> Validator {
    Validator::new(|_| ValidationResult::Pass)
}

fn login_form() -> FormDescriptor {
    FormDescriptor::new().field(
        "password",
        FieldSpec::new(InputConnector::shared())
            .validators(vec![rules::not_blank("Input should not be blank")]),
    )
}

fn password_pair_form() -> FormDescriptor {
    let not_blank = || {
        FieldSpec::new(InputConnector::shared())
            .validators(vec![rules::not_blank("Input should not be blank")])
    };
    FormDescriptor::new()
        .field("password1", not_blank())
        .field("password2", not_blank())
        .clean(|mut data| {
            if data.fields.get("password1") != data.fields.get("password2") {
                data.errors.insert(
                    "password1".into(),
                    vec![json!("Password1 must match password2")],
                );
            }
            data
        })
}

fn services_with(name: &str, form: FormDescriptor, path: &[&str]) -> Services {
    let mut registry = FormRegistry::new();
    registry
        .register(name, form, path.iter().copied().collect::<StorePath>())
        .unwrap();
    Services::with_forms(registry)
}

fn data_for(form: &FormDescriptor, fields: Value) -> formbind::validation::ValidationData {
    build_validation_data(form, &fields, &StorePath::from(["form"]), MissingFieldPolicy::Fail)
        .unwrap()
}

#[test]
fn test_no_validators_is_clean() {
    let form = FormDescriptor::new().field("password", InputConnector::shared());
    let outcome = validate(&data_for(&form, json!({ "password": { "value": "" } })));
    assert_eq!(
        outcome,
        Outcome::Success {
            clean_data: [("password".to_string(), json!(""))].into(),
            store: StorePath::from(["form"]),
        }
    );
}

#[test]
fn test_passing_validators_succeed() {
    let form = FormDescriptor::new().field(
        "password",
        FieldSpec::new(InputConnector::shared()).validators(vec![passing(), passing()]),
    );
    let outcome = validate(&data_for(&form, json!({ "password": { "value": "hunter2" } })));
    assert!(outcome.is_success());
}

#[test]
fn test_validator_factory_is_resolved() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let form = FormDescriptor::new().field(
        "password",
        FieldSpec::new(InputConnector::shared()).validators_with(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![failing(json!("from factory"))]
        }),
    );

    let outcome = validate(&data_for(&form, json!({ "password": { "value": "x" } })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.errors()["password"], vec![json!("from factory")]);
}

#[test]
fn test_failures_keep_order_duplicates_and_type() {
    let form = FormDescriptor::new().field(
        "password",
        FieldSpec::new(InputConnector::shared()).validators(vec![
            failing(json!("first")),
            passing(),
            failing(json!({ "message": "error", "code": 7 })),
            failing(json!("first")),
        ]),
    );

    let outcome = validate(&data_for(&form, json!({ "password": { "value": "hunter2" } })));
    match outcome {
        Outcome::Error { errors, store, .. } => {
            assert_eq!(store, StorePath::from(["form"]));
            assert_eq!(
                errors["password"],
                vec![
                    json!("first"),
                    json!({ "message": "error", "code": 7 }),
                    json!("first")
                ]
            );
        }
        Outcome::Success { .. } => panic!("expected an error outcome"),
    }
}

#[test]
fn test_failing_field_excluded_from_clean_data() {
    let form = FormDescriptor::new()
        .field(
            "bad",
            FieldSpec::new(InputConnector::shared())
                .validators(vec![passing(), failing(json!("nope"))]),
        )
        .field("good", InputConnector::shared())
        .clean(|data| {
            assert!(!data.fields.contains_key("bad"));
            assert_eq!(data.fields.get("good"), Some(&json!("ok")));
            assert_eq!(data.errors["bad"], vec![json!("nope")]);
            data
        });

    let outcome = validate(&data_for(
        &form,
        json!({ "bad": { "value": "x" }, "good": { "value": "ok" } }),
    ));
    assert!(outcome.is_error());
    assert_eq!(outcome.clean_data().len(), 1);
    assert_eq!(outcome.clean_data().get("good"), Some(&json!("ok")));
    assert_eq!(outcome.to_payload()["cleanData"], json!({ "good": "ok" }));
}

#[test]
fn test_clean_keys_override_pipeline_keys() {
    let form = FormDescriptor::new()
        .field(
            "a",
            FieldSpec::new(InputConnector::shared()).validators(vec![failing(json!("field"))]),
        )
        .field("b", InputConnector::shared())
        .clean(|_| {
            let mut out = formbind::CleanInput::default();
            out.errors.insert("a".into(), vec![json!("from clean")]);
            out.fields.insert("b".into(), json!("rewritten"));
            out
        });

    let data = data_for(&form, json!({ "a": { "value": 1 }, "b": { "value": 2 } }));
    assert_eq!(validate(&data).errors()["a"], vec![json!("from clean")]);

    // Clean can rewrite clean values; dropping keys in its return does not remove them.
    let form = FormDescriptor::new()
        .field("b", InputConnector::shared())
        .field("c", InputConnector::shared())
        .clean(|_| {
            let mut out = formbind::CleanInput::default();
            out.fields.insert("b".into(), json!("rewritten"));
            out
        });
    let data = data_for(&form, json!({ "b": { "value": 2 }, "c": { "value": 3 } }));
    match validate(&data) {
        Outcome::Success { clean_data, .. } => {
            assert_eq!(clean_data["b"], json!("rewritten"));
            assert_eq!(clean_data["c"], json!(3));
        }
        Outcome::Error { .. } => panic!("expected success"),
    }
}

#[test]
fn test_clean_runs_even_with_field_errors() {
    let ran = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&ran);
    let form = FormDescriptor::new()
        .field(
            "a",
            FieldSpec::new(InputConnector::shared()).validators(vec![failing(json!("x"))]),
        )
        .clean(move |data| {
            seen.fetch_add(1, Ordering::SeqCst);
            data
        });
    let outcome = validate(&data_for(&form, json!({ "a": { "value": 1 } })));
    assert!(outcome.is_error());
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clean_can_clear_errors() {
    let form = FormDescriptor::new()
        .field(
            "a",
            FieldSpec::new(InputConnector::shared()).validators(vec![failing(json!("x"))]),
        )
        .clean(|mut data| {
            data.errors.clear();
            data
        });
    // Shallow merge keeps pipeline-derived keys the clean function dropped.
    let outcome = validate(&data_for(&form, json!({ "a": { "value": 1 } })));
    assert!(outcome.is_error());
}

#[test]
fn test_validate_is_idempotent() {
    let form = password_pair_form();
    let data = data_for(
        &form,
        json!({ "password1": { "value": "a" }, "password2": { "value": "b" } }),
    );
    assert_eq!(validate(&data), validate(&data));
}

#[test]
fn test_login_blank_password_errors_and_marks_store() {
    let services = services_with("login", login_form(), &["login"]);
    let mut store = MemoryStore::new(json!({
        "login": { "fields": { "password": { "value": "" } }, "errors": {} }
    }));

    let outcome = validate_form(&services, &mut store, "login", MissingFieldPolicy::Fail).unwrap();

    assert!(outcome.is_error());
    assert_eq!(outcome.errors()["password"].len(), 1);
    let form = store.get(&StorePath::from(["login"])).unwrap();
    assert_eq!(form["hasErrors"], json!(true));
    assert_eq!(form["isSubmitted"], json!(true));
    assert_eq!(
        form["errors"],
        json!({ "password": ["Input should not be blank"] })
    );
}

#[test]
fn test_login_valid_password_succeeds_and_resets_errors() {
    let services = services_with("login", login_form(), &["login"]);
    let mut store = MemoryStore::new(json!({
        "login": {
            "fields": { "password": { "value": "hunter2" } },
            "errors": { "password": ["old"] }
        }
    }));

    let outcome = validate_form(&services, &mut store, "login", MissingFieldPolicy::Fail).unwrap();

    match &outcome {
        Outcome::Success { clean_data, store } => {
            assert_eq!(clean_data["password"], json!("hunter2"));
            assert_eq!(store, &StorePath::from(["login"]));
        }
        Outcome::Error { .. } => panic!("expected success"),
    }
    let form = store.get(&StorePath::from(["login"])).unwrap();
    assert_eq!(form["errors"], json!({}));
    assert_eq!(form["hasErrors"], json!(false));
    assert_eq!(form["isSubmitted"], json!(true));
}

#[test]
fn test_clean_introduces_cross_field_error() {
    let services = services_with("signup", password_pair_form(), &["signup"]);
    let mut store = MemoryStore::new(json!({
        "signup": {
            "fields": {
                "password1": { "value": "foo" },
                "password2": { "value": "bar" }
            },
            "errors": {}
        }
    }));

    let outcome =
        validate_form(&services, &mut store, "signup", MissingFieldPolicy::Fail).unwrap();

    let errors = outcome.errors();
    assert_eq!(
        errors["password1"],
        vec![json!("Password1 must match password2")]
    );
    assert!(!errors.contains_key("password2"));
    assert_eq!(
        store.get(&StorePath::from(["signup", "hasErrors"])),
        Some(&json!(true))
    );
}

#[test]
fn test_validate_and_sync_reports_store_errors() {
    let form = login_form();
    let data = build_validation_data(
        &form,
        &json!({ "password": { "value": "x" } }),
        &StorePath::from(["form"]),
        MissingFieldPolicy::Fail,
    )
    .unwrap();
    let mut store = MemoryStore::new(json!({ "form": "not an object" }));
    assert!(validate_and_sync(&mut store, &data).is_err());
}

#[test]
fn test_validate_form_requires_forms_service() {
    let mut store = MemoryStore::default();
    let err = validate_form(&Services::new(), &mut store, "login", MissingFieldPolicy::Fail)
        .unwrap_err();
    assert_eq!(err, SignalError::Config(ConfigError::MissingFormsService));
}

#[test]
fn test_validate_form_unknown_name() {
    let services = services_with("login", login_form(), &["login"]);
    let mut store = MemoryStore::default();
    let err = validate_form(&services, &mut store, "other", MissingFieldPolicy::Fail).unwrap_err();
    assert_eq!(err, SignalError::Config(ConfigError::form_not_found("other")));
}

#[test]
fn test_outcome_payload_shape() {
    let outcome = Outcome::Error {
        clean_data: [("name".to_string(), json!("Red panda"))].into(),
        errors: [("password".to_string(), vec![json!({ "message": "error" })])].into(),
        store: StorePath::from(["testform"]),
    };
    assert_eq!(
        Value::Object(outcome.to_payload()),
        json!({
            "cleanData": { "name": "Red panda" },
            "errors": { "password": [{ "message": "error" }] },
            "store": ["testform"]
        })
    );
}
