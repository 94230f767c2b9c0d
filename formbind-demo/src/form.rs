//! The demo's form: two passwords that must match, a name that needs
//! pandas, and an age.

use formbind::connector::InputConnector;
use formbind::validator::{Validator, rules};
use formbind::{FieldSpec, FormDescriptor};
use serde_json::json;

pub const NAME: &str = "testform";

fn not_blank() -> Validator {
    rules::not_blank("Input should not be blank")
}

pub fn test_form() -> FormDescriptor {
    FormDescriptor::new()
        .field(
            "password1",
            FieldSpec::new(InputConnector::shared()).validators(vec![not_blank()]),
        )
        .field(
            "password2",
            FieldSpec::new(InputConnector::shared()).validators(vec![not_blank()]),
        )
        .field(
            "name",
            FieldSpec::new(InputConnector::shared()).validators(vec![
                not_blank(),
                rules::contains("panda", "There is not enough pandas in this input"),
            ]),
        )
        .field(
            "age",
            FieldSpec::new(InputConnector::shared())
                .options(json!({ "default": "0" }))
                .validators_with(|| vec![rules::greater_than(20, "Number should be higher than 20")]),
        )
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
