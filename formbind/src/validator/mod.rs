//! Field validators.
//!
//! A validator is a pure function from a field value to a
//! [`ValidationResult`]. Failures carry an opaque JSON payload so callers can
//! return plain messages or structured objects.
//!
//! # Example
//!
//! ```
//! use formbind::validator::{rules, Validator, ValidationResult};
//! use serde_json::json;
//!
//! let not_blank = rules::not_blank("Input should not be blank");
//! assert_eq!(not_blank.check(&json!("")), ValidationResult::fail("Input should not be blank"));
//! assert!(not_blank.check(&json!("hunter2")).is_pass());
//!
//! let structured = Validator::new(|_| ValidationResult::Fail(json!({ "message": "error" })));
//! assert!(structured.check(&json!(1)).is_fail());
//! ```

mod check;
mod result;
pub mod rules;

pub use check::{Validator, Validators};
pub use result::{ErrorPayload, ValidationResult};
