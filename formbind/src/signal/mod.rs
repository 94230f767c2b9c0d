//! Signals: named chains of actions run against the store.
//!
//! A signal is an ordered list of [`Step`]s. Each action receives the
//! accumulated input payload and an [`ActionContext`] with the store and
//! services. Payloads an action outputs are merged into the input of every
//! later step. Branching steps pick their `success` or `error` path from the
//! action's [`Output`].
//!
//! # Example
//!
//! ```
//! use formbind::signal::{actions, Controller, Signal};
//! use formbind::store::MemoryStore;
//! use formbind::Services;
//! use serde_json::json;
//!
//! let mut controller = Controller::new(MemoryStore::default(), Services::new());
//! controller.signal(
//!     "formDriver.stateChanged",
//!     Signal::new().then(actions::SetStateValue),
//! );
//! controller
//!     .run(
//!         "formDriver.stateChanged",
//!         json!({ "store": ["form"], "name": "password", "value": { "value": "hunter2" } }),
//!     )
//!     .unwrap();
//! assert_eq!(
//!     controller.store().root(),
//!     &json!({ "form": { "fields": { "password": { "value": "hunter2" } } } })
//! );
//! ```

pub mod actions;
mod controller;
pub mod form_driver;

pub use controller::{Action, ActionContext, Controller, FnAction, Output, Payload, Signal, Step};
