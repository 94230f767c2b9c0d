//! Form state binding for unidirectional-dataflow stores.
//!
//! Forms are described declaratively ([`FormDescriptor`]): each field has a
//! [`Connector`](connector::Connector) adapting stored values to view props
//! and a list of [`Validator`](validator::Validator)s. Descriptors are
//! registered by name in a [`FormRegistry`] together with the path of their
//! state in the [`Store`](store::Store). On submit the
//! [pipeline](pipeline::validate) collects per-field errors, runs the form's
//! clean function and records the outcome on the form's state.

pub mod actions;
pub mod binding;
pub mod config;
pub mod connector;
pub mod descriptor;
pub mod error;
pub mod path;
pub mod pipeline;
pub mod registry;
pub mod services;
pub mod signal;
pub mod store;
pub mod validation;
pub mod validator;

pub use config::{FormsConfig, MissingFieldPolicy};
pub use descriptor::{CleanInput, FieldSpec, FormDescriptor};
pub use path::{PathSegment, StorePath};
pub use pipeline::Outcome;
pub use registry::{FormRegistry, RegisteredForm};
pub use services::Services;

pub mod prelude {
    pub use crate::actions::{apply_field_defaults, set_field_value, set_form_errors};
    pub use crate::binding::{BoundForm, FieldChange, FormProps, bind};
    pub use crate::config::{FormsConfig, MissingFieldPolicy};
    pub use crate::connector::{
        Capabilities, Capability, ChangeCallback, Connector, ConnectorProps, DefaultStoreValue,
        FromStore, InputConnector, SelectConnector, ToStore,
    };
    pub use crate::descriptor::{CleanInput, FieldErrors, FieldSpec, FieldValues, FormDescriptor};
    pub use crate::error::{BindError, ConfigError, SignalError, StoreError};
    pub use crate::path::{PathSegment, StorePath};
    pub use crate::pipeline::{Outcome, validate, validate_and_sync, validate_form};
    pub use crate::registry::{FormRegistry, RegisteredForm};
    pub use crate::services::Services;
    pub use crate::signal::{Controller, Output, Signal};
    pub use crate::store::{MemoryStore, Store};
    pub use crate::validation::{ValidationData, build_validation_data};
    pub use crate::validator::{ValidationResult, Validator, Validators, rules};
}
