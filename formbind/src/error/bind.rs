//! View binding errors

use super::ConfigError;
use crate::path::StorePath;

/// Error type for computing field props from store state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// Nothing is stored at the form's path.
    #[error("Can not find a form at path '{path}'")]
    MissingForm { path: StorePath },

    /// A required section (`fields` or `errors`) is missing under the form.
    #[error("Can not find stored value '{path}'")]
    MissingSection { path: StorePath },

    /// A connector reported a change that is not a JSON object.
    #[error("Change for field '{field}' must be an object. Received '{value}'")]
    NonObjectChange { field: String, value: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
