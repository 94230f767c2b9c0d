//! Signal execution errors

use super::ConfigError;
use super::StoreError;

/// Error type for running signals on the controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// No signal is registered under the name.
    #[error("Signal '{name}' is not registered")]
    UnknownSignal { name: String },

    /// The action could not read its input.
    #[error("Action '{action}' received invalid input: {message}")]
    InvalidInput { action: String, message: String },

    /// A non-branching step answered with success or error.
    #[error("Action '{action}' branched but its step has no success/error paths")]
    UnexpectedBranch { action: String },

    /// A branching step answered without picking a path.
    #[error("Action '{action}' must output success or error")]
    MissingBranch { action: String },

    /// Signal payloads must be JSON objects.
    #[error("Payload for '{name}' must be an object")]
    NonObjectPayload { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SignalError {
    /// Creates an invalid input error.
    pub fn invalid_input(action: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            action: action.into(),
            message: message.to_string(),
        }
    }
}
