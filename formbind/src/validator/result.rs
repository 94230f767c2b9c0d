use serde_json::Value;

/// Caller-defined error payload. Never coerced to a string.
pub type ErrorPayload = Value;

/// Result of running one validator against one value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValidationResult {
    /// The value passed.
    #[default]
    Pass,
    /// The value failed with the given payload.
    Fail(ErrorPayload),
}

impl ValidationResult {
    /// Fail with a plain message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(Value::String(message.into()))
    }

    /// Pass when `ok`, otherwise fail with `message`.
    pub fn check(ok: bool, message: impl Into<String>) -> Self {
        if ok { Self::Pass } else { Self::fail(message) }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    /// The failure payload, if any.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Pass => None,
            Self::Fail(payload) => Some(payload),
        }
    }

    pub fn into_payload(self) -> Option<ErrorPayload> {
        match self {
            Self::Pass => None,
            Self::Fail(payload) => Some(payload),
        }
    }
}
