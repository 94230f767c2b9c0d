use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::result::ValidationResult;

type CheckFn = dyn Fn(&Value) -> ValidationResult + Send + Sync;
type FactoryFn = dyn Fn() -> Vec<Validator> + Send + Sync;

/// A single validation rule.
///
/// Cheap to clone; clones share the underlying closure.
#[derive(Clone)]
pub struct Validator {
    name: Arc<str>,
    check: Arc<CheckFn>,
}

impl Validator {
    /// Create a validator from a closure.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> ValidationResult + Send + Sync + 'static,
    {
        Self::named("custom", check)
    }

    /// Create a validator with a name shown in debug output.
    pub fn named<F>(name: impl Into<Arc<str>>, check: F) -> Self
    where
        F: Fn(&Value) -> ValidationResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Create a validator from a predicate and a failure message.
    pub fn rule<F>(name: impl Into<Arc<str>>, predicate: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        Self::named(name, move |v| ValidationResult::check(predicate(v), msg.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the validator.
    pub fn check(&self, value: &Value) -> ValidationResult {
        (self.check)(value)
    }

    /// Whether two handles share the same closure.
    pub fn ptr_eq(&self, other: &Validator) -> bool {
        Arc::ptr_eq(&self.check, &other.check)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name).finish()
    }
}

/// The validators of one field: a literal list, or a factory that builds the
/// list when validation runs.
#[derive(Clone)]
pub enum Validators {
    List(Vec<Validator>),
    Factory(Arc<FactoryFn>),
}

impl Validators {
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> Vec<Validator> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(factory))
    }

    /// The concrete list, calling the factory if deferred.
    pub fn resolve(&self) -> Vec<Validator> {
        match self {
            Self::List(list) => list.clone(),
            Self::Factory(factory) => factory(),
        }
    }
}

impl Default for Validators {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<Vec<Validator>> for Validators {
    fn from(list: Vec<Validator>) -> Self {
        Self::List(list)
    }
}

impl fmt::Debug for Validators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}
