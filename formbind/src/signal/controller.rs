use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

use crate::error::SignalError;
use crate::services::Services;
use crate::store::Store;

/// Signal input and action output.
pub type Payload = Map<String, Value>;

/// What an action produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Plain output for non-branching steps.
    Continue(Payload),
    /// Take the `success` path of a branching step.
    Success(Payload),
    /// Take the `error` path of a branching step.
    Error(Payload),
}

impl Output {
    pub fn none() -> Self {
        Self::Continue(Payload::new())
    }
}

/// Store and services available while a signal runs.
pub struct ActionContext<'a> {
    pub store: &'a mut dyn Store,
    pub services: &'a Services,
}

/// One unit of work in a signal.
pub trait Action: Send + Sync {
    /// Name used in errors and logs.
    fn name(&self) -> &str;

    fn run(&self, input: &Payload, cx: &mut ActionContext<'_>) -> Result<Output, SignalError>;
}

type ActionFn = dyn Fn(&Payload, &mut ActionContext<'_>) -> Result<Output, SignalError> + Send + Sync;

/// An action built from a closure.
#[derive(Clone)]
pub struct FnAction {
    name: String,
    run: Arc<ActionFn>,
}

impl FnAction {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&Payload, &mut ActionContext<'_>) -> Result<Output, SignalError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(run),
        }
    }
}

impl Action for FnAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, input: &Payload, cx: &mut ActionContext<'_>) -> Result<Output, SignalError> {
        (self.run)(input, cx)
    }
}

/// A step in a signal.
#[derive(Clone)]
pub enum Step {
    Action(Arc<dyn Action>),
    Branch {
        action: Arc<dyn Action>,
        success: Vec<Step>,
        error: Vec<Step>,
    },
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(action) => f.debug_tuple("Action").field(&action.name()).finish(),
            Self::Branch {
                action,
                success,
                error,
            } => f
                .debug_struct("Branch")
                .field("action", &action.name())
                .field("success", success)
                .field("error", error)
                .finish(),
        }
    }
}

/// Ordered chain of steps.
#[derive(Debug, Clone, Default)]
pub struct Signal {
    steps: Vec<Step>,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a non-branching action.
    pub fn then(mut self, action: impl Action + 'static) -> Self {
        self.steps.push(Step::Action(Arc::new(action)));
        self
    }

    /// Append a branching action with its success and error paths.
    pub fn branch(mut self, action: impl Action + 'static, success: Signal, error: Signal) -> Self {
        self.steps.push(Step::Branch {
            action: Arc::new(action),
            success: success.steps,
            error: error.steps,
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Owns the store and services and runs registered signals against them.
pub struct Controller<S: Store> {
    store: S,
    services: Services,
    signals: HashMap<String, Signal>,
}

impl<S: Store> Controller<S> {
    pub fn new(store: S, services: Services) -> Self {
        Self {
            store,
            services,
            signals: HashMap::new(),
        }
    }

    /// Register a signal, replacing any signal with the same name.
    pub fn signal(&mut self, name: impl Into<String>, signal: Signal) {
        let name = name.into();
        log::debug!("Registered signal '{}'", name);
        self.signals.insert(name, signal);
    }

    pub fn has_signal(&self, name: &str) -> bool {
        self.signals.contains_key(name)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    /// Run a signal. `input` must be a JSON object (or null for no input).
    ///
    /// Returns the payload accumulated over every step that ran.
    pub fn run(&mut self, name: &str, input: Value) -> Result<Payload, SignalError> {
        let signal = self
            .signals
            .get(name)
            .cloned()
            .ok_or_else(|| SignalError::UnknownSignal {
                name: name.to_string(),
            })?;

        let mut payload = match input {
            Value::Object(map) => map,
            Value::Null => Payload::new(),
            _ => {
                return Err(SignalError::NonObjectPayload {
                    name: name.to_string(),
                });
            }
        };

        log::debug!("Running signal '{}'", name);
        let mut cx = ActionContext {
            store: &mut self.store,
            services: &self.services,
        };
        run_steps(&signal.steps, &mut payload, &mut cx)?;
        Ok(payload)
    }
}

fn run_steps(
    steps: &[Step],
    payload: &mut Payload,
    cx: &mut ActionContext<'_>,
) -> Result<(), SignalError> {
    for step in steps {
        match step {
            Step::Action(action) => match action.run(payload, cx)? {
                Output::Continue(out) => payload.extend(out),
                Output::Success(_) | Output::Error(_) => {
                    return Err(SignalError::UnexpectedBranch {
                        action: action.name().to_string(),
                    });
                }
            },
            Step::Branch {
                action,
                success,
                error,
            } => match action.run(payload, cx)? {
                Output::Success(out) => {
                    payload.extend(out);
                    run_steps(success, payload, cx)?;
                }
                Output::Error(out) => {
                    payload.extend(out);
                    run_steps(error, payload, cx)?;
                }
                Output::Continue(_) => {
                    return Err(SignalError::MissingBranch {
                        action: action.name().to_string(),
                    });
                }
            },
        }
    }
    Ok(())
}
