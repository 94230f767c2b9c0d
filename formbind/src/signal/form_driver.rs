//! The signal views use to write field changes into the store.

use super::actions::SetStateValue;
use super::controller::{Controller, Signal};
use crate::store::Store;

/// Name of the field change signal.
pub const STATE_CHANGED: &str = "formDriver.stateChanged";

/// Register the field change signal on `controller`. Call once at startup.
pub fn register<S: Store>(controller: &mut Controller<S>) {
    controller.signal(STATE_CHANGED, Signal::new().then(SetStateValue));
}
