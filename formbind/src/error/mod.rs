//! Error types

mod bind;
mod config;
mod signal;
mod store;

pub use bind::*;
pub use config::*;
pub use signal::*;
pub use store::*;
