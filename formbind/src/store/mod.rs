//! Store collaborator.
//!
//! Forms never own their state. Everything they read and write lives in a
//! tree-shaped store addressed by [`StorePath`]s. The [`Store`] trait is the
//! seam a host application plugs its own state container into;
//! [`MemoryStore`] is a self-contained implementation over a JSON tree.

mod memory;

pub use memory::MemoryStore;

use serde_json::Map;
use serde_json::Value;

use crate::error::StoreError;
use crate::path::StorePath;

/// Tree-shaped state container.
pub trait Store {
    /// Read the value at `path`, if any.
    fn get(&self, path: &StorePath) -> Option<&Value>;

    /// Replace the value at `path`, creating intermediate objects as needed.
    fn set(&mut self, path: &StorePath, value: Value) -> Result<(), StoreError>;

    /// Shallow-merge `partial` into the object at `path`.
    ///
    /// A missing target is created as an empty object first.
    fn merge(&mut self, path: &StorePath, partial: Map<String, Value>) -> Result<(), StoreError>;
}
