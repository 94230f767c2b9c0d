//! Store access errors

use crate::path::StorePath;

/// Error type for reads and writes against the store tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A path segment walked into a value that is neither an object nor an array.
    #[error("Cannot descend into '{path}': value is not an object or array")]
    NotAContainer { path: StorePath },

    /// An index segment points past the end of an array.
    #[error("Index {index} is out of bounds at '{path}' (length {len})")]
    IndexOutOfBounds {
        path: StorePath,
        index: usize,
        len: usize,
    },

    /// A key segment was used on an array or an index segment on an object.
    #[error("Segment '{segment}' does not match the container at '{path}'")]
    SegmentMismatch { path: StorePath, segment: String },

    /// A merge target exists but is not an object.
    #[error("Cannot merge into '{path}': value is not an object")]
    NotAnObject { path: StorePath },
}
