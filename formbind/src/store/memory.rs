use serde_json::Map;
use serde_json::Value;

use super::Store;
use crate::error::StoreError;
use crate::path::PathSegment;
use crate::path::StorePath;

/// In-memory store over a `serde_json::Value` tree.
///
/// Tracks whether it has been written to since the last
/// [`clear_dirty`](Self::clear_dirty), so a view layer can decide when to
/// re-render.
///
/// # Example
///
/// ```
/// use formbind::store::{MemoryStore, Store};
/// use formbind::StorePath;
/// use serde_json::json;
///
/// let mut store = MemoryStore::new(json!({ "form": { "fields": {}, "errors": {} } }));
/// store.set(&StorePath::from(["form", "fields", "name"]), json!({ "value": "" })).unwrap();
/// assert!(store.is_dirty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    root: Value,
    dirty: bool,
}

impl MemoryStore {
    /// Create a store with the given initial tree.
    pub fn new(root: Value) -> Self {
        Self { root, dirty: false }
    }

    /// The whole tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Consume the store, returning the tree.
    pub fn into_inner(self) -> Value {
        self.root
    }

    /// Check if the store has been modified since last check
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Walk `path` without writing, failing where [`slot_mut`](Self::slot_mut)
    /// would. Returns the current target, `None` if it would be created.
    fn resolve(&self, path: &StorePath) -> Result<Option<&Value>, StoreError> {
        let mut current = Some(&self.root);
        let mut walked = StorePath::root();

        for segment in path.segments() {
            let container = current.filter(|value| !value.is_null());
            current = match (container, segment) {
                (None, PathSegment::Key(_)) => None,
                (Some(Value::Object(map)), PathSegment::Key(key)) => map.get(key),
                (Some(Value::Array(items)), PathSegment::Index(index)) => {
                    let item = items.get(*index).ok_or(StoreError::IndexOutOfBounds {
                        path: walked.clone(),
                        index: *index,
                        len: items.len(),
                    })?;
                    Some(item)
                }
                (None | Some(Value::Object(_)), PathSegment::Index(_))
                | (Some(Value::Array(_)), PathSegment::Key(_)) => {
                    return Err(StoreError::SegmentMismatch {
                        path: walked,
                        segment: segment.to_string(),
                    });
                }
                _ => return Err(StoreError::NotAContainer { path: walked }),
            };
            walked.push(segment.clone());
        }

        Ok(current)
    }

    /// Walk to `path`, creating empty objects for missing keys.
    ///
    /// Call [`resolve`](Self::resolve) first: a failure here leaves the
    /// containers created so far in the tree.
    fn slot_mut(&mut self, path: &StorePath) -> Result<&mut Value, StoreError> {
        let mut current = &mut self.root;
        let mut walked = StorePath::root();

        for segment in path.segments() {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            current = match (current, segment) {
                (Value::Object(map), PathSegment::Key(key)) => {
                    map.entry(key.clone()).or_insert(Value::Null)
                }
                (Value::Array(items), PathSegment::Index(index)) => {
                    let len = items.len();
                    items.get_mut(*index).ok_or(StoreError::IndexOutOfBounds {
                        path: walked.clone(),
                        index: *index,
                        len,
                    })?
                }
                (Value::Object(_), PathSegment::Index(_)) | (Value::Array(_), PathSegment::Key(_)) => {
                    return Err(StoreError::SegmentMismatch {
                        path: walked,
                        segment: segment.to_string(),
                    });
                }
                _ => return Err(StoreError::NotAContainer { path: walked }),
            };
            walked.push(segment.clone());
        }

        Ok(current)
    }
}

impl Store for MemoryStore {
    fn get(&self, path: &StorePath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.root, |current, segment| match (current, segment) {
                (Value::Object(map), PathSegment::Key(key)) => map.get(key),
                (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
                _ => None,
            })
    }

    fn set(&mut self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        log::trace!("store set '{}'", path);
        self.resolve(path)?;
        *self.slot_mut(path)? = value;
        self.dirty = true;
        Ok(())
    }

    fn merge(&mut self, path: &StorePath, partial: Map<String, Value>) -> Result<(), StoreError> {
        log::trace!("store merge '{}' ({} keys)", path, partial.len());
        let target = self.resolve(path)?;
        if target.is_some_and(|existing| !existing.is_object() && !existing.is_null()) {
            return Err(StoreError::NotAnObject { path: path.clone() });
        }
        let slot = self.slot_mut(path)?;
        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(target) = slot else {
            return Err(StoreError::NotAnObject { path: path.clone() });
        };
        target.extend(partial);
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_get_walks_objects_and_arrays() {
        let store = MemoryStore::new(json!({ "a": { "list": [ { "b": 1 } ] } }));
        let path = StorePath::from(["a", "list"]).child(0usize).child("b");
        assert_eq!(store.get(&path), Some(&json!(1)));
        assert_eq!(store.get(&StorePath::from(["a", "missing"])), None);
        assert_eq!(store.get(&StorePath::root()), Some(store.root()));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut store = MemoryStore::default();
        store
            .set(&StorePath::from(["form", "fields", "name"]), json!("x"))
            .unwrap();
        assert_eq!(store.root(), &json!({ "form": { "fields": { "name": "x" } } }));
        assert!(store.is_dirty());
        store.clear_dirty();
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut store = MemoryStore::new(json!({ "form": 3 }));
        let err = store
            .set(&StorePath::from(["form", "fields"]), json!({}))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::NotAContainer {
                path: StorePath::from(["form"])
            }
        );
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_set_index_out_of_bounds() {
        let mut store = MemoryStore::new(json!({ "list": [] }));
        let err = store
            .set(&StorePath::from(["list"]).child(1usize), json!(1))
            .unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfBounds { index: 1, len: 0, .. }));
    }

    #[test]
    fn test_failed_set_leaves_tree_unchanged() {
        let mut store = MemoryStore::new(json!({}));
        let path = StorePath::from(["form", "fields"]).child(0usize);
        let err = store.set(&path, json!(1)).unwrap_err();
        assert_eq!(
            err,
            StoreError::SegmentMismatch {
                path: StorePath::from(["form", "fields"]),
                segment: "0".to_string(),
            }
        );
        assert_eq!(store.root(), &json!({}));
        assert!(!store.is_dirty());

        let mut store = MemoryStore::new(json!({ "form": null, "list": [] }));
        let path = StorePath::from(["form", "list"]).child(1usize);
        assert!(store.set(&path, json!(1)).is_err());
        assert_eq!(store.root(), &json!({ "form": null, "list": [] }));
    }

    #[test]
    fn test_failed_merge_leaves_tree_unchanged() {
        let mut store = MemoryStore::new(json!({ "form": { "name": "x" } }));
        let err = store
            .merge(&StorePath::from(["form", "name", "deep"]), Map::new())
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::NotAContainer {
                path: StorePath::from(["form", "name"])
            }
        );
        assert_eq!(store.root(), &json!({ "form": { "name": "x" } }));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut store = MemoryStore::new(json!({
            "form": { "errors": { "a": ["x"] }, "isSubmitted": false, "fields": { "a": 1 } }
        }));
        let partial = json!({ "errors": {}, "isSubmitted": true });
        let Value::Object(partial) = partial else { unreachable!() };
        store.merge(&StorePath::from(["form"]), partial).unwrap();
        assert_eq!(
            store.root(),
            &json!({ "form": { "errors": {}, "isSubmitted": true, "fields": { "a": 1 } } })
        );
    }

    #[test]
    fn test_merge_into_scalar_fails() {
        let mut store = MemoryStore::new(json!({ "form": "nope" }));
        let err = store.merge(&StorePath::from(["form"]), Map::new()).unwrap_err();
        assert_eq!(
            err,
            StoreError::NotAnObject {
                path: StorePath::from(["form"])
            }
        );
    }
}
