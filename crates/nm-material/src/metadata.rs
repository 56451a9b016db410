//! Shared, aliasing view onto a material's metadata.
//!
//! Every handle obtained from the same material shares one storage slot.
//! `Material::set_metadata` allocates a new slot, so handles taken before the
//! replacement keep viewing the old value and stop seeing later changes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{MatResult, MaterialError};
use crate::material::Material;

#[derive(Clone)]
pub struct MetadataHandle {
    slot: Rc<RefCell<Value>>,
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn as_object_mut(value: &mut Value) -> MatResult<&mut Map<String, Value>> {
    let found = kind(value);
    value.as_object_mut().ok_or(MaterialError::TypeMismatch {
        expected: "object",
        found,
    })
}

impl MetadataHandle {
    pub(crate) fn new(value: Value) -> Self {
        Self {
            slot: Rc::new(RefCell::new(value)),
        }
    }

    /// Independent storage holding a copy of the current value.
    pub(crate) fn deep_copy(&self) -> Self {
        Self::new(self.snapshot())
    }

    /// Copy of the whole current value.
    pub fn snapshot(&self) -> Value {
        self.slot.borrow().clone()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.slot.borrow().get(key).cloned()
    }

    /// Value at a nested object path.
    pub fn get_path(&self, path: &[&str]) -> Option<Value> {
        let value = self.slot.borrow();
        let mut node = &*value;
        for key in path {
            node = node.get(key)?;
        }
        Some(node.clone())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slot.borrow().get(key).is_some()
    }

    /// Number of top-level entries (0 for a non-container value).
    pub fn len(&self) -> usize {
        match &*self.slot.borrow() {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a top-level key, returning the previous value.
    pub fn insert(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> MatResult<Option<Value>> {
        let mut root = self.slot.borrow_mut();
        Ok(as_object_mut(&mut root)?.insert(key.into(), value.into()))
    }

    pub fn remove(&self, key: &str) -> MatResult<Option<Value>> {
        let mut root = self.slot.borrow_mut();
        Ok(as_object_mut(&mut root)?.remove(key))
    }

    /// Append to the sequence under `key`, creating it when absent.
    pub fn push(&self, key: &str, value: impl Into<Value>) -> MatResult<()> {
        let mut root = self.slot.borrow_mut();
        let entry = as_object_mut(&mut root)?
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let found = kind(entry);
        match entry {
            Value::Array(items) => {
                items.push(value.into());
                Ok(())
            }
            _ => Err(MaterialError::TypeMismatch {
                expected: "array",
                found,
            }),
        }
    }

    /// Assign at a nested path, creating intermediate objects.
    ///
    /// An empty path overwrites the whole value in place, which every handle
    /// sharing this slot observes.
    pub fn set_path(&self, path: &[&str], value: impl Into<Value>) -> MatResult<()> {
        let mut root = self.slot.borrow_mut();
        let Some((last, parents)) = path.split_last() else {
            *root = value.into();
            return Ok(());
        };

        // Validate the whole path before writing so a failure changes nothing
        let mut probe = &*root;
        for key in parents {
            match probe.get(key) {
                Some(next) => probe = next,
                None => break,
            }
        }
        if !probe.is_object() {
            return Err(MaterialError::TypeMismatch {
                expected: "object",
                found: kind(probe),
            });
        }

        let mut node = as_object_mut(&mut root)?;
        for key in parents {
            let child = node
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            node = as_object_mut(child)?;
        }
        node.insert(last.to_string(), value.into());
        Ok(())
    }

    /// Read the value under a shared borrow.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from inside [`MetadataHandle::with_mut`]
    /// on a handle sharing the same slot.
    pub fn with<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&*self.slot.borrow())
    }

    /// Mutate the value in place under an exclusive borrow.
    ///
    /// # Panics
    ///
    /// Panics if another borrow of the same slot is active.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        f(&mut *self.slot.borrow_mut())
    }

    /// Whether both handles view the same storage slot.
    pub fn shares_storage(&self, other: &MetadataHandle) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    /// Whether this handle still views `material`'s current metadata.
    ///
    /// False once the material's metadata has been replaced.
    pub fn is_attached(&self, material: &Material) -> bool {
        self.shares_storage(&material.metadata)
    }
}

impl fmt::Debug for MetadataHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MetadataHandle")
            .field(&*self.slot.borrow())
            .finish()
    }
}

impl Default for MetadataHandle {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}
