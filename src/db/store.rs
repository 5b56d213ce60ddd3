//! In-memory store shape and startup validation.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

/// A single record: field names mapped to JSON values. Every record in an
/// array collection carries a unique, non-empty string `id`; the identity
/// lifecycle enforces the invariant at the store boundary so consumers
/// never re-check it.
pub type Record = Map<String, Value>;

/// The whole dataset: collection names mapped to either an array of
/// records or, for the legacy singular form, one plain object. Key order
/// is insertion order and survives persistence round-trips.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Store {
    resources: Map<String, Value>,
}

impl Store {
    /// Validates and adopts a deserialized dataset.
    ///
    /// The shape rules are deliberately minimal: the root must be an
    /// object, and every top-level value must be an array of objects or a
    /// single object. Anything else is a fatal open-time error; the store
    /// refuses to serve rather than guess.
    pub fn from_value(value: Value) -> Result<Store> {
        let resources = match value {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::InvalidStore {
                    collection: "(root)".to_owned(),
                    reason: "store root must be a JSON object",
                })
            }
        };
        for (name, value) in &resources {
            match value {
                Value::Array(items) => {
                    if items.iter().any(|item| !item.is_object()) {
                        return Err(StoreError::InvalidStore {
                            collection: name.clone(),
                            reason: "array collections may only contain objects",
                        });
                    }
                }
                Value::Object(_) => {}
                _ => {
                    return Err(StoreError::InvalidStore {
                        collection: name.clone(),
                        reason: "collection must be an array of records or an object",
                    })
                }
            }
        }
        Ok(Store { resources })
    }

    /// The raw value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.resources.get(name)
    }

    /// The records of an array collection; `None` for singular resources
    /// and unknown names.
    pub fn records(&self, name: &str) -> Option<&Vec<Value>> {
        self.resources.get(name).and_then(Value::as_array)
    }

    /// Mutable access to an array collection's records.
    pub fn records_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        self.resources.get_mut(name).and_then(Value::as_array_mut)
    }

    /// A singular (object) resource; `None` for array collections and
    /// unknown names.
    pub fn singular(&self, name: &str) -> Option<&Record> {
        self.resources.get(name).and_then(Value::as_object)
    }

    /// Mutable access to a singular resource.
    pub fn singular_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.resources.get_mut(name).and_then(Value::as_object_mut)
    }

    /// Replaces the value stored under `name`.
    pub fn put(&mut self, name: &str, value: Value) {
        self.resources.insert(name.to_owned(), value);
    }

    /// Collection names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.resources.keys()
    }

    /// Iterates mutably over every array collection. Singular resources
    /// carry no foreign keys and are skipped.
    pub fn arrays_mut(&mut self) -> impl Iterator<Item = (&String, &mut Vec<Value>)> {
        self.resources
            .iter_mut()
            .filter_map(|(name, value)| value.as_array_mut().map(|items| (name, items)))
    }

    /// Serializes the current state for persistence.
    pub fn to_value(&self) -> Value {
        Value::Object(self.resources.clone())
    }
}
