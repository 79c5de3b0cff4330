//! Stored records and the shapes passed in and out of a collection.
//!
//! # Design
//! An entity is an opaque JSON object plus the `key` the store assigned to
//! it. The key lives in its own field rather than inside `fields` so a saved
//! entity can never be observed without one; serde flattens the two back
//! into a single object on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the field that carries an entity's identity.
pub const KEY_FIELD: &str = "key";

/// A record held by a collection. Always has a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub key: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity {
    /// Look up a user-supplied field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Input to `Collection::save`. Without a key the collection assigns one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// A document with no key, to be inserted as a new entity.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self::from_map(fields).without_key()
    }

    /// A document addressed at `key`; replaces the entity with that key.
    pub fn with_key(key: impl Into<String>, fields: Map<String, Value>) -> Self {
        let mut doc = Self::from_map(fields);
        doc.key = Some(key.into());
        doc
    }

    /// Split a raw JSON object into key and fields. A non-string `key` is
    /// discarded.
    pub fn from_map(mut fields: Map<String, Value>) -> Self {
        let key = match fields.remove(KEY_FIELD) {
            Some(Value::String(key)) => Some(key),
            _ => None,
        };
        Self { key, fields }
    }

    pub fn without_key(mut self) -> Self {
        self.key = None;
        self
    }
}

impl From<Entity> for Document {
    fn from(entity: Entity) -> Self {
        Self {
            key: Some(entity.key),
            fields: entity.fields,
        }
    }
}

/// Result of `Collection::find`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindResult {
    pub entities: Vec<Entity>,
}
