//! A named, in-memory set of entities.
//!
//! # Design
//! `Collection` is a cheap handle: clones share the same entries behind a
//! `tokio::sync::RwLock`, so every mutation on a collection is serialized.
//! Entries keep a monotonically increasing sequence number per key, which
//! makes enumeration order (first insertion wins) part of the contract
//! instead of an accident of the map type.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::entity::{Document, Entity, FindResult, KEY_FIELD};

#[derive(Debug, Default)]
struct Entries {
    next_seq: u64,
    by_seq: BTreeMap<u64, Entity>,
    seq_of: HashMap<String, u64>,
}

impl Entries {
    fn fresh_key(&self) -> String {
        loop {
            let key = Uuid::new_v4().to_string();
            if !self.seq_of.contains_key(&key) {
                return key;
            }
        }
    }

    fn upsert(&mut self, entity: Entity) -> bool {
        if let Some(seq) = self.seq_of.get(&entity.key) {
            self.by_seq.insert(*seq, entity);
            return true;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.seq_of.insert(entity.key.clone(), seq);
        self.by_seq.insert(seq, entity);
        false
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        let seq = self.seq_of.get(key)?;
        self.by_seq.get_mut(seq)
    }
}

/// Handle to a named collection. Obtain one through `Store::collection`.
#[derive(Debug, Clone)]
pub struct Collection {
    name: Arc<str>,
    entries: Arc<RwLock<Entries>>,
}

impl Collection {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            entries: Arc::new(RwLock::new(Entries::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or replace. A document without a key gets a fresh one; a
    /// document whose key already exists replaces that entity in place.
    pub async fn save(&self, doc: Document) -> Entity {
        let mut fields = doc.fields;
        fields.remove(KEY_FIELD);
        let mut entries = self.entries.write().await;
        let key = match doc.key {
            Some(key) => key,
            None => entries.fresh_key(),
        };
        let entity = Entity {
            key,
            fields,
        };
        let replaced = entries.upsert(entity.clone());
        debug!(collection = %self.name, key = %entity.key, replaced, "saved entity");
        entity
    }

    /// Every entity, in first-insertion order.
    pub async fn find(&self) -> FindResult {
        let entries = self.entries.read().await;
        let entities: Vec<Entity> = entries.by_seq.values().cloned().collect();
        trace!(collection = %self.name, count = entities.len(), "find");
        FindResult { entities }
    }

    pub async fn get(&self, key: &str) -> Option<Entity> {
        let entries = self.entries.read().await;
        let seq = entries.seq_of.get(key)?;
        entries.by_seq.get(seq).cloned()
    }

    /// Remove the entity with `key`. Returns whether one was removed; a
    /// missing key is not an error.
    pub async fn delete(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        let seq = entries.seq_of.remove(key);
        let removed = seq.and_then(|seq| entries.by_seq.remove(&seq)).is_some();
        debug!(collection = %self.name, %key, removed, "delete");
        removed
    }

    /// Replace all fields of an existing entity. `None` if `key` is absent.
    pub async fn replace(&self, key: &str, fields: Map<String, Value>) -> Option<Entity> {
        let mut entries = self.entries.write().await;
        let entity = entries.get_mut(key)?;
        entity.fields = Document::from_map(fields).fields;
        debug!(collection = %self.name, %key, "replaced entity");
        Some(entity.clone())
    }

    /// Overwrite the given fields of an existing entity, keeping the rest.
    /// `None` if `key` is absent.
    pub async fn merge(&self, key: &str, fields: Map<String, Value>) -> Option<Entity> {
        let mut entries = self.entries.write().await;
        let entity = entries.get_mut(key)?;
        for (field, value) in Document::from_map(fields).fields {
            entity.fields.insert(field, value);
        }
        debug!(collection = %self.name, %key, "merged entity");
        Some(entity.clone())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.by_seq.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn save_assigns_distinct_keys() {
        let c = Collection::new("TodoItem");
        let a = c.save(Document::new(fields(json!({"title": "a"})))).await;
        let b = c.save(Document::new(fields(json!({"title": "b"})))).await;
        assert_ne!(a.key, b.key);
        assert!(Uuid::parse_str(&a.key).is_ok());
        assert_eq!(c.len().await, 2);
    }

    #[tokio::test]
    async fn replace_keeps_position() {
        let c = Collection::new("TodoItem");
        let first = c.save(Document::new(fields(json!({"title": "first"})))).await;
        c.save(Document::new(fields(json!({"title": "second"})))).await;

        c.save(Document::with_key(first.key.clone(), fields(json!({"title": "first v2"}))))
            .await;

        let found = c.find().await.entities;
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].key, first.key);
        assert_eq!(found[0].get("title"), Some(&json!("first v2")));
    }

    #[tokio::test]
    async fn delete_then_reinsert_moves_to_end() {
        let c = Collection::new("TodoItem");
        let a = c.save(Document::with_key("a", Map::new())).await;
        c.save(Document::with_key("b", Map::new())).await;
        assert!(c.delete(&a.key).await);
        c.save(Document::with_key("a", Map::new())).await;

        let keys: Vec<String> = c.find().await.entities.into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn merge_and_replace_on_missing_key_return_none() {
        let c = Collection::new("TodoItem");
        assert!(c.merge("nope", Map::new()).await.is_none());
        assert!(c.replace("nope", Map::new()).await.is_none());
        assert!(c.is_empty().await);
    }

    #[tokio::test]
    async fn merge_ignores_key_field_in_patch() {
        let c = Collection::new("TodoItem");
        let saved = c.save(Document::new(fields(json!({"title": "t"})))).await;
        let merged = c
            .merge(&saved.key, fields(json!({"key": "hijack", "done": true})))
            .await
            .unwrap();
        assert_eq!(merged.key, saved.key);
        assert!(merged.fields.get("key").is_none());
        assert_eq!(merged.get("done"), Some(&json!(true)));
        assert!(c.get("hijack").await.is_none());
    }
}
