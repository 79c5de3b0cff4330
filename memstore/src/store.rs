//! Root of the in-memory data model: named collections, created on demand.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::collection::Collection;

/// A set of named collections. Clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct Store {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collection called `name`, created empty on first access. Handles
    /// returned for the same name share state.
    pub async fn collection(&self, name: &str) -> Collection {
        if let Some(existing) = self.collections.read().await.get(name) {
            return existing.clone();
        }
        let mut collections = self.collections.write().await;
        collections
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(collection = %name, "creating collection");
                Collection::new(name)
            })
            .clone()
    }

    /// Names of every collection referenced so far, sorted.
    pub async fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Create a new, empty store.
pub fn create() -> Store {
    Store::new()
}
