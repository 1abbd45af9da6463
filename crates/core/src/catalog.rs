//! Question catalog
//!
//! Registry of question id → `QuestionDefinition`, shared by every chat
//! session in the process. Registration is expected to happen in one bulk
//! load before traffic starts; reads are continuous. The registry is guarded
//! by a read-write lock and hands out `Arc` snapshots, so a reader always sees
//! a whole definition even if the id is re-registered concurrently.
//!
//! Iteration follows insertion order. Re-registering an id replaces its
//! definition but keeps its original position.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::question::{CatalogEntry, QuestionDefinition};

#[derive(Debug, Default)]
struct CatalogInner {
    /// Ids in first-registration order
    order: Vec<String>,
    definitions: HashMap<String, Arc<QuestionDefinition>>,
}

impl CatalogInner {
    fn insert(&mut self, id: String, definition: QuestionDefinition) {
        let definition = Arc::new(definition);
        if self.definitions.insert(id.clone(), definition).is_some() {
            tracing::debug!(question_id = %id, "Question re-registered, replacing definition");
        } else {
            self.order.push(id);
        }
    }
}

/// Registry of question definitions
#[derive(Debug, Default)]
pub struct Catalog {
    inner: RwLock<CatalogInner>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries; later duplicates win
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let catalog = Self::new();
        catalog.register_batch(entries);
        catalog
    }

    /// Insert or replace the definition for `id`
    ///
    /// The definition is not checked for consistency.
    pub fn register(&self, id: impl Into<String>, definition: QuestionDefinition) {
        self.inner.write().insert(id.into(), definition);
    }

    /// Register entries in order under a single write lock
    ///
    /// The iterator is drained before the lock is taken, so it may read the
    /// catalog itself.
    pub fn register_batch(&self, entries: impl IntoIterator<Item = CatalogEntry>) {
        let entries: Vec<CatalogEntry> = entries.into_iter().collect();
        let count = entries.len();

        let mut inner = self.inner.write();
        for entry in entries {
            inner.insert(entry.id, entry.definition);
        }
        tracing::debug!(count, total = inner.order.len(), "Registered question batch");
    }

    pub fn get(&self, id: &str) -> Option<Arc<QuestionDefinition>> {
        self.inner.read().definitions.get(id).cloned()
    }

    /// Like `get`, failing closed with `Error::UnknownQuestion`
    pub fn require(&self, id: &str) -> Result<Arc<QuestionDefinition>> {
        self.get(id)
            .ok_or_else(|| Error::UnknownQuestion(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().definitions.contains_key(id)
    }

    /// Questions of one category, in insertion order
    pub fn by_category(&self, category: &str) -> Vec<(String, Arc<QuestionDefinition>)> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| {
                inner
                    .definitions
                    .get(id)
                    .filter(|def| def.category == category)
                    .map(|def| (id.clone(), Arc::clone(def)))
            })
            .collect()
    }

    /// Every question, in insertion order
    pub fn entries(&self) -> Vec<(String, Arc<QuestionDefinition>)> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| {
                inner
                    .definitions
                    .get(id)
                    .map(|def| (id.clone(), Arc::clone(def)))
            })
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let inner = self.inner.read();
        let mut categories: Vec<String> = Vec::new();
        for id in &inner.order {
            if let Some(def) = inner.definitions.get(id) {
                if !categories.iter().any(|c| *c == def.category) {
                    categories.push(def.category.clone());
                }
            }
        }
        categories
    }

    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().order.is_empty()
    }
}
