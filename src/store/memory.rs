//! In-memory document store for testing and development

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::error::{Error, Result};
use crate::store::{Document, DocumentStore};

/// In-memory store. Data is lost on restart; not a production backend.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    /// (collection, parent id, sub-collection) -> documents
    subs: RwLock<HashMap<(String, String, String), Vec<Document>>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document to a top-level collection.
    pub fn insert(&self, collection: &str, document: Document) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Add a document to a sub-collection under a parent.
    pub fn insert_sub(&self, collection: &str, parent_id: &str, sub: &str, document: Document) {
        self.subs
            .write()
            .entry((
                collection.to_string(),
                parent_id.to_string(),
                sub.to_string(),
            ))
            .or_default()
            .push(document);
    }

    /// Make every call fail with a store-unavailable error, to exercise
    /// connectivity handling.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(Error::StoreUnavailable {
                message: "memory store marked unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        self.check_available()
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        self.check_available()?;
        Ok(self
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn sub_documents(
        &self,
        collection: &str,
        parent_id: &str,
        sub: &str,
    ) -> Result<Vec<Document>> {
        self.check_available()?;
        Ok(self
            .subs
            .read()
            .get(&(
                collection.to_string(),
                parent_id.to_string(),
                sub.to_string(),
            ))
            .cloned()
            .unwrap_or_default())
    }

    async fn collection_group(&self, sub: &str) -> Result<Vec<Document>> {
        self.check_available()?;
        Ok(self
            .subs
            .read()
            .iter()
            .filter(|((_, _, sub_name), _)| sub_name == sub)
            .flat_map(|(_, docs)| docs.iter().cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn doc(id: &str) -> Document {
        Document::new(id, Map::new())
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        store.insert("courses", doc("cs61a"));
        store.insert_sub("courses", "cs61a", "exams", doc("mt1"));
        store.insert_sub("courses", "phys8b", "exams", doc("final"));

        assert_eq!(store.list("courses").await.unwrap().len(), 1);
        assert_eq!(
            store
                .sub_documents("courses", "cs61a", "exams")
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(store.collection_group("exams").await.unwrap().len(), 2);
        assert!(store.list("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_ping() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let err = store.ping().await.unwrap_err();
        assert!(err.is_store_unavailable());
    }
}
