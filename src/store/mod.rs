//! Document-store capability
//!
//! The engine reads course material out of a schemaless document store:
//! top-level collections of documents, sub-collections under each
//! document, and store-wide "collection group" scans across all parents.
//! [`DocumentStore`] abstracts over backends; [`FirestoreStore`] talks to
//! Firestore over REST and [`MemoryStore`] backs tests and development.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::Result;

/// A schemaless store record. Fields are read defensively: a missing or
/// mistyped field reads as empty rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// String field, or "" when absent or not a string.
    pub fn str_field(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Object field, or None when absent or not an object.
    pub fn map_field(&self, name: &str) -> Option<&Map<String, Value>> {
        self.fields.get(name).and_then(Value::as_object)
    }

    /// String key inside an object field, or "" when anything is missing.
    pub fn nested_str(&self, map_name: &str, key: &str) -> &str {
        self.map_field(map_name)
            .and_then(|map| map.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// Read capability over the external document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Connectivity probe. A failure here is fatal for the whole search.
    async fn ping(&self) -> Result<()>;

    /// List all documents in a named top-level collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Fetch the sub-documents under one parent document.
    async fn sub_documents(
        &self,
        collection: &str,
        parent_id: &str,
        sub: &str,
    ) -> Result<Vec<Document>>;

    /// Scan a named sub-collection across all parents.
    async fn collection_group(&self, sub: &str) -> Result<Vec<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defensive_field_access() {
        let mut fields = Map::new();
        fields.insert("year".to_string(), json!("2024"));
        fields.insert("count".to_string(), json!(3));
        fields.insert("metadata".to_string(), json!({"instructor": "Hilfinger"}));
        let doc = Document::new("cs61a_mt1", fields);

        assert_eq!(doc.str_field("year"), "2024");
        assert_eq!(doc.str_field("missing"), "");
        assert_eq!(doc.str_field("count"), "");
        assert_eq!(doc.nested_str("metadata", "instructor"), "Hilfinger");
        assert_eq!(doc.nested_str("metadata", "source"), "");
        assert_eq!(doc.nested_str("missing", "source"), "");
    }
}
