//! Firestore REST backend
//!
//! Reads documents through the Firestore v1 REST API. Authentication is an
//! optional bearer token from `FIRESTORE_ACCESS_TOKEN`; without it requests
//! go out unauthenticated, which works against emulators and open rules.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

use crate::core::config::StoreConfig;
use crate::core::error::{Error, Result};
use crate::store::{Document, DocumentStore};

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Page size for collection listings
const PAGE_SIZE: usize = 300;

/// Global HTTP client with connection pooling (reused across all requests)
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client")
});

pub struct FirestoreStore {
    base_url: String,
    project_id: String,
}

impl FirestoreStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            project_id: config.project_id.clone(),
        }
    }

    /// Root path of the default database's documents.
    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match std::env::var("FIRESTORE_ACCESS_TOKEN") {
            Ok(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    /// List every document under a collection path, following page tokens.
    async fn list_path(&self, path: &str) -> Result<Vec<Document>> {
        let url = format!("{}/{}", self.documents_url(), path);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .authorized(HTTP_CLIENT.get(&url))
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(Error::StoreError {
                    message: format!("Listing {} failed: {} - {}", path, status, text),
                });
            }

            let body: Value = response.json().await?;
            for resource in body
                .get("documents")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                if let Some(document) = document_from_resource(resource) {
                    documents.push(document);
                }
            }

            match body.get("nextPageToken").and_then(Value::as_str) {
                Some(token) if !token.is_empty() => page_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(path, count = documents.len(), "Listed collection");
        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn ping(&self) -> Result<()> {
        // Mirrors listing the store's top-level collections as a read probe
        let url = format!("{}:listCollectionIds", self.documents_url());
        let response = self
            .authorized(HTTP_CLIENT.post(&url))
            .json(&json!({ "pageSize": 1 }))
            .send()
            .await
            .map_err(|e| Error::StoreUnavailable {
                message: format!("Failed to connect to database: {}", e),
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::StoreUnavailable {
                message: format!("Failed to connect to database: {}", response.status()),
            })
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        self.list_path(collection).await
    }

    async fn sub_documents(
        &self,
        collection: &str,
        parent_id: &str,
        sub: &str,
    ) -> Result<Vec<Document>> {
        self.list_path(&format!("{}/{}/{}", collection, parent_id, sub))
            .await
    }

    async fn collection_group(&self, sub: &str) -> Result<Vec<Document>> {
        let url = format!("{}:runQuery", self.documents_url());
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": sub, "allDescendants": true }]
            }
        });

        let response = self
            .authorized(HTTP_CLIENT.post(&url))
            .json(&query)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::StoreError {
                message: format!("Collection group {} failed: {} - {}", sub, status, text),
            });
        }

        // runQuery streams one JSON object per result; the REST transport
        // collects them into an array, with trailing entries that carry
        // only a readTime
        let body: Value = response.json().await?;
        let documents: Vec<Document> = body
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.get("document"))
            .filter_map(document_from_resource)
            .collect();

        debug!(sub, count = documents.len(), "Collection group scan");
        Ok(documents)
    }
}

/// Convert a Firestore document resource into a flat [`Document`].
fn document_from_resource(resource: &Value) -> Option<Document> {
    let name = resource.get("name").and_then(Value::as_str)?;
    let id = name.rsplit('/').next().unwrap_or(name).to_string();

    let mut fields = Map::new();
    if let Some(raw) = resource.get("fields").and_then(Value::as_object) {
        for (key, value) in raw {
            fields.insert(key.clone(), decode_value(value));
        }
    }

    Some(Document::new(id, fields))
}

/// Decode one typed Firestore value into plain JSON.
fn decode_value(value: &Value) -> Value {
    let Some(typed) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = typed.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(s) = typed.get("integerValue").and_then(Value::as_str) {
        // Integers arrive string-encoded over REST
        return s
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(s.to_string()));
    }
    if let Some(n) = typed.get("doubleValue").and_then(Value::as_f64) {
        return json!(n);
    }
    if let Some(b) = typed.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(s) = typed.get("timestampValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(s) = typed.get("referenceValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(map) = typed
        .get("mapValue")
        .and_then(|m| m.get("fields"))
        .and_then(Value::as_object)
    {
        let mut fields = Map::new();
        for (key, nested) in map {
            fields.insert(key.clone(), decode_value(nested));
        }
        return Value::Object(fields);
    }
    if let Some(values) = typed
        .get("arrayValue")
        .and_then(|a| a.get("values"))
        .and_then(Value::as_array)
    {
        return Value::Array(values.iter().map(decode_value).collect());
    }

    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_from_resource() {
        let resource = json!({
            "name": "projects/p/databases/(default)/documents/courses/cs61a/exams/mt1",
            "fields": {
                "year": { "stringValue": "2024" },
                "points": { "integerValue": "100" },
                "metadata": {
                    "mapValue": {
                        "fields": {
                            "instructor": { "stringValue": "DeNero" }
                        }
                    }
                }
            }
        });

        let doc = document_from_resource(&resource).unwrap();
        assert_eq!(doc.id, "mt1");
        assert_eq!(doc.str_field("year"), "2024");
        assert_eq!(doc.fields.get("points"), Some(&json!(100)));
        assert_eq!(doc.nested_str("metadata", "instructor"), "DeNero");
    }

    #[test]
    fn test_decode_value_handles_arrays_and_unknowns() {
        let value = json!({
            "arrayValue": {
                "values": [
                    { "stringValue": "a" },
                    { "booleanValue": true }
                ]
            }
        });
        assert_eq!(decode_value(&value), json!(["a", true]));
        assert_eq!(decode_value(&json!({ "geoPointValue": {} })), Value::Null);
    }

    #[test]
    fn test_resource_without_name_is_skipped() {
        assert!(document_from_resource(&json!({ "fields": {} })).is_none());
    }
}
