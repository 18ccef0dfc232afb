//! Query orchestration
//!
//! Sequences extraction, AI analysis, and resource matching for one
//! request. The analysis call and the code-driven store scans have no data
//! dependency on each other and run concurrently; the metadata strategy
//! runs after both settle so the AI's search terms can participate.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use serde::Serialize;

use crate::analysis::{self, AiAnalysis, AnthropicClient, CompletionClient};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::extract::{self, ExtractionResult};
use crate::search::{CourseResource, ResourceMatcher};
use crate::store::{DocumentStore, FirestoreStore};

/// Assembled response for one study query. The three sections are
/// independently serializable.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub analysis: AiAnalysis,
    #[serde(rename = "searchResults")]
    pub resources: Vec<CourseResource>,
    /// Raw extraction output, kept for diagnostics
    #[serde(rename = "courseInfo")]
    pub extraction: ExtractionResult,
}

pub struct QueryEngine {
    completion: Arc<dyn CompletionClient>,
    matcher: ResourceMatcher,
}

impl QueryEngine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        completion: Arc<dyn CompletionClient>,
        config: &Config,
    ) -> Self {
        Self {
            completion,
            matcher: ResourceMatcher::new(store, config.search.clone()),
        }
    }

    /// Build an engine against Firestore and the Anthropic API from
    /// configuration.
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(FirestoreStore::new(&config.store));
        let completion: Arc<dyn CompletionClient> = Arc::new(AnthropicClient::new(&config.analysis));
        Self::new(store, completion, config)
    }

    /// Probe the document store, for health reporting.
    pub async fn health_check(&self) -> Result<()> {
        self.matcher.ping().await
    }

    /// Answer one study query.
    pub async fn query(&self, prompt: &str) -> Result<QueryResponse> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidPrompt);
        }

        let start = Instant::now();
        let extraction = extract::extract(prompt);
        debug!(
            codes = extraction.course_codes.len(),
            departments = extraction.departments.len(),
            "Extracted query signals"
        );

        let (analysis, candidates) = tokio::join!(
            analysis::analyze(self.completion.as_ref(), prompt, &extraction),
            self.matcher.code_candidates(&extraction),
        );
        let candidates = candidates?;

        // AI search terms supplement the rule-extracted pool without
        // overriding it
        let mut supplemental_terms = extraction.all_terms.clone();
        for term in &analysis.search_terms {
            if !supplemental_terms
                .iter()
                .any(|t| t.eq_ignore_ascii_case(term))
            {
                supplemental_terms.push(term.clone());
            }
        }

        let resources = self
            .matcher
            .finish(candidates, &extraction, &supplemental_terms)
            .await?;

        info!(
            resources = resources.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Query completed"
        );

        Ok(QueryResponse {
            analysis,
            resources,
            extraction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, MemoryStore};
    use async_trait::async_trait;
    use serde_json::{json, Map};

    struct Failing;

    #[async_trait]
    impl CompletionClient for Failing {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Err(Error::CompletionError {
                message: "offline".to_string(),
            })
        }
    }

    struct Scripted(String);

    #[async_trait]
    impl CompletionClient for Scripted {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn exam(id: &str, year: &str) -> Document {
        let mut fields = Map::new();
        fields.insert("year".to_string(), json!(year));
        Document::new(id, fields)
    }

    fn engine_with(
        store: Arc<MemoryStore>,
        completion: Arc<dyn CompletionClient>,
    ) -> QueryEngine {
        QueryEngine::new(store, completion, &Config::default())
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let engine = engine_with(Arc::new(MemoryStore::new()), Arc::new(Failing));
        assert!(matches!(
            engine.query("   ").await,
            Err(Error::InvalidPrompt)
        ));
    }

    #[tokio::test]
    async fn test_full_query_with_failed_analysis_still_returns_resources() {
        let store = Arc::new(MemoryStore::new());
        store.insert("courses", Document::new("phys8b", Map::new()));
        store.insert_sub("courses", "phys8b", "exams", exam("final_2023", "2023"));
        store.insert_sub("courses", "phys8b", "exams", exam("final_2024", "2024"));

        let engine = engine_with(store, Arc::new(Failing));
        let response = engine
            .query("Physics 8B electromagnetic waves")
            .await
            .unwrap();

        assert_eq!(response.resources.len(), 2);
        assert_eq!(response.resources[0].id, "final_2024");
        // Fallback analysis is structurally complete
        assert_eq!(response.analysis.concepts.len(), 4);
        assert_eq!(response.analysis.key_points.len(), 4);
        assert_eq!(
            response.analysis.search_terms,
            response.extraction.all_terms
        );
    }

    #[tokio::test]
    async fn test_ai_search_terms_reach_the_metadata_strategy() {
        let store = Arc::new(MemoryStore::new());
        store.insert_sub(
            "courses",
            "phys8b",
            "resources",
            {
                let mut fields = Map::new();
                fields.insert("metadata".to_string(), json!({"source": "wave optics pack"}));
                Document::new("optics", fields)
            },
        );

        let reply = r#"{"summary": "s", "concepts": [], "keyPoints": [], "searchTerms": ["wave optics"]}"#;
        let engine = engine_with(store, Arc::new(Scripted(reply.to_string())));
        let response = engine.query("optics study help").await.unwrap();

        assert_eq!(response.resources.len(), 1);
        assert_eq!(response.resources[0].id, "optics");
    }

    #[tokio::test]
    async fn test_store_unavailable_propagates() {
        let store = Arc::new(MemoryStore::new());
        store.set_unavailable(true);

        let engine = engine_with(store, Arc::new(Failing));
        let err = engine.query("CS 61A").await.unwrap_err();
        assert!(err.is_store_unavailable());
    }

    #[tokio::test]
    async fn test_response_serializes_with_original_field_names() {
        let engine = engine_with(Arc::new(MemoryStore::new()), Arc::new(Failing));
        let response = engine.query("CS 61A midterm").await.unwrap();

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("analysis").is_some());
        assert!(value.get("searchResults").is_some());
        assert!(value.get("courseInfo").is_some());
        assert!(value["courseInfo"].get("courseCodes").is_some());
    }
}
