//! AI analysis result types and response coercion

use serde::{Deserialize, Serialize};

/// Default relevance when the model omits or mangles a strength score.
const DEFAULT_STRENGTH: f32 = 0.5;

/// Summary used when the model returns a parseable object without one.
const PLACEHOLDER_SUMMARY: &str = "No summary was generated for this query.";

/// A topic the model connected to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub connection: String,
    /// Relevance in [0, 1]
    pub strength: f32,
}

/// Semantic analysis of one study query.
///
/// Constructed per request by the adapter, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub summary: String,
    pub concepts: Vec<Concept>,
    pub key_points: Vec<String>,
    pub search_terms: Vec<String>,
}

/// Loosely-shaped model output, before coercion. Every field the model may
/// omit is optional here so a partial reply still parses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAnalysis {
    summary: Option<String>,
    #[serde(default)]
    concepts: Vec<RawConcept>,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    search_terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawConcept {
    id: Option<String>,
    name: Option<String>,
    connection: Option<String>,
    strength: Option<f32>,
}

impl AiAnalysis {
    /// Coerce a raw model reply into a valid analysis: synthesized concept
    /// ids, strengths clamped to [0, 1], defaults for missing sections.
    pub(crate) fn from_raw(raw: RawAnalysis) -> Self {
        let concepts = raw
            .concepts
            .into_iter()
            .enumerate()
            .map(|(index, concept)| Concept {
                id: concept
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("concept-{index}")),
                name: concept.name.unwrap_or_default(),
                connection: concept.connection.unwrap_or_default(),
                strength: concept
                    .strength
                    .filter(|s| s.is_finite())
                    .unwrap_or(DEFAULT_STRENGTH)
                    .clamp(0.0, 1.0),
            })
            .collect();

        Self {
            summary: raw
                .summary
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_SUMMARY.to_string()),
            concepts,
            key_points: raw.key_points,
            search_terms: raw.search_terms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_fills_missing_fields() {
        let raw: RawAnalysis = serde_json::from_str(
            r#"{
                "concepts": [
                    {"name": "Recursion", "connection": "core technique"},
                    {"id": "tree-recursion", "name": "Tree recursion", "connection": "", "strength": 1.7}
                ]
            }"#,
        )
        .unwrap();

        let analysis = AiAnalysis::from_raw(raw);
        assert_eq!(analysis.summary, PLACEHOLDER_SUMMARY);
        assert_eq!(analysis.concepts[0].id, "concept-0");
        assert_eq!(analysis.concepts[0].strength, DEFAULT_STRENGTH);
        assert_eq!(analysis.concepts[1].id, "tree-recursion");
        assert_eq!(analysis.concepts[1].strength, 1.0);
        assert!(analysis.key_points.is_empty());
        assert!(analysis.search_terms.is_empty());
    }

    #[test]
    fn test_strength_clamped_low() {
        let raw: RawAnalysis = serde_json::from_str(
            r#"{"summary": "s", "concepts": [{"id": "a", "name": "n", "connection": "c", "strength": -0.4}]}"#,
        )
        .unwrap();

        let analysis = AiAnalysis::from_raw(raw);
        assert_eq!(analysis.concepts[0].strength, 0.0);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let analysis = AiAnalysis {
            summary: "s".to_string(),
            concepts: vec![],
            key_points: vec!["p".to_string()],
            search_terms: vec!["t".to_string()],
        };

        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("keyPoints").is_some());
        assert!(json.get("searchTerms").is_some());
    }
}
