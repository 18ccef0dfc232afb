//! Query analysis through the completion service
//!
//! Sends a fixed instruction plus the user query, parses the structured
//! reply, and degrades to a deterministic extraction-based analysis when
//! the service fails or returns something unparseable. Callers never see
//! an error from this module.

use tracing::{debug, warn};

use crate::analysis::client::CompletionClient;
use crate::analysis::types::{AiAnalysis, Concept, RawAnalysis};
use crate::core::error::Result;
use crate::extract::ExtractionResult;

/// System prompt for query analysis
pub const SYSTEM_PROMPT: &str = r#"You are an expert academic assistant specializing in UC Berkeley courses. Analyze study queries and provide:
1. A clear, comprehensive summary (2-3 sentences)
2. 5 related concepts with their connection type and relevance strength (0.0-1.0)
3. 4 key learning points
4. Search terms that would help find relevant academic resources

Focus on Berkeley course subjects and academic terminology.

Respond with JSON only, no markdown formatting:
{
  "summary": "Clear explanation of the topic...",
  "concepts": [
    {
      "id": "unique_concept_id",
      "name": "Concept Name",
      "connection": "How it relates to the query",
      "strength": 0.8
    }
  ],
  "keyPoints": ["Point 1", "Point 2", "Point 3", "Point 4"],
  "searchTerms": ["term1", "term2", "term3"]
}"#;

/// Analyze a study query, falling back to a deterministic analysis on any
/// failure.
pub async fn analyze(
    client: &dyn CompletionClient,
    query: &str,
    extraction: &ExtractionResult,
) -> AiAnalysis {
    match try_analyze(client, query).await {
        Ok(analysis) => {
            debug!(
                concepts = analysis.concepts.len(),
                search_terms = analysis.search_terms.len(),
                "Query analysis parsed"
            );
            analysis
        }
        Err(e) => {
            warn!("Query analysis failed, using fallback: {}", e);
            fallback_analysis(extraction)
        }
    }
}

async fn try_analyze(client: &dyn CompletionClient, query: &str) -> Result<AiAnalysis> {
    let reply = client.complete(SYSTEM_PROMPT, query).await?;
    parse_analysis(&reply)
}

/// Parse a completion reply into an analysis, coercing loose fields.
pub(crate) fn parse_analysis(reply: &str) -> Result<AiAnalysis> {
    let json = extract_json(reply);
    let raw: RawAnalysis = serde_json::from_str(json)?;
    Ok(AiAnalysis::from_raw(raw))
}

/// Deterministic analysis built entirely from extraction output. Always
/// structurally valid.
pub fn fallback_analysis(extraction: &ExtractionResult) -> AiAnalysis {
    let summary = if extraction.departments.is_empty() {
        "Study resources matching your query.".to_string()
    } else {
        format!(
            "Study resources related to {}.",
            extraction.departments.join(", ")
        )
    };

    let concepts = [
        ("Core Concepts", "Foundational ideas behind your query", 0.9),
        ("Practice Problems", "Worked problems that reinforce the material", 0.8),
        ("Past Exams", "Previous assessments covering similar material", 0.7),
        ("Study Guides", "Condensed references for targeted review", 0.6),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (name, connection, strength))| Concept {
        id: format!("concept-{index}"),
        name: name.to_string(),
        connection: connection.to_string(),
        strength,
    })
    .collect();

    AiAnalysis {
        summary,
        concepts,
        key_points: vec![
            "Review the core definitions before attempting problems".to_string(),
            "Work through past exams under timed conditions".to_string(),
            "Compare material across semesters for recurring themes".to_string(),
            "Prioritize topics that appear in multiple resources".to_string(),
        ],
        search_terms: extraction.all_terms.clone(),
    }
}

/// Extract JSON from a model reply, handling markdown code blocks and
/// surrounding prose
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Try to find JSON in markdown code block
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Try generic code block
    if let Some(start) = trimmed.find("```") {
        let after_backticks = start + 3;
        // Skip optional language identifier on same line
        let json_start = trimmed[after_backticks..]
            .find('\n')
            .map(|n| after_backticks + n + 1)
            .unwrap_or(after_backticks);
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Try to find raw JSON object
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if end > start {
                return &trimmed[start..=end];
            }
        }
    }

    // Return as-is
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::client::CompletionClient;
    use crate::core::error::Error;
    use crate::extract;
    use async_trait::async_trait;

    struct Scripted(String);

    #[async_trait]
    impl CompletionClient for Scripted {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl CompletionClient for Failing {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Err(Error::CompletionError {
                message: "connection refused".to_string(),
            })
        }
    }

    #[test]
    fn test_extract_json_raw() {
        let input = r#"{"summary": "s"}"#;
        assert_eq!(extract_json(input), r#"{"summary": "s"}"#);
    }

    #[test]
    fn test_extract_json_markdown() {
        let input = "```json\n{\"summary\": \"s\"}\n```";
        assert_eq!(extract_json(input), r#"{"summary": "s"}"#);
    }

    #[test]
    fn test_extract_json_with_prose() {
        let input = "Here is the analysis you asked for:\n{\"summary\": \"s\"}\nHope that helps!";
        assert_eq!(extract_json(input), r#"{"summary": "s"}"#);
    }

    #[test]
    fn test_fallback_mirrors_extraction() {
        let extraction = extract::extract("CS 61A midterm");
        let analysis = fallback_analysis(&extraction);

        assert!(analysis.summary.contains("Computer Science"));
        assert_eq!(analysis.concepts.len(), 4);
        assert_eq!(analysis.key_points.len(), 4);
        assert_eq!(analysis.search_terms, extraction.all_terms);
        for concept in &analysis.concepts {
            assert!((0.0..=1.0).contains(&concept.strength));
        }
    }

    #[test]
    fn test_fallback_without_departments() {
        let extraction = extract::extract("study tips");
        let analysis = fallback_analysis(&extraction);
        assert!(!analysis.summary.is_empty());
        assert_eq!(analysis.concepts.len(), 4);
    }

    #[tokio::test]
    async fn test_analyze_parses_scripted_reply() {
        let client = Scripted(
            r#"{"summary": "Recursion in 61A", "concepts": [{"name": "Recursion", "connection": "direct", "strength": 0.95}], "keyPoints": ["base cases"], "searchTerms": ["recursion"]}"#
                .to_string(),
        );
        let extraction = extract::extract("CS 61A recursion");

        let analysis = analyze(&client, "CS 61A recursion", &extraction).await;
        assert_eq!(analysis.summary, "Recursion in 61A");
        assert_eq!(analysis.concepts[0].id, "concept-0");
        assert_eq!(analysis.search_terms, vec!["recursion"]);
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_failure() {
        let extraction = extract::extract("CS 61A midterm");
        let analysis = analyze(&Failing, "CS 61A midterm", &extraction).await;

        assert_eq!(analysis.concepts.len(), 4);
        assert_eq!(analysis.key_points.len(), 4);
        assert_eq!(analysis.search_terms, extraction.all_terms);
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_garbage_reply() {
        let client = Scripted("I could not produce JSON today.".to_string());
        let extraction = extract::extract("Math 1A");

        let analysis = analyze(&client, "Math 1A", &extraction).await;
        assert_eq!(analysis.search_terms, extraction.all_terms);
    }
}
