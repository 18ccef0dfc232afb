//! JSON output formatting

use crate::engine::QueryResponse;

/// Format a query response as JSON
pub fn format(response: &QueryResponse) -> String {
    serde_json::to_string_pretty(response)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize response: {}"}}"#, e))
}
