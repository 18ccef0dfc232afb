//! Result output formatting

pub mod human;
pub mod json;

use crate::cli::OutputFormat;
use crate::engine::QueryResponse;

/// Format a query response in the requested format
pub fn format_response(response: &QueryResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format(response),
        OutputFormat::Json => json::format(response),
    }
}
