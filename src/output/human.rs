//! Human-readable output formatting

use crate::engine::QueryResponse;

/// Format a query response for human consumption
pub fn format(response: &QueryResponse) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", response.analysis.summary));

    if !response.analysis.key_points.is_empty() {
        output.push_str("\nKey points:\n");
        for point in &response.analysis.key_points {
            output.push_str(&format!("  - {}\n", point));
        }
    }

    if !response.analysis.concepts.is_empty() {
        output.push_str("\nRelated concepts:\n");
        for concept in &response.analysis.concepts {
            output.push_str(&format!(
                "  {} ({:.0}%) - {}\n",
                concept.name,
                concept.strength * 100.0,
                concept.connection
            ));
        }
    }

    if response.resources.is_empty() {
        output.push_str("\nNo resources found\n");
        return output;
    }

    output.push_str(&format!("\nFound {} resources\n\n", response.resources.len()));

    for (i, resource) in response.resources.iter().enumerate() {
        // Header: code type (semester year)
        let mut header = format!("{}. {}", i + 1, resource.course_code);
        if !resource.resource_type.is_empty() {
            header.push_str(&format!(" {}", resource.resource_type));
        }
        if !resource.semester.is_empty() || !resource.year.is_empty() {
            header.push_str(&format!(
                " ({} {})",
                resource.semester.trim(),
                resource.year.trim()
            ));
        }
        output.push_str(header.trim_end());
        output.push('\n');

        if !resource.course_name.is_empty() {
            output.push_str(&format!("   {}\n", resource.course_name));
        }
        if let Some(instructor) = &resource.metadata.instructor {
            output.push_str(&format!("   instructor: {}\n", instructor));
        }
        if !resource.resource_url.is_empty() {
            output.push_str(&format!("   {}\n", resource.resource_url));
        }

        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AiAnalysis;
    use crate::extract::ExtractionResult;
    use crate::search::{CourseResource, ResourceMetadata};

    fn sample_response() -> QueryResponse {
        QueryResponse {
            analysis: AiAnalysis {
                summary: "A summary.".to_string(),
                concepts: vec![],
                key_points: vec!["Practice daily".to_string()],
                search_terms: vec![],
            },
            resources: vec![CourseResource {
                id: "mt1".to_string(),
                course_code: "CS 61A".to_string(),
                course_name: String::new(),
                department: String::new(),
                semester: "Fall".to_string(),
                year: "2024".to_string(),
                resource_type: "midterm".to_string(),
                resource_url: "https://x/mt1.pdf".to_string(),
                school: String::new(),
                metadata: ResourceMetadata::default(),
                parent_course_id: None,
                collection_path: None,
            }],
            extraction: ExtractionResult::default(),
        }
    }

    #[test]
    fn test_format_lists_resources() {
        let output = format(&sample_response());
        assert!(output.contains("A summary."));
        assert!(output.contains("Practice daily"));
        assert!(output.contains("1. CS 61A midterm (Fall 2024)"));
        assert!(output.contains("https://x/mt1.pdf"));
    }

    #[test]
    fn test_format_without_resources() {
        let mut response = sample_response();
        response.resources.clear();
        assert!(format(&response).contains("No resources found"));
    }
}
