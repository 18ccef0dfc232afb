//! Course resource projections
//!
//! Resources are read-only projections of store documents; the engine
//! ranks, filters, and deduplicates copies but never writes them back.

use serde::{Deserialize, Serialize};

use crate::store::Document;

/// A single study artifact associated with a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseResource {
    pub id: String,
    pub course_code: String,
    pub course_name: String,
    pub department: String,
    pub semester: String,
    pub year: String,
    pub resource_type: String,
    pub resource_url: String,
    pub school: String,
    pub metadata: ResourceMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub department: String,
}

impl ResourceMetadata {
    fn from_document(document: &Document) -> Self {
        let instructor = document.nested_str("metadata", "instructor");
        Self {
            instructor: (!instructor.is_empty()).then(|| instructor.to_string()),
            resource_type: document.nested_str("metadata", "resource_type").to_string(),
            source: document.nested_str("metadata", "source").to_string(),
            department: document.nested_str("metadata", "department").to_string(),
        }
    }
}

impl CourseResource {
    /// Project an exam sub-document fetched under a matched course. Course
    /// name, department, and school are not present on exam records and
    /// stay empty.
    pub fn from_exam(course_id: &str, courses_collection: &str, document: &Document) -> Self {
        let resource_type = {
            let direct = document.str_field("resource_type");
            if direct.is_empty() {
                document.nested_str("metadata", "resource_type")
            } else {
                direct
            }
        };

        Self {
            id: document.id.clone(),
            course_code: course_id.to_string(),
            course_name: String::new(),
            department: String::new(),
            school: String::new(),
            semester: document.str_field("semester").to_string(),
            year: document.str_field("year").to_string(),
            resource_type: resource_type.to_string(),
            resource_url: document.str_field("resource_url").to_string(),
            metadata: ResourceMetadata::from_document(document),
            parent_course_id: Some(course_id.to_string()),
            collection_path: Some(format!(
                "{}/{}/exams/{}",
                courses_collection, course_id, document.id
            )),
        }
    }

    /// Project a document surfaced by a store-wide scan, reading every
    /// field defensively.
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            course_code: document.str_field("course_code").to_string(),
            course_name: document.str_field("course_name").to_string(),
            department: document.str_field("department").to_string(),
            school: document.str_field("school").to_string(),
            semester: document.str_field("semester").to_string(),
            year: document.str_field("year").to_string(),
            resource_type: document.str_field("resource_type").to_string(),
            resource_url: document.str_field("resource_url").to_string(),
            metadata: ResourceMetadata::from_document(document),
            parent_course_id: None,
            collection_path: None,
        }
    }

    /// Lowercased concatenation of the metadata-bearing fields, used for
    /// supplemental-term matching.
    pub fn metadata_haystack(&self) -> String {
        [
            self.resource_type.as_str(),
            self.semester.as_str(),
            self.year.as_str(),
            self.metadata.resource_type.as_str(),
            self.metadata.source.as_str(),
            self.metadata.department.as_str(),
            self.metadata.instructor.as_deref().unwrap_or_default(),
        ]
        .join(" ")
        .to_lowercase()
    }

    /// Course code and name, lowercased, for code/subject matching.
    pub fn code_and_name(&self) -> String {
        format!("{} {}", self.course_code, self.course_name).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn exam_doc() -> Document {
        let mut fields = Map::new();
        fields.insert("semester".to_string(), json!("Fall"));
        fields.insert("year".to_string(), json!("2024"));
        fields.insert("resource_url".to_string(), json!("https://x/mt1.pdf"));
        fields.insert(
            "metadata".to_string(),
            json!({"resource_type": "midterm", "source": "studylib", "instructor": "DeNero"}),
        );
        Document::new("mt1", fields)
    }

    #[test]
    fn test_exam_projection_leaves_course_fields_empty() {
        let resource = CourseResource::from_exam("cs61a", "courses", &exam_doc());

        assert_eq!(resource.id, "mt1");
        assert_eq!(resource.course_code, "cs61a");
        assert_eq!(resource.course_name, "");
        assert_eq!(resource.department, "");
        assert_eq!(resource.school, "");
        // resource_type falls through to the metadata bag
        assert_eq!(resource.resource_type, "midterm");
        assert_eq!(
            resource.collection_path.as_deref(),
            Some("courses/cs61a/exams/mt1")
        );
    }

    #[test]
    fn test_metadata_haystack() {
        let resource = CourseResource::from_exam("cs61a", "courses", &exam_doc());
        let haystack = resource.metadata_haystack();
        assert!(haystack.contains("fall"));
        assert!(haystack.contains("2024"));
        assert!(haystack.contains("studylib"));
        assert!(haystack.contains("denero"));
    }

    #[test]
    fn test_document_projection_reads_defensively() {
        let resource = CourseResource::from_document(&Document::new("r1", Map::new()));
        assert_eq!(resource.course_code, "");
        assert_eq!(resource.year, "");
        assert!(resource.metadata.instructor.is_none());
    }
}
