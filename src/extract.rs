//! Entity extraction from free-text study queries
//!
//! Pure text analysis, no I/O. Absence of matches yields empty sets, never
//! an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{DIRECTORY, RESOURCE_TYPE_KEYWORDS, SUBJECT_SYNONYMS};

/// Full course codes like "CS 61A", "MATH 1A", "cs61a".
static COURSE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[a-z]{2,6}\s*\d+[a-z]?\b").unwrap());

/// Standalone course numbers like "61A" or "101".
static COURSE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+[A-Z]?\b").unwrap());

/// Word-boundary matchers for every known subject prefix.
static PREFIX_TOKENS: Lazy<Vec<(Regex, &'static str, &'static str)>> = Lazy::new(|| {
    DIRECTORY
        .entries()
        .map(|(prefix, department)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(prefix));
            (Regex::new(&pattern).unwrap(), prefix, department)
        })
        .collect()
});

/// Structured signals extracted from one query.
///
/// All five collections are sets: deduplicated with case-insensitive
/// membership, first-seen casing kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Normalized course codes, including underscore and no-space variants
    pub course_codes: Vec<String>,
    /// Full department names inferred from prefixes or literal mentions
    pub departments: Vec<String>,
    /// Short subject prefixes ("CS", "Math")
    pub prefixes: Vec<String>,
    /// Recognized resource-type keywords
    pub resource_types: Vec<String>,
    /// Union of every extracted literal term
    pub all_terms: Vec<String>,
}

impl ExtractionResult {
    /// Course codes with non-alphanumerics stripped and lowercased, for
    /// flexible identifier matching.
    pub fn normalized_code_variants(&self) -> Vec<String> {
        self.course_codes
            .iter()
            .map(|code| {
                code.chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_lowercase()
            })
            .filter(|code| !code.is_empty())
            .collect()
    }

    /// Extracted codes that are bare course numbers ("61A", "8B").
    pub fn bare_numbers(&self) -> Vec<&str> {
        self.course_codes
            .iter()
            .map(String::as_str)
            .filter(|code| code.chars().next().is_some_and(|c| c.is_ascii_digit()))
            .collect()
    }

    /// Subject tokens usable for compound matching: prefixes and full
    /// department names.
    pub fn subject_tokens(&self) -> Vec<&str> {
        self.prefixes
            .iter()
            .chain(self.departments.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.course_codes.is_empty()
            && self.departments.is_empty()
            && self.prefixes.is_empty()
            && self.resource_types.is_empty()
            && self.all_terms.is_empty()
    }
}

/// Case-insensitive set insert keeping first-seen casing.
fn push_unique(set: &mut Vec<String>, value: &str) {
    if !set.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        set.push(value.to_string());
    }
}

/// Extract course codes, departments, prefixes, and resource types from a
/// raw query.
pub fn extract(query: &str) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let query_lower = query.to_lowercase();

    // Full course codes; whitespace collapsed to a single space
    for m in COURSE_CODE.find_iter(query) {
        let normalized = normalize_whitespace(m.as_str());
        push_unique(&mut result.course_codes, &normalized);
        push_unique(&mut result.all_terms, &normalized);

        let prefix: String = normalized
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        push_unique(&mut result.prefixes, &prefix);
        if let Some(department) = DIRECTORY.department_for_prefix(&prefix) {
            push_unique(&mut result.departments, department);
        }
    }

    // Bare course numbers, kept as course-code candidates for compound
    // matching
    for m in COURSE_NUMBER.find_iter(query) {
        push_unique(&mut result.course_codes, m.as_str());
        push_unique(&mut result.all_terms, m.as_str());
    }

    // Underscore and no-space variants for every spaced code; stores are
    // inconsistent about identifier formatting
    let variants: Vec<String> = result
        .course_codes
        .iter()
        .filter(|code| code.contains(' '))
        .flat_map(|code| [code.replace(' ', "_"), code.replace(' ', "")])
        .collect();
    for variant in &variants {
        push_unique(&mut result.course_codes, variant);
        push_unique(&mut result.all_terms, variant);
    }

    // Department names mentioned literally
    for (prefix, department) in DIRECTORY.entries() {
        if query_lower.contains(&department.to_lowercase()) {
            push_unique(&mut result.departments, department);
            push_unique(&mut result.prefixes, prefix);
            push_unique(&mut result.all_terms, department);
        }
    }

    // Subject prefixes as standalone tokens
    for (pattern, prefix, department) in PREFIX_TOKENS.iter() {
        if pattern.is_match(query) {
            push_unique(&mut result.prefixes, prefix);
            push_unique(&mut result.departments, department);
            push_unique(&mut result.all_terms, prefix);
        }
    }

    // Natural-language subject names
    for &(name, prefix) in SUBJECT_SYNONYMS {
        if query_lower.contains(name) {
            push_unique(&mut result.prefixes, prefix);
            if let Some(department) = DIRECTORY.department_for_prefix(prefix) {
                push_unique(&mut result.departments, department);
            }
            push_unique(&mut result.all_terms, name);
        }
    }

    // Resource-type keywords
    for &keyword in RESOURCE_TYPE_KEYWORDS {
        if query_lower.contains(keyword) {
            push_unique(&mut result.resource_types, keyword);
            push_unique(&mut result.all_terms, keyword);
        }
    }

    result
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
