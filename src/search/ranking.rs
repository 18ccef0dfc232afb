//! Relevance ordering for matched resources

use crate::extract::ExtractionResult;
use crate::search::resource::CourseResource;

/// Order resources by relevance, in place. Stable sort, descending
/// priority:
///
/// 1. course code is an exact member of the extracted code set
/// 2. any supplemental search term appears in the metadata fields
/// 3. year, lexicographically descending (string comparison; correct only
///    for same-width years)
pub fn rank(
    resources: &mut [CourseResource],
    extraction: &ExtractionResult,
    supplemental_terms: &[String],
) {
    let terms_lower: Vec<String> = supplemental_terms
        .iter()
        .map(|t| t.to_lowercase())
        .collect();

    resources.sort_by(|a, b| {
        let key_a = rank_key(a, extraction, &terms_lower);
        let key_b = rank_key(b, extraction, &terms_lower);
        key_b.cmp(&key_a)
    });
}

fn rank_key<'a>(
    resource: &'a CourseResource,
    extraction: &ExtractionResult,
    terms_lower: &[String],
) -> (bool, bool, &'a str) {
    let exact_code = extraction
        .course_codes
        .iter()
        .any(|code| code.eq_ignore_ascii_case(&resource.course_code));

    let term_hit = {
        let haystack = resource.metadata_haystack();
        terms_lower
            .iter()
            .any(|term| !term.is_empty() && haystack.contains(term))
    };

    (exact_code, term_hit, resource.year.as_str())
}
