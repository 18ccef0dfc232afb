//! Multi-strategy resource matching over the document store
//!
//! Candidates from every strategy are unioned and deduplicated by document
//! id; the first occurrence of an id wins and later matches are dropped
//! silently. Candidate order therefore decides which projection of a
//! duplicate survives (see DESIGN.md).

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::config::SearchConfig;
use crate::core::error::{Error, Result};
use crate::extract::ExtractionResult;
use crate::search::ranking::rank;
use crate::search::resource::CourseResource;
use crate::store::{Document, DocumentStore};

pub struct ResourceMatcher {
    store: Arc<dyn DocumentStore>,
    config: SearchConfig,
}

/// Union of candidates with first-occurrence-wins identity dedup.
struct CandidateSet {
    seen: HashSet<String>,
    items: Vec<CourseResource>,
}

impl CandidateSet {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    fn push(&mut self, resource: CourseResource) {
        if self.seen.insert(resource.id.clone()) {
            self.items.push(resource);
        }
    }
}

impl ResourceMatcher {
    pub fn new(store: Arc<dyn DocumentStore>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    /// Full match pipeline: connectivity probe, code-driven strategies,
    /// metadata strategy, dedup, rank, cap.
    pub async fn search(
        &self,
        extraction: &ExtractionResult,
        supplemental_terms: &[String],
    ) -> Result<Vec<CourseResource>> {
        let candidates = self.code_candidates(extraction).await?;
        self.finish(candidates, extraction, supplemental_terms).await
    }

    /// Probe store connectivity. Any failure is reported as the
    /// store-unavailable condition, distinct from an empty result set.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await.map_err(|e| match e {
            unavailable @ Error::StoreUnavailable { .. } => unavailable,
            other => Error::StoreUnavailable {
                message: other.to_string(),
            },
        })
    }

    /// Code-driven strategies (exact identifier, subject+number compound,
    /// fallback substring). Probes store connectivity first; that probe
    /// failing is fatal for the whole search.
    pub async fn code_candidates(
        &self,
        extraction: &ExtractionResult,
    ) -> Result<Vec<CourseResource>> {
        self.ping().await?;

        let mut candidates = CandidateSet::new();
        self.match_course_identifiers(extraction, &mut candidates)
            .await?;

        let subjects: Vec<String> = extraction
            .subject_tokens()
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        let numbers: Vec<String> = extraction
            .bare_numbers()
            .iter()
            .map(|n| n.to_lowercase())
            .collect();

        if !subjects.is_empty() && !numbers.is_empty() {
            self.match_subject_and_number(&subjects, &numbers, &mut candidates)
                .await;
        } else if !extraction.course_codes.is_empty() || !extraction.all_terms.is_empty() {
            self.match_code_or_term_substring(extraction, &mut candidates)
                .await;
        }

        debug!(count = candidates.items.len(), "Collected code candidates");
        Ok(candidates.items)
    }

    /// Metadata strategy plus ranking and the result cap, applied to
    /// already-collected candidates.
    pub async fn finish(
        &self,
        candidates: Vec<CourseResource>,
        extraction: &ExtractionResult,
        supplemental_terms: &[String],
    ) -> Result<Vec<CourseResource>> {
        let mut set = CandidateSet::new();
        for candidate in candidates {
            set.push(candidate);
        }

        if !supplemental_terms.is_empty() {
            for resource in self.metadata_candidates(supplemental_terms).await {
                set.push(resource);
            }
        }

        let mut results = set.items;
        rank(&mut results, extraction, supplemental_terms);
        results.truncate(self.config.max_results);
        Ok(results)
    }

    /// Strategy 1: flexible identifier match against course documents,
    /// then their exam sub-documents.
    async fn match_course_identifiers(
        &self,
        extraction: &ExtractionResult,
        candidates: &mut CandidateSet,
    ) -> Result<()> {
        let variants = extraction.normalized_code_variants();
        if variants.is_empty() {
            return Ok(());
        }

        let courses = self.store.list(&self.config.courses_collection).await?;
        debug!(total = courses.len(), "Scanning course identifiers");

        for course in &courses {
            let normalized = normalize_identifier(&course.id);
            let matched = variants.iter().any(|variant| {
                normalized == *variant
                    || normalized.ends_with(variant)
                    || normalized.contains(variant)
            });
            if !matched {
                continue;
            }

            match self
                .store
                .sub_documents(
                    &self.config.courses_collection,
                    &course.id,
                    &self.config.exams_collection,
                )
                .await
            {
                Ok(exams) => {
                    debug!(course = %course.id, exams = exams.len(), "Matched course");
                    for exam in &exams {
                        candidates.push(CourseResource::from_exam(
                            &course.id,
                            &self.config.courses_collection,
                            exam,
                        ));
                    }
                }
                Err(e) => {
                    warn!(course = %course.id, "Skipping unreadable exams: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Strategy 2: subject+number compound match across the store-wide
    /// exam and resource sets. First matching number wins per document.
    async fn match_subject_and_number(
        &self,
        subjects: &[String],
        numbers: &[String],
        candidates: &mut CandidateSet,
    ) {
        for document in self.scan_groups().await {
            let resource = CourseResource::from_document(&document);
            let haystack = resource.code_and_name();
            if !subjects.iter().any(|subject| haystack.contains(subject)) {
                continue;
            }
            for number in numbers {
                if haystack.contains(number) {
                    candidates.push(resource);
                    break;
                }
            }
        }
    }

    /// Strategy 3: code or term substring match when no subject+number
    /// pair is available.
    async fn match_code_or_term_substring(
        &self,
        extraction: &ExtractionResult,
        candidates: &mut CandidateSet,
    ) {
        let codes: Vec<String> = extraction
            .course_codes
            .iter()
            .map(|c| c.to_lowercase())
            .collect();
        let terms: Vec<String> = extraction
            .all_terms
            .iter()
            .map(|t| t.to_lowercase())
            .collect();

        for document in self.scan_groups().await {
            let resource = CourseResource::from_document(&document);
            let code = resource.course_code.to_lowercase();
            let name = resource.course_name.to_lowercase();

            let matched = codes.iter().any(|c| !c.is_empty() && code.contains(c))
                || terms.iter().any(|t| !t.is_empty() && name.contains(t));
            if matched {
                candidates.push(resource);
            }
        }
    }

    /// Strategy 4: supplemental-term match against metadata fields.
    async fn metadata_candidates(&self, terms: &[String]) -> Vec<CourseResource> {
        let terms_lower: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();
        let mut matched = Vec::new();

        for document in self.scan_groups().await {
            let resource = CourseResource::from_document(&document);
            let haystack = resource.metadata_haystack();
            if terms_lower
                .iter()
                .any(|term| !term.is_empty() && haystack.contains(term))
            {
                matched.push(resource);
            }
        }

        debug!(count = matched.len(), "Metadata candidates");
        matched
    }

    /// Store-wide exam and resource sets. A failed scan of either group is
    /// non-fatal; its documents are omitted.
    async fn scan_groups(&self) -> Vec<Document> {
        let mut documents = Vec::new();
        for group in [
            self.config.exams_collection.as_str(),
            self.config.resources_collection.as_str(),
        ] {
            match self.store.collection_group(group).await {
                Ok(mut docs) => documents.append(&mut docs),
                Err(e) => warn!(group, "Skipping unreadable collection group: {}", e),
            }
        }
        documents
    }
}

/// Strip non-alphanumerics and lowercase, the store-side counterpart of
/// [`ExtractionResult::normalized_code_variants`].
fn normalize_identifier(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}
