//! Static course-catalog knowledge: subject prefixes, departments,
//! subject-name synonyms, and the resource-type vocabulary.
//!
//! Built once at first use and read-only for the process lifetime, so it is
//! safe to share across any number of concurrent requests.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Subject prefix to department name, as used in course codes.
const PREFIX_TO_DEPARTMENT: &[(&str, &str)] = &[
    ("Anthro", "Anthropology"),
    ("AAS", "Asian American Studies Program"),
    ("Astro", "Astronomy"),
    ("BioE", "Bioengineering"),
    ("Bio", "Biology"),
    ("Buddh", "Buddhist Studies"),
    ("ChemE", "Chemical Engineering"),
    ("Chem", "Chemistry"),
    ("Chinese", "Chinese"),
    ("City", "City and Regional Planning"),
    ("CEE", "Civil and Environmental Engineering"),
    ("CE", "Civil and Environmental Engineering"),
    ("Classics", "Classics"),
    ("CogSci", "Cognitive Science"),
    ("CWP", "College Writing Program"),
    ("CompLit", "Comparative Literature"),
    ("CS", "Computer Science"),
    ("DS", "Data Science"),
    ("Econ", "Economics"),
    ("Educ", "Education"),
    ("EE", "Electrical Engineering"),
    ("ERG", "Energy and Resources Group"),
    ("Eng", "Engineering"),
    ("English", "English"),
    ("EnvDes", "Environmental Design"),
    ("ESPM", "Environmental Science, Policy, and Management"),
    ("Ethnic", "Ethnic Studies"),
    ("French", "French"),
    ("Geog", "Geography"),
    ("German", "German"),
    ("Hist", "History"),
    ("HistArt", "History of Art"),
    ("IEOR", "Industrial Engineering and Operations Research"),
    ("Info", "Information"),
    ("IB", "Integrative Biology"),
    ("Italian", "Italian Studies"),
    ("Japn", "Japanese"),
    ("Korean", "Korean"),
    ("LA", "Landscape Architecture"),
    ("Ling", "Linguistics"),
    ("MSE", "Materials Science and Engineering"),
    ("Math", "Mathematics"),
    ("ME", "Mechanical Engineering"),
    ("MCB", "Molecular and Cell Biology"),
    ("Music", "Music"),
    ("NES", "Near Eastern Studies"),
    ("NE", "Nuclear Engineering"),
    ("NST", "Nutritional Sciences and Toxicology"),
    ("Phys", "Physics"),
    ("PolSci", "Political Science"),
    ("Psych", "Psychology"),
    ("PH", "Public Health"),
    ("PubPol", "Public Policy"),
    ("Rhet", "Rhetoric"),
    ("Scand", "Scandinavian"),
    ("Soc", "Sociology"),
    ("SAsian", "South Asian"),
    ("Span", "Spanish"),
    ("Stat", "Statistics"),
    ("TDPS", "Theater, Dance, and Performance Studies"),
    ("UGBA", "Undergraduate Business Administration"),
];

/// Natural-language subject names mapped to their canonical prefix.
pub const SUBJECT_SYNONYMS: &[(&str, &str)] = &[
    ("physics", "Phys"),
    ("math", "Math"),
    ("mathematics", "Math"),
    ("computer science", "CS"),
    ("programming", "CS"),
    ("chemistry", "Chem"),
    ("biology", "Bio"),
    ("economics", "Econ"),
    ("statistics", "Stat"),
    ("psychology", "Psych"),
    ("history", "Hist"),
    ("english", "English"),
];

/// Recognized resource-type keywords.
pub const RESOURCE_TYPE_KEYWORDS: &[&str] = &[
    "midterm",
    "final",
    "exam",
    "homework",
    "hw",
    "quiz",
    "lecture",
    "notes",
    "lab",
    "discussion",
    "project",
];

/// Prefix/department directory with its derived reverse mapping.
pub struct PrefixDirectory {
    /// Lowercased prefix -> (canonical prefix, department)
    by_prefix: HashMap<String, (&'static str, &'static str)>,
    /// Department -> prefixes, in table order
    by_department: HashMap<&'static str, Vec<&'static str>>,
}

impl PrefixDirectory {
    fn build() -> Self {
        let mut by_prefix = HashMap::new();
        let mut by_department: HashMap<&'static str, Vec<&'static str>> = HashMap::new();

        for &(prefix, department) in PREFIX_TO_DEPARTMENT {
            by_prefix.insert(prefix.to_lowercase(), (prefix, department));
            by_department.entry(department).or_default().push(prefix);
        }

        Self {
            by_prefix,
            by_department,
        }
    }

    /// All (prefix, department) pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        PREFIX_TO_DEPARTMENT.iter().copied()
    }

    /// Look up the department for a prefix, ignoring case.
    pub fn department_for_prefix(&self, prefix: &str) -> Option<&'static str> {
        self.by_prefix
            .get(&prefix.to_lowercase())
            .map(|&(_, department)| department)
    }

    /// Canonical casing for a prefix, ignoring case.
    pub fn canonical_prefix(&self, prefix: &str) -> Option<&'static str> {
        self.by_prefix
            .get(&prefix.to_lowercase())
            .map(|&(canonical, _)| canonical)
    }

    /// All prefixes mapped to a department.
    pub fn prefixes_for_department(&self, department: &str) -> &[&'static str] {
        self.by_department
            .get(department)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Process-wide read-only directory instance.
pub static DIRECTORY: Lazy<PrefixDirectory> = Lazy::new(PrefixDirectory::build);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_lookup_is_case_insensitive() {
        assert_eq!(DIRECTORY.department_for_prefix("CS"), Some("Computer Science"));
        assert_eq!(DIRECTORY.department_for_prefix("cs"), Some("Computer Science"));
        assert_eq!(DIRECTORY.department_for_prefix("MATH"), Some("Mathematics"));
        assert_eq!(DIRECTORY.department_for_prefix("Nope"), None);
    }

    #[test]
    fn test_canonical_prefix() {
        assert_eq!(DIRECTORY.canonical_prefix("phys"), Some("Phys"));
        assert_eq!(DIRECTORY.canonical_prefix("ugba"), Some("UGBA"));
    }

    #[test]
    fn test_reverse_mapping_handles_shared_departments() {
        let prefixes = DIRECTORY.prefixes_for_department("Civil and Environmental Engineering");
        assert_eq!(prefixes, &["CEE", "CE"]);
        assert!(DIRECTORY.prefixes_for_department("Unknown").is_empty());
    }
}
