//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub analysis: AnalysisConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum resources returned per query
    pub max_results: usize,
    /// Top-level collection holding course documents
    pub courses_collection: String,
    /// Sub-collection holding exam documents under each course
    pub exams_collection: String,
    /// Store-wide sub-collection of general resources
    pub resources_collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Completion model identifier
    pub model: String,
    /// Maximum tokens for the analysis response
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Firestore project id
    pub project_id: String,
    /// Base URL override (used against emulators in development)
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            analysis: AnalysisConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 15,
            courses_collection: "courses".to_string(),
            exams_collection: "exams".to_string(),
            resources_collection: "resources".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 1024,
            timeout_secs: 10,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            base_url: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = Self::studybase_home()?;
        Ok(home.join("config.toml"))
    }

    /// Get the studybase home directory
    pub fn studybase_home() -> Result<PathBuf> {
        // Check STUDYBASE_HOME env var first
        if let Ok(home) = std::env::var("STUDYBASE_HOME") {
            return Ok(PathBuf::from(home));
        }

        // Use XDG directories
        ProjectDirs::from("dev", "studybase", "studybase")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine studybase home directory".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.max_results, 15);
        assert_eq!(config.search.courses_collection, "courses");
        assert_eq!(config.analysis.max_tokens, 1024);
        assert!(config.store.base_url.is_none());
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.search.max_results, 15);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nmax_results = 12\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.max_results, 12);
        // Untouched sections keep their defaults
        assert_eq!(config.search.exams_collection, "exams");
        assert_eq!(config.analysis.timeout_secs, 10);
    }
}
