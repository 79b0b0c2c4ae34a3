use crate::error::{Result as TechfindResult, TechfindError};
use crate::search_algorithms::Algorithm;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CORPUS_PATH: &str = "data/pentest_data.json";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub corpus: CorpusConfig,
}

/// Everything the search engine needs to know, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub algorithm: Algorithm,
    pub max_results: usize,
    pub min_query_length: usize,
    /// Only consulted by the fuzzy strategy.
    pub fuzzy_threshold: u8,
    /// Cached distinct queries; 0 disables the result cache.
    pub cache_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::BoyerMoore,
            max_results: 5,
            min_query_length: 2,
            fuzzy_threshold: 60,
            cache_size: 128,
        }
    }
}

impl EngineConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn validate(&self) -> TechfindResult<()> {
        if self.max_results == 0 {
            return Err(TechfindError::Config(
                "max_results must be at least 1".to_string(),
            ));
        }
        if self.fuzzy_threshold > 100 {
            return Err(TechfindError::Config(format!(
                "fuzzy_threshold must be within 0..=100, got {}",
                self.fuzzy_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub path: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CORPUS_PATH),
        }
    }
}

impl Config {
    /// Load from `explicit` if given, otherwise from the first config file
    /// found, otherwise defaults. A file that exists but does not parse is an
    /// error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_path(),
        };

        if let Some(path) = config_path {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> TechfindResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.engine.validate()?;
        Ok(config)
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("techfind/config.toml");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".techfind.toml");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(".techfind.toml");
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_follow_documented_policy() {
        let engine = EngineConfig::default();
        assert_eq!(engine.algorithm, Algorithm::BoyerMoore);
        assert_eq!(engine.max_results, 5);
        assert_eq!(engine.min_query_length, 2);
        assert_eq!(engine.fuzzy_threshold, 60);
        assert!(engine.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str(
            "[engine]\nalgorithm = \"fuzzy\"\nfuzzy_threshold = 70\n\n[corpus]\npath = \"kb.json\"\n",
        )
        .unwrap();
        assert_eq!(config.engine.algorithm, Algorithm::Fuzzy);
        assert_eq!(config.engine.fuzzy_threshold, 70);
        assert_eq!(config.engine.max_results, 5);
        assert_eq!(config.corpus.path, PathBuf::from("kb.json"));
    }

    #[test]
    fn unknown_algorithm_fails_fast() {
        let err = Config::from_toml_str("[engine]\nalgorithm = \"soundex\"\n").unwrap_err();
        assert!(err.to_string().contains("soundex"));
    }

    #[test]
    fn invalid_limits_are_rejected() {
        assert!(Config::from_toml_str("[engine]\nmax_results = 0\n").is_err());
        assert!(Config::from_toml_str("[engine]\nfuzzy_threshold = 101\n").is_err());
    }

    #[test]
    fn save_then_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut config = Config::default();
        config.engine.algorithm = Algorithm::Kmp;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/techfind.toml"))).is_err());
    }
}
