use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{RankError, Result};

/// Ranking configuration
///
/// Every field has a default, so a partial (or missing) config file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Elements must score strictly above this to be aggregated
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f64,

    /// Weight given to keywords discovered in JSON-LD
    #[serde(default = "default_learned_weight")]
    pub learned_keyword_weight: f64,

    /// Class name prefixes ignored when building class selectors
    #[serde(default = "default_class_blocklist")]
    pub class_blocklist: Vec<String>,

    /// Number of selectors shown in the text report
    #[serde(default = "default_top_n")]
    pub report_top_n: usize,

    /// JSON-LD bodies larger than this are not parsed
    #[serde(default = "default_max_json_ld_bytes")]
    pub max_json_ld_bytes: usize,

    /// Maximum nesting depth walked when collecting JSON-LD keys
    #[serde(default = "default_max_json_ld_depth")]
    pub max_json_ld_depth: usize,

    /// Most new keywords learned from one document's JSON-LD
    #[serde(default = "default_max_learned_keywords")]
    pub max_learned_keywords: usize,

    /// Additional hand-tuned keywords. Seeded keywords keep their own weight.
    #[serde(default)]
    pub extra_keywords: BTreeMap<String, f64>,
}

fn default_threshold() -> f64 {
    15.0
}

fn default_learned_weight() -> f64 {
    10.0
}

fn default_class_blocklist() -> Vec<String> {
    vec!["ltr-".to_string(), "s-".to_string()]
}

fn default_top_n() -> usize {
    25
}

fn default_max_json_ld_bytes() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_max_json_ld_depth() -> usize {
    64
}

fn default_max_learned_keywords() -> usize {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confidence_threshold: default_threshold(),
            learned_keyword_weight: default_learned_weight(),
            class_blocklist: default_class_blocklist(),
            report_top_n: default_top_n(),
            max_json_ld_bytes: default_max_json_ld_bytes(),
            max_json_ld_depth: default_max_json_ld_depth(),
            max_learned_keywords: default_max_learned_keywords(),
            extra_keywords: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make ranking meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.confidence_threshold.is_finite() || self.confidence_threshold < 0.0 {
            return Err(RankError::ConfigError(format!(
                "confidence_threshold must be a non-negative number, got {}",
                self.confidence_threshold
            )));
        }
        if !(self.learned_keyword_weight > 0.0) {
            return Err(RankError::ConfigError(format!(
                "learned_keyword_weight must be positive, got {}",
                self.learned_keyword_weight
            )));
        }
        if let Some((keyword, weight)) = self.extra_keywords.iter().find(|(_, w)| !(**w > 0.0)) {
            return Err(RankError::ConfigError(format!(
                "extra keyword '{}' must have a positive weight, got {}",
                keyword, weight
            )));
        }
        if self.max_json_ld_depth == 0 {
            return Err(RankError::ConfigError(
                "max_json_ld_depth must be at least 1".into(),
            ));
        }
        if self.max_learned_keywords == 0 {
            return Err(RankError::ConfigError(
                "max_learned_keywords must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Render as TOML for display
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RankError::ConfigError(e.to_string()))
    }

    /// Get the config file path
    ///
    /// Supports ASSETRANK_CONFIG environment variable override
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("ASSETRANK_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "assetrank")
            .ok_or_else(|| RankError::ConfigError("Could not determine config directory".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
