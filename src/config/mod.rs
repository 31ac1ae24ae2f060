//! Configuration for veracity
//!
//! Settings are read from `veracity.toml`. Lookup order:
//! 1. The path given with `--config` (errors are fatal)
//! 2. `./veracity.toml`
//! 3. `~/.config/veracity/config.toml`
//!
//! Missing files fall back to defaults; an unparsable file found by lookup is
//! reported with a warning and skipped.
//!
//! # Configuration Format
//!
//! ```toml
//! [vocabulary]
//! stop_words = "include"   # or "exclude"
//!
//! [overuse]
//! ratio = 5.0
//! min_occurrences = 3
//! min_word_length = 4
//!
//! [divergence]
//! smoothing = 1e-5
//!
//! [bootstrap]
//! samples = 0
//! seed = 42
//! buckets = 10
//! max_batch = 10000
//!
//! [display]
//! top_words = 15
//!
//! [reference]
//! path = "reference.tsv"
//!
//! [lexicon]
//! path = "loaded_terms.txt"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::text::StopWordPolicy;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "veracity.toml";

/// Example written by `veracity init`
pub const EXAMPLE_CONFIG: &str = r#"# veracity configuration

[vocabulary]
# "include" counts every word in the distribution used for entropy and KL
# divergence; "exclude" drops common function words first. Changing this
# shifts both metrics, so keep it fixed when comparing results.
stop_words = "include"

[overuse]
# A word is overused when its share of the text exceeds `ratio` times its
# (smoothed) reference share. Stop words are never flagged.
ratio = 5.0
min_occurrences = 3
min_word_length = 4

[divergence]
# Additive smoothing for words missing from the reference model
smoothing = 1e-5

[bootstrap]
# Resamples run during `analyze` (0 disables)
samples = 0
# seed = 42
buckets = 10
# Largest batch one `bootstrap_batch` request may ask for
max_batch = 10000

[display]
top_words = 15

# [reference]
# path = "reference.tsv"      # word<TAB>count per line

# [lexicon]
# path = "loaded_terms.txt"   # one loaded term per line
"#;

/// Complete analysis configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub overuse: OveruseConfig,
    #[serde(default)]
    pub divergence: DivergenceConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub reference: DataFileConfig,
    #[serde(default)]
    pub lexicon: DataFileConfig,

    /// Directory of the file this config came from (not serialized)
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VocabularyConfig {
    pub stop_words: StopWordPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OveruseConfig {
    /// Multiple of the reference frequency a word must exceed
    pub ratio: f64,
    pub min_occurrences: usize,
    /// Minimum length in characters
    pub min_word_length: usize,
}

impl Default for OveruseConfig {
    fn default() -> Self {
        Self {
            ratio: 5.0,
            min_occurrences: 3,
            min_word_length: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DivergenceConfig {
    pub smoothing: f64,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self { smoothing: 1e-5 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Internal resamples run by `analyze` (0 = off)
    pub samples: usize,
    pub seed: Option<u64>,
    /// Histogram buckets for bootstrap output
    pub buckets: usize,
    /// Upper bound on samples per server batch request
    pub max_batch: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            samples: 0,
            seed: None,
            buckets: 10,
            max_batch: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Words shown in frequency tables
    pub top_words: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { top_words: 15 }
    }
}

/// Optional replacement for an embedded data file
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DataFileConfig {
    pub path: Option<PathBuf>,
}

impl AnalysisConfig {
    /// Parse a TOML string and validate it
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file; relative data paths resolve against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Reject values that would make the statistics meaningless
    pub fn validate(&self) -> Result<()> {
        if !(self.overuse.ratio.is_finite() && self.overuse.ratio > 0.0) {
            anyhow::bail!("overuse.ratio must be a positive number");
        }
        if self.overuse.min_occurrences == 0 {
            anyhow::bail!("overuse.min_occurrences must be at least 1");
        }
        let s = self.divergence.smoothing;
        if !(s.is_finite() && s > 0.0 && s < 1.0) {
            anyhow::bail!("divergence.smoothing must be in (0, 1)");
        }
        if self.bootstrap.buckets == 0 {
            anyhow::bail!("bootstrap.buckets must be at least 1");
        }
        if self.bootstrap.max_batch == 0 {
            anyhow::bail!("bootstrap.max_batch must be at least 1");
        }
        Ok(())
    }

    /// Reference table path, resolved against the config file directory
    pub fn reference_path(&self) -> Option<PathBuf> {
        self.reference.path.as_deref().map(|p| self.resolve(p))
    }

    /// Lexicon path, resolved against the config file directory
    pub fn lexicon_path(&self) -> Option<PathBuf> {
        self.lexicon.path.as_deref().map(|p| self.resolve(p))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// User-level config location
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("veracity").join("config.toml"))
}

/// Load configuration following the documented lookup order
pub fn load_config(explicit: Option<&Path>) -> Result<AnalysisConfig> {
    if let Some(path) = explicit {
        let config = AnalysisConfig::load(path)?;
        debug!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let candidates = [Some(PathBuf::from(CONFIG_FILE_NAME)), user_config_path()];
    for path in candidates.into_iter().flatten() {
        if !path.exists() {
            continue;
        }
        match AnalysisConfig::load(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", path.display(), e);
            }
        }
    }

    debug!("No config found, using defaults");
    Ok(AnalysisConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.vocabulary.stop_words, StopWordPolicy::Include);
        assert_eq!(config.overuse.ratio, 5.0);
        assert_eq!(config.overuse.min_occurrences, 3);
        assert_eq!(config.divergence.smoothing, 1e-5);
        assert_eq!(config.bootstrap.samples, 0);
        assert_eq!(config.display.top_words, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_config_parses() {
        let config = AnalysisConfig::from_toml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.bootstrap.buckets, 10);
        assert_eq!(config.bootstrap.max_batch, 10_000);
        assert!(config.reference.path.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = AnalysisConfig::from_toml(
            r#"
[vocabulary]
stop_words = "exclude"

[overuse]
ratio = 8.0
"#,
        )
        .unwrap();
        assert_eq!(config.vocabulary.stop_words, StopWordPolicy::Exclude);
        assert_eq!(config.overuse.ratio, 8.0);
        assert_eq!(config.overuse.min_occurrences, 3);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(AnalysisConfig::from_toml("[divergence]\nsmoothing = 0.0\n").is_err());
        assert!(AnalysisConfig::from_toml("[overuse]\nratio = -1.0\n").is_err());
        assert!(AnalysisConfig::from_toml("[bootstrap]\nbuckets = 0\n").is_err());
        assert!(AnalysisConfig::from_toml("[bootstrap]\nmax_batch = 0\n").is_err());
        assert!(AnalysisConfig::from_toml("[vocabulary]\nstop_words = \"sometimes\"\n").is_err());
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veracity.toml");
        std::fs::write(&path, "[reference]\npath = \"ref.tsv\"\n").unwrap();
        let config = AnalysisConfig::load(&path).unwrap();
        assert_eq!(config.reference_path(), Some(dir.path().join("ref.tsv")));
        assert!(config.lexicon_path().is_none());
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
