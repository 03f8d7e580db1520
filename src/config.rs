//! YAML Configuration File Support for EADScope
//!
//! This module loads a whole analysis configuration from one YAML file:
//! corpus discovery, path extraction, similarity, spectral clustering,
//! cluster-count selection, summaries, anomaly scoring and export. Every
//! section and every field is optional and falls back to the defaults below.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # EADScope analysis configuration
//! version: "1.0"
//! name: "departmental finding aids"
//!
//! corpus:
//!   extensions: ["xml"]
//!   recursive: true
//!   follow_links: false
//!
//! paths:
//!   separator: "/"
//!   max_depth: 10000
//!
//! features:
//!   use_parallel: false
//!
//! spectral:
//!   seed: 42
//!   n_init: 10
//!   max_iter: 300
//!
//! selector:
//!   k_min: 2
//!   k_max: 15
//!   eigengap: true
//!
//! summary:
//!   top_n: 10
//!   preview_members: 5
//!
//! anomaly:
//!   enabled: false
//!   cohesion_threshold: 0.1
//!   affinity_threshold: 0.1
//!
//! export:
//!   enabled: true
//!   out_dir: "results"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use corpus::CorpusConfig;
use paths::PathConfig;
use features::SimilarityConfig;
use serde::{Deserialize, Serialize};
use spectral::{SelectorConfig, SpectralConfig};
use thiserror::Error;

use crate::anomaly::AnomalyConfig;
use crate::export::ExportConfig;
use crate::summary::SummaryConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub corpus: CorpusYamlConfig,

    #[serde(default)]
    pub paths: PathsYamlConfig,

    #[serde(default)]
    pub features: FeaturesYamlConfig,

    #[serde(default)]
    pub spectral: SpectralYamlConfig,

    #[serde(default)]
    pub selector: SelectorYamlConfig,

    #[serde(default)]
    pub summary: SummaryYamlConfig,

    #[serde(default)]
    pub anomaly: AnomalyYamlConfig,

    #[serde(default)]
    pub export: ExportYamlConfig,
}

impl AnalysisConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: AnalysisConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.corpus.validate()?;
        self.paths.validate()?;
        self.spectral.validate()?;
        self.selector.validate()?;
        self.summary.validate()?;
        self.anomaly.validate()?;
        self.export.validate()?;

        Ok(())
    }

    pub fn corpus_config(&self) -> CorpusConfig {
        CorpusConfig::new()
            .with_extensions(self.corpus.extensions.iter().cloned())
            .with_recursive(self.corpus.recursive)
            .with_follow_links(self.corpus.follow_links)
    }

    pub fn path_config(&self) -> PathConfig {
        self.paths.to_path_config()
    }

    pub fn similarity_config(&self) -> SimilarityConfig {
        SimilarityConfig::new().with_parallel(self.features.use_parallel)
    }

    pub fn spectral_config(&self) -> SpectralConfig {
        self.spectral.to_spectral_config()
    }

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig::new()
            .with_range(self.selector.k_min, self.selector.k_max)
            .with_eigengap(self.selector.eigengap)
    }

    pub fn summary_config(&self) -> SummaryConfig {
        SummaryConfig {
            top_n: self.summary.top_n,
            preview_members: self.summary.preview_members,
        }
    }

    pub fn anomaly_config(&self) -> AnomalyConfig {
        AnomalyConfig {
            cohesion_threshold: self.anomaly.cohesion_threshold,
            affinity_threshold: self.anomaly.affinity_threshold,
        }
    }

    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            out_dir: self.export.out_dir.clone(),
            results_base: self.export.results_base.clone(),
            anomalies_base: self.export.anomalies_base.clone(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            corpus: CorpusYamlConfig::default(),
            paths: PathsYamlConfig::default(),
            features: FeaturesYamlConfig::default(),
            spectral: SpectralYamlConfig::default(),
            selector: SelectorYamlConfig::default(),
            summary: SummaryYamlConfig::default(),
            anomaly: AnomalyYamlConfig::default(),
            export: ExportYamlConfig::default(),
        }
    }
}

/// Corpus discovery YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusYamlConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "true_value")]
    pub recursive: bool,

    #[serde(default)]
    pub follow_links: bool,
}

impl CorpusYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        CorpusConfig::new()
            .with_extensions(self.extensions.iter().cloned())
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("corpus: {e}")))
    }
}

impl Default for CorpusYamlConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            recursive: true,
            follow_links: false,
        }
    }
}

/// Path extraction YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsYamlConfig {
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl PathsYamlConfig {
    fn to_path_config(&self) -> PathConfig {
        PathConfig::new()
            .with_separator(self.separator.clone())
            .with_max_depth(self.max_depth)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_path_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("paths: {e}")))
    }
}

impl Default for PathsYamlConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            max_depth: default_max_depth(),
        }
    }
}

/// Similarity engine YAML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturesYamlConfig {
    #[serde(default)]
    pub use_parallel: bool,
}

/// Spectral partitioner YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralYamlConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_n_init")]
    pub n_init: usize,

    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    #[serde(default = "default_tol")]
    pub tol: f64,
}

impl SpectralYamlConfig {
    fn to_spectral_config(&self) -> SpectralConfig {
        SpectralConfig {
            seed: self.seed,
            n_init: self.n_init,
            max_iter: self.max_iter,
            tol: self.tol,
        }
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_spectral_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("spectral: {e}")))
    }
}

impl Default for SpectralYamlConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            n_init: default_n_init(),
            max_iter: default_max_iter(),
            tol: default_tol(),
        }
    }
}

/// Cluster-count selector YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorYamlConfig {
    #[serde(default = "default_k_min")]
    pub k_min: usize,

    #[serde(default = "default_k_max")]
    pub k_max: usize,

    #[serde(default = "true_value")]
    pub eigengap: bool,
}

impl SelectorYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        SelectorConfig::new()
            .with_range(self.k_min, self.k_max)
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("selector: {e}")))
    }
}

impl Default for SelectorYamlConfig {
    fn default() -> Self {
        Self {
            k_min: default_k_min(),
            k_max: default_k_max(),
            eigengap: true,
        }
    }
}

/// Cluster summary YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryYamlConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Member ids listed per cluster in the log summary.
    #[serde(default = "default_preview_members")]
    pub preview_members: usize,
}

impl SummaryYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.top_n == 0 {
            return Err(ConfigLoadError::Validation(
                "summary.top_n must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SummaryYamlConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            preview_members: default_preview_members(),
        }
    }
}

/// Anomaly scorer YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyYamlConfig {
    /// Run the anomaly scorer even without `--detect-anomalies`.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_threshold")]
    pub cohesion_threshold: f64,

    #[serde(default = "default_threshold")]
    pub affinity_threshold: f64,
}

impl AnomalyYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !self.cohesion_threshold.is_finite() {
            return Err(ConfigLoadError::Validation(
                "anomaly.cohesion_threshold must be finite".to_string(),
            ));
        }
        if !self.affinity_threshold.is_finite() {
            return Err(ConfigLoadError::Validation(
                "anomaly.affinity_threshold must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnomalyYamlConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cohesion_threshold: default_threshold(),
            affinity_threshold: default_threshold(),
        }
    }
}

/// Result export YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportYamlConfig {
    #[serde(default = "true_value")]
    pub enabled: bool,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_results_base")]
    pub results_base: String,

    #[serde(default = "default_anomalies_base")]
    pub anomalies_base: String,
}

impl ExportYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        for (field, base) in [
            ("results_base", &self.results_base),
            ("anomalies_base", &self.anomalies_base),
        ] {
            if base.trim().is_empty() || base.contains(['/', '\\']) {
                return Err(ConfigLoadError::Validation(format!(
                    "export.{field} must be a non-empty file name stem (got {base:?})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ExportYamlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            out_dir: default_out_dir(),
            results_base: default_results_base(),
            anomalies_base: default_anomalies_base(),
        }
    }
}

// Default value functions
fn true_value() -> bool {
    true
}
fn default_extensions() -> Vec<String> {
    vec![corpus::DEFAULT_EXTENSION.to_string()]
}
fn default_separator() -> String {
    paths::DEFAULT_SEPARATOR.to_string()
}
fn default_max_depth() -> usize {
    paths::DEFAULT_MAX_DEPTH
}
fn default_seed() -> u64 {
    spectral::DEFAULT_SEED
}
fn default_n_init() -> usize {
    spectral::DEFAULT_N_INIT
}
fn default_max_iter() -> usize {
    spectral::DEFAULT_MAX_ITER
}
fn default_tol() -> f64 {
    spectral::DEFAULT_TOL
}
fn default_k_min() -> usize {
    spectral::DEFAULT_K_MIN
}
fn default_k_max() -> usize {
    spectral::DEFAULT_K_MAX
}
fn default_top_n() -> usize {
    crate::summary::DEFAULT_TOP_N
}
fn default_preview_members() -> usize {
    crate::summary::DEFAULT_PREVIEW_MEMBERS
}
fn default_threshold() -> f64 {
    crate::anomaly::DEFAULT_SUSPECT_THRESHOLD
}
fn default_out_dir() -> PathBuf {
    PathBuf::from(crate::export::DEFAULT_OUT_DIR)
}
fn default_results_base() -> String {
    crate::export::DEFAULT_RESULTS_BASE.to_string()
}
fn default_anomalies_base() -> String {
    crate::export::DEFAULT_ANOMALIES_BASE.to_string()
}
