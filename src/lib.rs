//! Workspace umbrella crate for EADScope.
//!
//! This crate stitches the stage crates together into one analysis run over
//! a directory of XML finding aids: discover documents, extract structural
//! paths, vectorise, compute cosine affinity, pick or accept a cluster
//! count, partition spectrally, then summarise clusters and optionally score
//! structural anomalies.
//!
//! ```no_run
//! use eadscope::{run_pipeline, AnalysisConfig, RunOptions};
//!
//! let report = run_pipeline("finding-aids", &AnalysisConfig::default(), &RunOptions::default())?;
//! println!("k = {}", report.k);
//! # Ok::<(), eadscope::PipelineError>(())
//! ```

pub mod anomaly;
pub mod config;
pub mod export;
pub mod summary;

use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

pub use corpus::{discover_documents, CorpusConfig, CorpusError, SourceDocument};
pub use features::{
    build_feature_matrix, compute_similarity, FeatureError, FeatureMatrix, FeatureSet,
    SimilarityConfig, SimilarityMatrices, Vocabulary,
};
pub use paths::{extract_from_file, extract_paths, strip_namespace, Element, PathConfig, PathError};
pub use spectral::{
    select_k, silhouette_samples, silhouette_score, CandidateOutcome, ClusterAssignment,
    EigengapReport, KSelection, SelectorConfig, SpectralConfig, SpectralError,
    SpectralPartitioner, SENTINEL_SCORE,
};

pub use crate::anomaly::{score_anomalies, AnomalyConfig, AnomalyRecord};
pub use crate::config::{AnalysisConfig, ConfigLoadError};
pub use crate::export::{write_results, ExportConfig, ExportedFiles, TabularRow};
pub use crate::summary::{summarize_clusters, ClusterReport, ClusterSummary, DocumentRow, SummaryConfig};

/// Errors that can abort an analysis run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("corpus failure: {0}")]
    Corpus(#[from] CorpusError),

    #[error("path extraction failure: {0}")]
    Paths(#[from] PathError),

    #[error("feature matrix failure: {0}")]
    Features(#[from] FeatureError),

    #[error("spectral clustering failure: {0}")]
    Spectral(#[from] SpectralError),

    #[error("configuration failure: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("cluster count k={k} out of range: need 2 <= k < {n} (number of documents)")]
    InvalidK { k: usize, n: usize },

    #[error("top_n must be >= 1 (got {0})")]
    InvalidTopN(usize),

    #[error("misaligned inputs: {0}")]
    MisalignedInputs(String),

    #[error("failed to export {}: {message}", .path.display())]
    Export { path: PathBuf, message: String },
}

/// Per-invocation switches that sit outside the YAML config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Explicit cluster count; skips the selector.
    pub k: Option<usize>,
    /// Run the anomaly scorer.
    pub detect_anomalies: bool,
}

/// Extraction failure for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub index: usize,
    pub id: String,
    pub error: PathError,
}

/// Everything one analysis run produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub documents: Vec<SourceDocument>,
    /// Documents that could not be read or parsed; each kept an all-zero row.
    pub failures: Vec<DocumentFailure>,
    pub features: FeatureSet,
    pub similarity: SimilarityMatrices,
    /// Selector output; `None` when `k` was given explicitly.
    pub selection: Option<KSelection>,
    pub k: usize,
    pub assignment: ClusterAssignment,
    pub clusters: ClusterReport,
    /// Suspects first; `None` unless anomaly scoring was requested.
    pub anomalies: Option<Vec<AnomalyRecord>>,
}

impl AnalysisReport {
    pub fn document_ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }
}

/// Run every stage over the corpus below `root`.
///
/// An explicit `k` is checked against the discovered document count before
/// any document is parsed.
pub fn run_pipeline(
    root: impl AsRef<Path>,
    cfg: &AnalysisConfig,
    opts: &RunOptions,
) -> Result<AnalysisReport, PipelineError> {
    let start = Instant::now();
    cfg.validate()?;

    let documents = discover_documents(root.as_ref(), &cfg.corpus_config())?;
    let n = documents.len();
    if let Some(k) = opts.k {
        if k < 2 || k >= n {
            return Err(PipelineError::InvalidK { k, n });
        }
    }

    let path_cfg = cfg.path_config();
    path_cfg.validate()?;
    let mut failures = Vec::new();
    let mut extracted = Vec::with_capacity(n);
    for doc in &documents {
        let extraction = extract_from_file(&doc.path, &path_cfg);
        if let Some(error) = extraction.failure {
            failures.push(DocumentFailure {
                index: doc.index,
                id: doc.id.clone(),
                error,
            });
        }
        extracted.push(extraction.paths);
    }
    if !failures.is_empty() {
        warn!(
            failed = failures.len(),
            documents = n,
            "documents_kept_as_zero_rows"
        );
    }

    let features = build_feature_matrix(&extracted)?;
    let similarity = compute_similarity(&features.matrix, &cfg.similarity_config());

    let spectral_cfg = cfg.spectral_config();
    let (k, selection) = match opts.k {
        Some(k) => {
            info!(k, "k_explicit");
            (k, None)
        }
        None => {
            let selection = select_k(
                &similarity.affinity,
                &similarity.distance,
                &cfg.selector_config(),
                &spectral_cfg,
            )?;
            (selection.recommended_k, Some(selection))
        }
    };

    let assignment = SpectralPartitioner::new(spectral_cfg).partition(&similarity.affinity, k)?;
    let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
    let clusters = summarize_clusters(
        &assignment,
        &ids,
        &features.matrix,
        &features.vocabulary,
        &cfg.summary_config(),
    )?;

    let anomalies = if opts.detect_anomalies || cfg.anomaly.enabled {
        Some(score_anomalies(
            &similarity.affinity,
            &similarity.distance,
            &assignment,
            &ids,
            &cfg.anomaly_config(),
        )?)
    } else {
        None
    };

    info!(
        documents = n,
        failed = failures.len(),
        vocabulary = features.vocabulary.len(),
        k,
        elapsed_ms = start.elapsed().as_millis(),
        "pipeline_complete"
    );

    Ok(AnalysisReport {
        documents,
        failures,
        features,
        similarity,
        selection,
        k,
        assignment,
        clusters,
        anomalies,
    })
}

/// Write the document table, and the anomaly table when present.
pub fn export_report(
    report: &AnalysisReport,
    cfg: &ExportConfig,
) -> Result<Vec<ExportedFiles>, PipelineError> {
    let mut files = vec![write_results(
        &cfg.out_dir,
        &cfg.results_base,
        &report.clusters.documents,
    )?];
    if let Some(anomalies) = &report.anomalies {
        files.push(write_results(&cfg.out_dir, &cfg.anomalies_base, anomalies)?);
    }
    Ok(files)
}
