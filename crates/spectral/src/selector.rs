//! Cluster-count selection by silhouette sweep, with an eigengap hint.
//!
//! Every candidate `k` in the search range is clustered from one shared
//! spectral embedding and scored by mean silhouette width over the distance
//! matrix. A candidate that collapses into a single cluster, or whose
//! clustering or scoring fails, is recorded with [`SENTINEL_SCORE`] and the
//! sweep carries on. The best strictly-greater score wins, so ties go to
//! the smaller `k`.

use std::ops::RangeInclusive;
use std::time::Instant;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{SelectorConfig, SpectralConfig};
use crate::embedding::SpectralEmbedding;
use crate::error::SpectralError;
use crate::laplacian::check_square;
use crate::partition::{ClusterAssignment, SpectralPartitioner};
use crate::silhouette::silhouette_score;

/// Score recorded for degenerate or failed candidates; no valid silhouette
/// mean falls below it.
pub const SENTINEL_SCORE: f64 = -1.0;

/// What happened when one candidate `k` was evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    Scored { score: f64 },
    /// Every document landed in the same cluster.
    SingleCluster,
    Failed { reason: String },
}

impl CandidateOutcome {
    pub fn score(&self) -> f64 {
        match self {
            CandidateOutcome::Scored { score } => *score,
            CandidateOutcome::SingleCluster | CandidateOutcome::Failed { .. } => SENTINEL_SCORE,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, CandidateOutcome::Scored { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub k: usize,
    pub outcome: CandidateOutcome,
}

impl CandidateScore {
    pub fn score(&self) -> f64 {
        self.outcome.score()
    }
}

/// Gap between consecutive Laplacian eigenvalues `λ[k] - λ[k-1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenGap {
    pub k: usize,
    pub gap: f64,
}

/// Advisory eigengap diagnostic. Never overrides the silhouette choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigengapReport {
    /// All Laplacian eigenvalues, ascending.
    pub eigenvalues: Vec<f64>,
    /// Gaps for every `k` in the search range.
    pub gaps: Vec<EigenGap>,
    /// `k` with the largest gap (smaller `k` on ties), if the range had any.
    pub suggested_k: Option<usize>,
}

impl EigengapReport {
    pub fn from_eigenvalues(eigenvalues: Vec<f64>, range: RangeInclusive<usize>) -> Self {
        let gaps: Vec<EigenGap> = range
            .filter(|k| *k >= 1 && *k < eigenvalues.len())
            .map(|k| EigenGap {
                k,
                gap: eigenvalues[k] - eigenvalues[k - 1],
            })
            .collect();
        let mut suggested: Option<&EigenGap> = None;
        for g in &gaps {
            if suggested.is_none_or(|best| g.gap > best.gap) {
                suggested = Some(g);
            }
        }
        let suggested_k = suggested.map(|g| g.k);
        Self {
            eigenvalues,
            gaps,
            suggested_k,
        }
    }
}

/// Result of a cluster-count sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KSelection {
    /// One entry per candidate, ascending `k`.
    pub candidates: Vec<CandidateScore>,
    pub recommended_k: usize,
    pub eigengap: Option<EigengapReport>,
}

impl KSelection {
    pub fn recommended_score(&self) -> f64 {
        self.candidates
            .iter()
            .find(|c| c.k == self.recommended_k)
            .map_or(SENTINEL_SCORE, CandidateScore::score)
    }
}

/// Candidate range `[k_min, min(k_max, n - 1)]`.
pub fn candidate_range(
    cfg: &SelectorConfig,
    n_documents: usize,
) -> Result<RangeInclusive<usize>, SpectralError> {
    cfg.validate()?;
    let k_max = cfg.k_max.min(n_documents.saturating_sub(1));
    if cfg.k_min > k_max {
        return Err(SpectralError::EmptySearchRange {
            k_min: cfg.k_min,
            k_max: cfg.k_max,
            n: n_documents,
        });
    }
    Ok(cfg.k_min..=k_max)
}

/// Eigengap diagnostic of an already decomposed embedding over `range`.
pub fn eigengap(embedding: &SpectralEmbedding, range: RangeInclusive<usize>) -> EigengapReport {
    EigengapReport::from_eigenvalues(embedding.eigenvalues().to_vec(), range)
}

/// Silhouette outcome of one clustering.
fn score_assignment(assignment: &ClusterAssignment, distance: &Array2<f64>) -> CandidateOutcome {
    if assignment.distinct_clusters() < 2 {
        return CandidateOutcome::SingleCluster;
    }
    match silhouette_score(distance, assignment.labels()) {
        Ok(score) => CandidateOutcome::Scored { score },
        Err(e) => CandidateOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

fn evaluate(
    partitioner: &SpectralPartitioner,
    embedding: &SpectralEmbedding,
    distance: &Array2<f64>,
    k: usize,
) -> CandidateOutcome {
    match partitioner.partition_embedding(embedding, k) {
        Ok(assignment) => score_assignment(&assignment, distance),
        Err(e) => CandidateOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

/// Evaluate every `k` in `range`. Without an embedding every candidate fails.
fn sweep(
    partitioner: &SpectralPartitioner,
    embedding: Option<&SpectralEmbedding>,
    distance: &Array2<f64>,
    range: RangeInclusive<usize>,
) -> Vec<CandidateScore> {
    range
        .map(|k| {
            let outcome = match embedding {
                Some(emb) => evaluate(partitioner, emb, distance, k),
                None => CandidateOutcome::Failed {
                    reason: "spectral embedding unavailable".into(),
                },
            };
            match &outcome {
                CandidateOutcome::Scored { score } => info!(k, score, "k_candidate_scored"),
                CandidateOutcome::SingleCluster => {
                    warn!(k, score = SENTINEL_SCORE, "k_candidate_single_cluster")
                }
                CandidateOutcome::Failed { reason } => {
                    warn!(k, score = SENTINEL_SCORE, reason = %reason, "k_candidate_failed")
                }
            }
            CandidateScore { k, outcome }
        })
        .collect()
}

/// Highest-scoring candidate, smaller `k` on ties. Falls back to `fallback_k`
/// with [`SENTINEL_SCORE`] when no candidate was scored.
fn recommend(candidates: &[CandidateScore], fallback_k: usize) -> (usize, f64) {
    let mut best: Option<&CandidateScore> = None;
    for c in candidates.iter().filter(|c| c.outcome.is_scored()) {
        if best.is_none_or(|b| c.score() > b.score()) {
            best = Some(c);
        }
    }
    best.map_or((fallback_k, SENTINEL_SCORE), |c| (c.k, c.score()))
}

/// Sweep the candidate range and recommend a cluster count.
///
/// Fails only on rejected input: non-square or misaligned matrices,
/// invalid configs, or an empty search range.
pub fn select_k(
    affinity: &Array2<f64>,
    distance: &Array2<f64>,
    selector: &SelectorConfig,
    spectral: &SpectralConfig,
) -> Result<KSelection, SpectralError> {
    let start = Instant::now();
    spectral.validate()?;
    let n = check_square(affinity)?;
    let (rows, cols) = distance.dim();
    if rows != n || cols != n {
        return Err(SpectralError::Misaligned {
            rows,
            cols,
            expected: n,
        });
    }
    let range = candidate_range(selector, n)?;

    let partitioner = SpectralPartitioner::new(spectral.clone());
    let embedding = match SpectralEmbedding::compute(affinity) {
        Ok(e) => Some(e),
        Err(e) => {
            warn!(error = %e, "spectral_embedding_failed");
            None
        }
    };

    let candidates = sweep(&partitioner, embedding.as_ref(), distance, range.clone());
    let (recommended_k, best) = recommend(&candidates, *range.start());

    let eigengap = match (&embedding, selector.eigengap) {
        (Some(emb), true) => Some(eigengap(emb, range)),
        _ => None,
    };

    info!(
        recommended_k,
        score = best,
        candidates = candidates.len(),
        scored = candidates.iter().filter(|c| c.outcome.is_scored()).count(),
        eigengap_k = eigengap.as_ref().and_then(|g| g.suggested_k),
        elapsed_micros = start.elapsed().as_micros(),
        "k_selected"
    );

    Ok(KSelection {
        candidates,
        recommended_k,
        eigengap,
    })
}
