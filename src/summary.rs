//! Per-cluster membership and dominant structural paths.

use features::{FeatureMatrix, Vocabulary};
use serde::{Deserialize, Serialize};
use spectral::ClusterAssignment;
use tracing::info;

use crate::PipelineError;

/// Paths reported per cluster unless overridden.
pub const DEFAULT_TOP_N: usize = 10;
/// Member ids shown per cluster in the log summary.
pub const DEFAULT_PREVIEW_MEMBERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub top_n: usize,
    pub preview_members: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            preview_members: DEFAULT_PREVIEW_MEMBERS,
        }
    }
}

/// One row of the tabular result: a document and its cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRow {
    pub filepath: String,
    pub cluster: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCount {
    pub index: usize,
    pub path: String,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster: usize,
    /// Member document ids in document order.
    pub members: Vec<String>,
    /// Most frequent paths, highest summed count first.
    pub top_paths: Vec<PathCount>,
}

impl ClusterSummary {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    /// One row per document, in document order.
    pub documents: Vec<DocumentRow>,
    /// One entry per non-empty cluster, ascending cluster id.
    pub clusters: Vec<ClusterSummary>,
}

/// Rank columns by summed count, descending, ties by column index.
/// Zero sums are dropped.
fn top_columns(sums: &[f64], top_n: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = sums
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, s)| *s > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    ranked
}

/// Summarise every cluster of `assignment`.
///
/// `ids`, the matrix rows and the assignment must all describe the same
/// documents in the same order.
pub fn summarize_clusters(
    assignment: &ClusterAssignment,
    ids: &[String],
    matrix: &FeatureMatrix,
    vocabulary: &Vocabulary,
    cfg: &SummaryConfig,
) -> Result<ClusterReport, PipelineError> {
    if cfg.top_n == 0 {
        return Err(PipelineError::InvalidTopN(cfg.top_n));
    }
    if ids.len() != assignment.len() || matrix.n_rows() != assignment.len() {
        return Err(PipelineError::MisalignedInputs(format!(
            "{} labels, {} document ids, {} feature rows",
            assignment.len(),
            ids.len(),
            matrix.n_rows()
        )));
    }

    let documents = ids
        .iter()
        .zip(assignment.labels())
        .map(|(id, &cluster)| DocumentRow {
            filepath: id.clone(),
            cluster,
        })
        .collect();

    info!(
        clusters = assignment.distinct_clusters(),
        documents = assignment.len(),
        "cluster_summary"
    );

    let mut clusters = Vec::new();
    for cluster in 0..assignment.k() {
        let rows = assignment.members(cluster);
        if rows.is_empty() {
            info!(cluster, "cluster_no_documents");
            continue;
        }

        let sums = matrix.column_sums(&rows)?;
        let top_paths: Vec<PathCount> = top_columns(&sums, cfg.top_n)
            .into_iter()
            .map(|(index, count)| PathCount {
                index,
                path: vocabulary
                    .path(index)
                    .map_or_else(|| format!("<unknown {index}>"), str::to_string),
                count,
            })
            .collect();
        let members: Vec<String> = rows.iter().map(|&r| ids[r].clone()).collect();

        info!(
            cluster,
            size = members.len(),
            preview = ?members.iter().take(cfg.preview_members).collect::<Vec<_>>(),
            "cluster_members"
        );
        for p in &top_paths {
            info!(cluster, path = %p.path, count = p.count, "cluster_top_path");
        }

        clusters.push(ClusterSummary {
            cluster,
            members,
            top_paths,
        });
    }

    Ok(ClusterReport {
        documents,
        clusters,
    })
}
