//! Per-document structural anomaly scoring.
//!
//! Each document gets a cohesion score (its silhouette width under the
//! current clustering) and a mean affinity to the corpus. The mean is taken
//! over the full affinity row, self cell included, so a well-formed
//! document's own `1.0` counts and an all-zero document scores exactly `0`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use spectral::{silhouette_samples, ClusterAssignment};
use tracing::info;

use crate::PipelineError;

/// Default cutoff for both suspicion criteria.
pub const DEFAULT_SUSPECT_THRESHOLD: f64 = 0.1;

/// Thresholds below which a document is flagged suspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    pub cohesion_threshold: f64,
    pub affinity_threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            cohesion_threshold: DEFAULT_SUSPECT_THRESHOLD,
            affinity_threshold: DEFAULT_SUSPECT_THRESHOLD,
        }
    }
}

impl AnomalyConfig {
    pub fn is_suspect(&self, cohesion: f64, mean_affinity: f64) -> bool {
        cohesion < self.cohesion_threshold || mean_affinity < self.affinity_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub filepath: String,
    pub cluster: usize,
    /// Silhouette width in `[-1, 1]`; `0` when there is only one cluster.
    pub cohesion: f64,
    /// Row mean of the affinity matrix, self cell included.
    pub mean_affinity: f64,
    pub suspect: bool,
}

fn check_shape(name: &str, m: &Array2<f64>, n: usize) -> Result<(), PipelineError> {
    if m.dim() != (n, n) {
        return Err(PipelineError::MisalignedInputs(format!(
            "{name} matrix is {}x{}, expected {n}x{n}",
            m.nrows(),
            m.ncols()
        )));
    }
    Ok(())
}

/// Score every document and return suspects first.
///
/// Within each group (suspect, not suspect) document order is preserved.
pub fn score_anomalies(
    affinity: &Array2<f64>,
    distance: &Array2<f64>,
    assignment: &ClusterAssignment,
    ids: &[String],
    cfg: &AnomalyConfig,
) -> Result<Vec<AnomalyRecord>, PipelineError> {
    let n = assignment.len();
    if ids.len() != n {
        return Err(PipelineError::MisalignedInputs(format!(
            "{n} labels, {} document ids",
            ids.len()
        )));
    }
    check_shape("affinity", affinity, n)?;
    check_shape("distance", distance, n)?;

    let cohesion = if assignment.distinct_clusters() < 2 {
        info!(
            documents = n,
            "only one cluster found, anomaly cohesion score defaulted to 0"
        );
        vec![0.0; n]
    } else {
        silhouette_samples(distance, assignment.labels())?
    };

    let mut records: Vec<AnomalyRecord> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let mean_affinity = if n > 0 { affinity.row(i).sum() / n as f64 } else { 0.0 };
            AnomalyRecord {
                filepath: id.clone(),
                cluster: assignment.labels()[i],
                cohesion: cohesion[i],
                mean_affinity,
                suspect: cfg.is_suspect(cohesion[i], mean_affinity),
            }
        })
        .collect();

    records.sort_by_key(|r| !r.suspect);

    let suspects = records.iter().filter(|r| r.suspect).count();
    info!(documents = n, suspects, "anomalies_scored");
    for r in records.iter().filter(|r| r.suspect) {
        info!(
            filepath = %r.filepath,
            cluster = r.cluster,
            cohesion = r.cohesion,
            mean_affinity = r.mean_affinity,
            "suspect_document"
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("doc{i}.xml")).collect()
    }

    fn pairs_with_orphan() -> Array2<f64> {
        array![
            [1.0, 1.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 1.0, 0.0],
            [0.0, 0.0, 1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0]
        ]
    }

    #[test]
    fn zero_row_document_is_suspect_and_first() {
        let a = pairs_with_orphan();
        let d = a.mapv(|v| (1.0 - v).clamp(0.0, 2.0));
        let assignment = ClusterAssignment::from_labels(vec![0, 0, 1, 1, 1], 2).unwrap();
        let records =
            score_anomalies(&a, &d, &assignment, &ids(5), &AnomalyConfig::default()).unwrap();

        assert_eq!(records[0].filepath, "doc4.xml");
        assert!(records[0].suspect);
        assert_eq!(records[0].mean_affinity, 0.0);
        // Self cell included: 2 ones out of 5.
        let doc0 = records.iter().find(|r| r.filepath == "doc0.xml").unwrap();
        assert!((doc0.mean_affinity - 0.4).abs() < 1e-12);
        assert!((doc0.cohesion - 1.0).abs() < 1e-12);
        assert!(!doc0.suspect);
    }

    #[test]
    fn single_cluster_defaults_cohesion_to_zero() {
        let a = Array2::<f64>::ones((3, 3));
        let d = Array2::<f64>::zeros((3, 3));
        let assignment = ClusterAssignment::from_labels(vec![0, 0, 0], 2).unwrap();
        let records =
            score_anomalies(&a, &d, &assignment, &ids(3), &AnomalyConfig::default()).unwrap();
        assert!(records.iter().all(|r| r.cohesion == 0.0));
        // Cohesion 0 < 0.1, so everyone is suspect.
        assert!(records.iter().all(|r| r.suspect));
        let order: Vec<&str> = records.iter().map(|r| r.filepath.as_str()).collect();
        assert_eq!(order, vec!["doc0.xml", "doc1.xml", "doc2.xml"]);
    }

    #[test]
    fn thresholds_are_tunable() {
        let a = pairs_with_orphan();
        let d = a.mapv(|v| 1.0 - v);
        let assignment = ClusterAssignment::from_labels(vec![0, 0, 1, 1, 1], 2).unwrap();
        let lenient = AnomalyConfig {
            cohesion_threshold: -1.0,
            affinity_threshold: -1.0,
        };
        let records = score_anomalies(&a, &d, &assignment, &ids(5), &lenient).unwrap();
        assert!(records.iter().all(|r| !r.suspect));

        let strict = AnomalyConfig {
            cohesion_threshold: 0.1,
            affinity_threshold: 0.5,
        };
        let records = score_anomalies(&a, &d, &assignment, &ids(5), &strict).unwrap();
        assert!(records.iter().all(|r| r.suspect));
    }

    #[test]
    fn suspects_first_keeps_relative_order() {
        let a = pairs_with_orphan();
        let d = a.mapv(|v| 1.0 - v);
        // Splitting a pair makes both halves poorly cohesive.
        let assignment = ClusterAssignment::from_labels(vec![0, 1, 0, 0, 1], 2).unwrap();
        let records =
            score_anomalies(&a, &d, &assignment, &ids(5), &AnomalyConfig::default()).unwrap();
        let flags: Vec<bool> = records.iter().map(|r| r.suspect).collect();
        let first_clean = flags.iter().position(|s| !s).unwrap_or(flags.len());
        assert!(flags[first_clean..].iter().all(|s| !s));
        let suspects: Vec<usize> = records
            .iter()
            .filter(|r| r.suspect)
            .map(|r| r.filepath[3..4].parse().unwrap())
            .collect();
        let mut sorted = suspects.clone();
        sorted.sort_unstable();
        assert_eq!(suspects, sorted);
    }

    #[test]
    fn misaligned_matrices_rejected() {
        let a = Array2::<f64>::ones((3, 3));
        let d = Array2::<f64>::zeros((2, 2));
        let assignment = ClusterAssignment::from_labels(vec![0, 1, 1], 2).unwrap();
        assert!(matches!(
            score_anomalies(&a, &d, &assignment, &ids(3), &AnomalyConfig::default()),
            Err(PipelineError::MisalignedInputs(_))
        ));
    }
}
