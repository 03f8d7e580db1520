//! Sparse document-by-path count matrix.

use std::time::Instant;

use ndarray::Array2;
use sprs::{CsMat, CsVecView, TriMat};
use tracing::info;

use crate::config::FeatureError;
use crate::vocabulary::Vocabulary;

/// Document-by-path count matrix, stored row-major as a [`CsMat`].
///
/// Row `d` holds the path counts of document `d`; every stored value is
/// positive. A document without paths is an empty row.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    counts: CsMat<f64>,
}

impl PartialEq for FeatureMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.counts.shape() == other.counts.shape()
            && self
                .counts
                .outer_iterator()
                .zip(other.counts.outer_iterator())
                .all(|(a, b)| a.indices() == b.indices() && a.data() == b.data())
    }
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.counts.rows()
    }

    pub fn n_cols(&self) -> usize {
        self.counts.cols()
    }

    /// Number of stored (non-zero) cells.
    pub fn nnz(&self) -> usize {
        self.counts.nnz()
    }

    /// Sparse view of row `d`; `None` when `d` is out of range.
    pub fn row(&self, d: usize) -> Option<CsVecView<'_, f64>> {
        self.counts.outer_view(d)
    }

    /// Count of path `p` in document `d`; zero when not stored.
    pub fn get(&self, d: usize, p: usize) -> f64 {
        self.counts.get(d, p).copied().unwrap_or(0.0)
    }

    pub fn row_sum(&self, d: usize) -> f64 {
        self.row(d).map_or(0.0, |row| row.data().iter().sum())
    }

    pub fn is_zero_row(&self, d: usize) -> bool {
        self.row(d).is_none_or(|row| row.nnz() == 0)
    }

    /// Per-column sums over the selected rows.
    pub fn column_sums(&self, rows: &[usize]) -> Result<Vec<f64>, FeatureError> {
        let mut sums = vec![0.0; self.n_cols()];
        for &d in rows {
            let row = self.row(d).ok_or(FeatureError::RowOutOfRange {
                row: d,
                rows: self.n_rows(),
            })?;
            for (c, &v) in row.iter() {
                sums[c] += v;
            }
        }
        Ok(sums)
    }

    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n_rows(), self.n_cols()));
        for (d, row) in self.counts.outer_iterator().enumerate() {
            for (c, &v) in row.iter() {
                dense[[d, c]] = v;
            }
        }
        dense
    }
}

/// Vocabulary and count matrix built together from one corpus scan.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub vocabulary: Vocabulary,
    pub matrix: FeatureMatrix,
}

/// Build the vocabulary and count matrix from per-document path sequences.
///
/// Documents are scanned in the given order and paths in walk order, which
/// fixes vocabulary indices. Every input document gets a row, including
/// ones with no paths.
pub fn build_feature_matrix<D, S>(documents: &[D]) -> Result<FeatureSet, FeatureError>
where
    D: AsRef<[S]>,
    S: AsRef<str>,
{
    if documents.is_empty() {
        return Err(FeatureError::EmptyCorpus);
    }
    let start = Instant::now();

    let mut vocabulary = Vocabulary::new();
    // One triplet per occurrence; duplicates are summed on conversion.
    let mut occurrences: Vec<(usize, usize)> = Vec::new();
    let mut empty_rows = 0usize;
    for (d, doc) in documents.iter().enumerate() {
        let paths = doc.as_ref();
        if paths.is_empty() {
            empty_rows += 1;
        }
        for path in paths {
            occurrences.push((d, vocabulary.intern(path.as_ref())));
        }
    }

    let mut triplets = TriMat::<f64>::with_capacity(
        (documents.len(), vocabulary.len()),
        occurrences.len(),
    );
    for (d, p) in occurrences {
        triplets.add_triplet(d, p, 1.0);
    }
    let matrix = FeatureMatrix {
        counts: triplets.to_csr(),
    };
    info!(
        documents = matrix.n_rows(),
        paths = matrix.n_cols(),
        nnz = matrix.nnz(),
        empty_rows,
        elapsed_micros = start.elapsed().as_micros(),
        "feature_matrix_built"
    );
    Ok(FeatureSet { vocabulary, matrix })
}
