// Encoder and classifier traits — the narrow seams the inference path uses.
//
// The service only ever asks "text -> vector" and "vector -> class id", so
// anything satisfying these two traits can be dropped in (the TF-IDF and
// naive Bayes implementations are the defaults, tests use tiny fakes).

/// A sparse feature vector with a fixed declared dimension.
///
/// Entries are `(index, value)` pairs sorted by index, with no duplicates
/// and every index below `dim`. Absent indices are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// The all-zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build a vector from unsorted entries. Duplicate indices are summed,
    /// zero values are dropped, and out-of-range indices are discarded.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(i, v)| i < dim && v != 0.0);
        entries.sort_by_key(|&(i, _)| i);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (i, v) in entries {
            if let Some((last, acc)) = merged.last_mut() {
                if *last == i {
                    *acc += v;
                    continue;
                }
            }
            merged.push((i, v));
        }
        merged.retain(|&(_, v)| v != 0.0);

        Self {
            dim,
            entries: merged,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Non-zero entries in ascending index order.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product with a dense row of the same dimension.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(i, v)| v * dense.get(i).copied().unwrap_or(0.0))
            .sum()
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(i, v) in &self.entries {
            dense[i] = v;
        }
        dense
    }
}

/// Maps text to a fixed-dimension feature vector.
pub trait FeatureEncoder: Send + Sync {
    /// Dimension of every vector this encoder produces.
    fn dim(&self) -> usize;

    /// Encode one text. Never fails: unknown content encodes to zeros.
    fn encode(&self, text: &str) -> FeatureVector;
}

/// Maps a feature vector to a class id.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier was fitted on.
    fn n_features(&self) -> usize;

    /// Predict the class id for one vector.
    fn predict(&self, features: &FeatureVector) -> u32;
}
