// Multinomial naive Bayes classifier.
//
// Works on non-negative feature vectors (TF-IDF weights or raw counts).
// Fitting accumulates per-class feature totals, smooths them with `alpha`,
// and stores everything in log space so prediction is a dot product per class.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::traits::{Classifier, FeatureVector};

/// A fitted multinomial naive Bayes model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Additive smoothing used during fitting.
    pub alpha: f64,
    /// Class ids in ascending order.
    pub classes: Vec<u32>,
    /// ln P(class), aligned with `classes`.
    pub class_log_prior: Vec<f64>,
    /// ln P(feature | class), one row of `n_features` per class.
    pub feature_log_prob: Vec<Vec<f64>>,
    pub n_features: usize,
}

impl MultinomialNb {
    /// Fit on encoded samples and their class ids.
    pub fn fit(samples: &[FeatureVector], labels: &[u32], alpha: f64) -> Result<Self> {
        if samples.is_empty() {
            anyhow::bail!("Cannot fit a classifier on zero samples");
        }
        if samples.len() != labels.len() {
            anyhow::bail!(
                "Got {} samples but {} labels",
                samples.len(),
                labels.len()
            );
        }
        if alpha.is_nan() || alpha <= 0.0 {
            anyhow::bail!("Smoothing alpha must be positive, got {alpha}");
        }

        let n_features = samples[0].dim();
        if let Some(bad) = samples.iter().find(|s| s.dim() != n_features) {
            anyhow::bail!(
                "Inconsistent feature dimensions: expected {n_features}, got {}",
                bad.dim()
            );
        }

        let mut classes: Vec<u32> = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let mut class_counts = vec![0usize; classes.len()];
        let mut feature_counts = vec![vec![0.0f64; n_features]; classes.len()];

        for (sample, label) in samples.iter().zip(labels) {
            // classes came from labels, so the search always succeeds
            let Ok(c) = classes.binary_search(label) else {
                continue;
            };
            class_counts[c] += 1;
            for &(j, v) in sample.entries() {
                if v < 0.0 {
                    anyhow::bail!("Negative feature value {v} at column {j}");
                }
                feature_counts[c][j] += v;
            }
        }

        let n_samples = samples.len() as f64;
        let class_log_prior: Vec<f64> = class_counts
            .iter()
            .map(|&count| (count as f64 / n_samples).ln())
            .collect();

        let feature_log_prob: Vec<Vec<f64>> = feature_counts
            .iter()
            .map(|row| {
                let denom = (row.iter().sum::<f64>() + alpha * n_features as f64).ln();
                row.iter()
                    .map(|&count| (count + alpha).ln() - denom)
                    .collect::<Vec<f64>>()
            })
            .collect();

        info!(
            samples = samples.len(),
            classes = classes.len(),
            features = n_features,
            "Fitted multinomial naive Bayes"
        );

        Ok(Self {
            alpha,
            classes,
            class_log_prior,
            feature_log_prob,
            n_features,
        })
    }

    /// Unnormalized joint log likelihood per class.
    pub fn joint_log_likelihood(&self, features: &FeatureVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| prior + features.dot(row))
            .collect()
    }

    /// Log posterior per class, normalized with log-sum-exp.
    pub fn predict_log_proba(&self, features: &FeatureVector) -> Vec<f64> {
        let jll = self.joint_log_likelihood(features);
        let max = jll.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let log_sum = max + jll.iter().map(|l| (l - max).exp()).sum::<f64>().ln();
        jll.into_iter().map(|l| l - log_sum).collect()
    }

    /// Posterior probability per class, aligned with `classes`.
    pub fn predict_proba(&self, features: &FeatureVector) -> Vec<f64> {
        self.predict_log_proba(features)
            .into_iter()
            .map(f64::exp)
            .collect()
    }
}

impl Classifier for MultinomialNb {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &FeatureVector) -> u32 {
        let jll = self.joint_log_likelihood(features);
        // Strict > keeps the first (lowest) class on ties.
        let mut best = 0;
        for (c, &score) in jll.iter().enumerate() {
            if score > jll[best] {
                best = c;
            }
        }
        self.classes[best]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(entries: &[(usize, f64)]) -> FeatureVector {
        FeatureVector::from_entries(3, entries.to_vec())
    }

    fn fitted() -> MultinomialNb {
        // column 0 = "free", 1 = "lunch", 2 = "prize"
        let samples = vec![
            v(&[(0, 2.0), (2, 1.0)]),
            v(&[(0, 1.0), (2, 2.0)]),
            v(&[(1, 2.0)]),
            v(&[(1, 1.0), (0, 1.0)]),
        ];
        MultinomialNb::fit(&samples, &[1, 1, 0, 0], 1.0).unwrap()
    }

    #[test]
    fn test_fit_priors_and_likelihoods() {
        let nb = fitted();
        assert_eq!(nb.classes, vec![0, 1]);
        assert!((nb.class_log_prior[0] - 0.5f64.ln()).abs() < 1e-12);

        // class 0 totals: free 1, lunch 3, prize 0 -> (c + 1) / (4 + 3)
        let expected: [f64; 3] = [2.0 / 7.0, 4.0 / 7.0, 1.0 / 7.0];
        for (j, p) in expected.iter().enumerate() {
            assert!((nb.feature_log_prob[0][j] - p.ln()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_predict() {
        let nb = fitted();
        assert_eq!(nb.predict(&v(&[(2, 1.0)])), 1);
        assert_eq!(nb.predict(&v(&[(1, 1.0)])), 0);
    }

    #[test]
    fn test_zero_vector_falls_back_to_prior_tie() {
        let nb = fitted();
        // equal priors -> lowest class id wins
        assert_eq!(nb.predict(&FeatureVector::zeros(3)), 0);
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let nb = fitted();
        let p = nb.predict_proba(&v(&[(0, 1.0), (1, 1.0)]));
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_on_fractional_tfidf_weights() {
        // L2-normalized TF-IDF rows: non-integer weights below 1.0
        let samples = vec![
            v(&[(0, 0.8), (2, 0.6)]),
            v(&[(1, 1.0)]),
            v(&[(0, 0.28), (1, 0.96)]),
        ];
        let nb = MultinomialNb::fit(&samples, &[1, 0, 0], 1.0).unwrap();

        // class 1 totals: 0.8, 0.0, 0.6 -> (c + 1) / (1.4 + 3)
        assert!((nb.feature_log_prob[1][0] - (1.8f64 / 4.4).ln()).abs() < 1e-12);
        assert!((nb.feature_log_prob[1][2] - (1.6f64 / 4.4).ln()).abs() < 1e-12);
        assert_eq!(nb.predict(&v(&[(2, 0.5)])), 1);
        assert_eq!(nb.predict(&v(&[(1, 0.5)])), 0);
    }

    #[test]
    fn test_single_class() {
        let nb = MultinomialNb::fit(&[v(&[(0, 1.0)])], &[1], 1.0).unwrap();
        assert_eq!(nb.predict(&v(&[(1, 1.0)])), 1);
    }

    #[test]
    fn test_fit_errors() {
        assert!(MultinomialNb::fit(&[], &[], 1.0).is_err());
        assert!(MultinomialNb::fit(&[v(&[])], &[0, 1], 1.0).is_err());
        assert!(MultinomialNb::fit(&[v(&[])], &[0], 0.0).is_err());
        let mixed = vec![v(&[]), FeatureVector::zeros(5)];
        assert!(MultinomialNb::fit(&mixed, &[0, 1], 1.0).is_err());
    }
}
