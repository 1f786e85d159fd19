// TF-IDF vectorizer.
//
// Tokens are runs of two or more word characters, lowercased. The vocabulary
// is every token seen while fitting, indexed in sorted order. Weights are raw
// term counts times a smoothed IDF, L2-normalized per document:
//
//   idf(t) = ln((1 + n_docs) / (1 + df(t))) + 1

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::traits::{FeatureEncoder, FeatureVector};
use crate::text::Preprocess;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

/// Split text into lowercase tokens of at least two word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A fitted TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Preprocessing the training texts went through before fitting.
    pub preprocess: Preprocess,
    /// Token -> column index.
    pub vocabulary: BTreeMap<String, usize>,
    /// IDF weight per column.
    pub idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit on a corpus of (already preprocessed) documents.
    ///
    /// `preprocess` is only recorded, not applied: callers hand in the texts
    /// exactly as the vectorizer should see them.
    pub fn fit(documents: &[String], preprocess: Preprocess) -> Result<Self> {
        if documents.is_empty() {
            anyhow::bail!("Cannot fit a vectorizer on an empty corpus");
        }

        // Document frequency: in how many documents does each token appear?
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let mut seen: Vec<String> = tokenize(doc);
            seen.sort();
            seen.dedup();
            for token in seen {
                *doc_freq.entry(token).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            anyhow::bail!(
                "Empty vocabulary: none of the {} documents contain a token of two or more letters",
                documents.len()
            );
        }

        let n_docs = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        // BTreeMap iterates in sorted order, so indices follow token order.
        for (index, (token, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(token, index);
        }

        info!(
            documents = documents.len(),
            features = vocabulary.len(),
            "Fitted TF-IDF vectorizer"
        );

        Ok(Self {
            preprocess,
            vocabulary,
            idf,
        })
    }

    /// Encode many documents.
    pub fn transform(&self, documents: &[String]) -> Vec<FeatureVector> {
        documents.iter().map(|d| self.encode(d)).collect()
    }
}

impl FeatureEncoder for TfidfVectorizer {
    fn dim(&self) -> usize {
        self.idf.len()
    }

    fn encode(&self, text: &str) -> FeatureVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(i, tf)| (i, tf * self.idf[i]))
            .collect();

        let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return FeatureVector::zeros(self.dim());
        }

        let normalized = weighted.into_iter().map(|(i, w)| (i, w / norm)).collect();
        FeatureVector::from_entries(self.dim(), normalized)
    }
}
