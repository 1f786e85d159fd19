// Training: fit the vectorizer and classifier on a labelled corpus and
// persist both artifacts.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::artifact::save_artifact;
use super::naive_bayes::MultinomialNb;
use super::tfidf::TfidfVectorizer;
use crate::text::Preprocess;

/// Knobs for a training run.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Preprocessing applied to every text before fitting (and recorded for
    /// inference).
    pub preprocess: Preprocess,
    /// Additive smoothing for naive Bayes.
    pub alpha: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            preprocess: Preprocess::Clean,
            alpha: 1.0,
        }
    }
}

/// Fit both models in memory.
pub fn train_model(
    texts: &[String],
    labels: &[u32],
    options: &TrainOptions,
) -> Result<(MultinomialNb, TfidfVectorizer)> {
    if texts.len() != labels.len() {
        anyhow::bail!("Got {} texts but {} labels", texts.len(), labels.len());
    }

    let prepared: Vec<String> = texts
        .iter()
        .map(|t| options.preprocess.apply(t).into_owned())
        .collect();

    let vectorizer = TfidfVectorizer::fit(&prepared, options.preprocess)?;
    let features = vectorizer.transform(&prepared);
    let model = MultinomialNb::fit(&features, labels, options.alpha)?;

    Ok((model, vectorizer))
}

/// Fit both models and write them to `model_path` / `vectorizer_path`.
pub fn train_and_save_model(
    texts: &[String],
    labels: &[u32],
    model_path: &Path,
    vectorizer_path: &Path,
    options: &TrainOptions,
) -> Result<(MultinomialNb, TfidfVectorizer)> {
    let (model, vectorizer) = train_model(texts, labels, options)?;

    save_artifact(&model, model_path).context("Failed to save classifier")?;
    save_artifact(&vectorizer, vectorizer_path).context("Failed to save vectorizer")?;

    info!(
        model = %model_path.display(),
        vectorizer = %vectorizer_path.display(),
        "Saved trained model"
    );

    Ok((model, vectorizer))
}
