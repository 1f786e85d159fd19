// Persisted model artifacts.
//
// Each artifact is a single JSON object: a `format_version` field plus the
// model's own fields. Loading checks the version and the model's internal
// consistency, so a file that parses but can't be used is rejected at
// startup instead of producing garbage predictions later.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::naive_bayes::MultinomialNb;
use super::tfidf::TfidfVectorizer;
use super::traits::FeatureEncoder;
use super::{CLASSIFIER_FILE, VECTORIZER_FILE};

/// Current on-disk layout version for both artifacts.
pub const FORMAT_VERSION: u32 = 1;

/// Why a single artifact file couldn't be loaded.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt artifact {}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "unsupported format_version {found} in {} (expected {})",
        .path.display(),
        FORMAT_VERSION
    )]
    Version { path: PathBuf, found: u32 },

    #[error("invalid artifact {}: {reason}", .path.display())]
    Schema { path: PathBuf, reason: String },
}

/// The model pair can't be served. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ModelUnavailable {
    #[error("vectorizer unavailable")]
    Vectorizer(#[source] ArtifactError),

    #[error("classifier unavailable")]
    Classifier(#[source] ArtifactError),

    #[error("vectorizer produces {encoder} features but classifier was fitted on {classifier}")]
    DimensionMismatch { encoder: usize, classifier: usize },
}

/// A model that can be written to and read back from an artifact file.
pub trait Artifact: Serialize + DeserializeOwned {
    /// Check internal consistency after deserializing.
    fn validate(&self) -> std::result::Result<(), String>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    format_version: u32,
    #[serde(flatten)]
    model: &'a T,
}

#[derive(Deserialize)]
struct VersionOnly {
    format_version: u32,
}

impl Artifact for TfidfVectorizer {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.vocabulary.is_empty() {
            return Err("empty vocabulary".to_string());
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "idf has {} entries but vocabulary has {}",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }
        // Indices must be exactly 0..n with no repeats.
        let mut seen = vec![false; self.idf.len()];
        for (token, &index) in &self.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(format!("duplicate column {index} (token {token:?})")),
                None => return Err(format!("column {index} out of range (token {token:?})")),
            }
        }
        if let Some(bad) = self.idf.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(format!("non-positive or non-finite idf weight {bad}"));
        }
        Ok(())
    }
}

impl Artifact for MultinomialNb {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.classes.is_empty() {
            return Err("no classes".to_string());
        }
        if self.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err("classes must be strictly increasing".to_string());
        }
        if self.class_log_prior.len() != self.classes.len() {
            return Err(format!(
                "{} class priors for {} classes",
                self.class_log_prior.len(),
                self.classes.len()
            ));
        }
        if self.feature_log_prob.len() != self.classes.len() {
            return Err(format!(
                "{} likelihood rows for {} classes",
                self.feature_log_prob.len(),
                self.classes.len()
            ));
        }
        if let Some(row) = self
            .feature_log_prob
            .iter()
            .find(|row| row.len() != self.n_features)
        {
            return Err(format!(
                "likelihood row has {} columns, expected {}",
                row.len(),
                self.n_features
            ));
        }
        let all_finite = self
            .class_log_prior
            .iter()
            .chain(self.feature_log_prob.iter().flatten())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("non-finite log probability".to_string());
        }
        Ok(())
    }
}

/// Write an artifact as pretty JSON, creating the parent directory if needed.
pub fn save_artifact<T: Artifact>(model: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let envelope = EnvelopeRef {
        format_version: FORMAT_VERSION,
        model,
    };
    let json = serde_json::to_string_pretty(&envelope)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(path = %path.display(), "Saved model artifact");
    Ok(())
}

/// Read, version-check and validate one artifact.
pub fn load_artifact<T: Artifact>(path: &Path) -> std::result::Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ArtifactError::NotFound(path.to_path_buf())
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let corrupt = |source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    };

    // Check the version before the full parse so a future layout reports
    // a version error rather than a confusing missing-field error.
    let VersionOnly { format_version } = serde_json::from_slice(&bytes).map_err(corrupt)?;
    if format_version != FORMAT_VERSION {
        return Err(ArtifactError::Version {
            path: path.to_path_buf(),
            found: format_version,
        });
    }

    // format_version is already checked; serde skips it as an unknown field.
    let model: T = serde_json::from_slice(&bytes).map_err(corrupt)?;
    model
        .validate()
        .map_err(|reason| ArtifactError::Schema {
            path: path.to_path_buf(),
            reason,
        })?;

    debug!(path = %path.display(), "Loaded model artifact");
    Ok(model)
}

/// Paths of the two artifacts inside a model directory.
pub fn artifact_paths(model_dir: &Path) -> (PathBuf, PathBuf) {
    (
        model_dir.join(VECTORIZER_FILE),
        model_dir.join(CLASSIFIER_FILE),
    )
}

/// Whether both artifact files exist in `model_dir`.
pub fn model_files_present(model_dir: &Path) -> bool {
    let (vectorizer, classifier) = artifact_paths(model_dir);
    vectorizer.exists() && classifier.exists()
}

/// Load the vectorizer and classifier from `model_dir` and check they fit
/// together.
pub fn load_model_pair(
    model_dir: &Path,
) -> std::result::Result<(TfidfVectorizer, MultinomialNb), ModelUnavailable> {
    let (vectorizer_path, classifier_path) = artifact_paths(model_dir);

    let vectorizer: TfidfVectorizer =
        load_artifact(&vectorizer_path).map_err(ModelUnavailable::Vectorizer)?;
    let classifier: MultinomialNb =
        load_artifact(&classifier_path).map_err(ModelUnavailable::Classifier)?;

    if vectorizer.dim() != classifier.n_features {
        return Err(ModelUnavailable::DimensionMismatch {
            encoder: vectorizer.dim(),
            classifier: classifier.n_features,
        });
    }

    info!(
        model_dir = %model_dir.display(),
        features = vectorizer.dim(),
        classes = classifier.classes.len(),
        preprocess = ?vectorizer.preprocess,
        "Loaded model artifacts"
    );

    Ok((vectorizer, classifier))
}
