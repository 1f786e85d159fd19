use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default directory holding the two model artifacts.
pub const DEFAULT_MODEL_DIR: &str = "./models";

/// Default labelled corpus used by `train` and `evaluate`.
pub const DEFAULT_DATA_PATH: &str = "./data/messages.tsv";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override anything set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing tfidf_vectorizer.json and spam_classifier_model.json
    pub model_dir: PathBuf,
    /// Labelled corpus for training and evaluation
    pub data_path: PathBuf,
    /// Address the HTTP server binds to
    pub bind: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables. Everything has a default.
    pub fn load() -> Result<Self> {
        let port = match env::var("SPAMCHECK_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("SPAMCHECK_PORT is not a valid port: {raw:?}"))?,
            Err(_) => 8000,
        };

        Ok(Self {
            model_dir: env::var("SPAMCHECK_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR)),
            data_path: env::var("SPAMCHECK_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH)),
            bind: env::var("SPAMCHECK_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        })
    }

    /// Check that both model artifacts exist before trying to serve.
    pub fn require_models(&self) -> Result<()> {
        if !crate::model::artifact::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "Model artifacts not found in {}\n\
                 Run `spamcheck train` to build them,\n\
                 or set SPAMCHECK_MODEL_DIR to a directory that has them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}
