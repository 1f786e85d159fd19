// Model layer — vectorizer, classifier, their persisted artifacts, and training.

pub mod artifact;
pub mod naive_bayes;
pub mod tfidf;
pub mod train;
pub mod traits;

pub use artifact::{ArtifactError, ModelUnavailable};
pub use naive_bayes::MultinomialNb;
pub use tfidf::TfidfVectorizer;
pub use traits::{Classifier, FeatureEncoder, FeatureVector};

/// File name of the persisted classifier inside the model directory.
pub const CLASSIFIER_FILE: &str = "spam_classifier_model.json";

/// File name of the persisted vectorizer inside the model directory.
pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";

/// Class id the classifier emits for spam.
pub const SPAM_CLASS: u32 = 1;

/// Class id the classifier emits for legitimate messages.
pub const HAM_CLASS: u32 = 0;
