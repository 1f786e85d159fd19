// Inference service — clean, encode, classify, map to a label.
//
// Built once at startup and shared read-only across request handlers.
// Nothing in here mutates after construction, so concurrent callers need
// no locking.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::artifact::load_model_pair;
use crate::model::traits::{Classifier, FeatureEncoder};
use crate::model::{ModelUnavailable, SPAM_CLASS};
use crate::text::Preprocess;

/// The two possible classification outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "spam")]
    Spam,
    #[serde(rename = "not spam")]
    NotSpam,
}

impl Label {
    /// `1` is spam; every other class id is not.
    pub fn from_class(class: u32) -> Self {
        if class == SPAM_CLASS {
            Label::Spam
        } else {
            Label::NotSpam
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Spam => "spam",
            Label::NotSpam => "not spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response body of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: Label,
}

/// Loaded encoder + classifier pair.
pub struct InferenceService {
    encoder: Arc<dyn FeatureEncoder>,
    classifier: Arc<dyn Classifier>,
    preprocess: Preprocess,
}

impl InferenceService {
    /// Assemble a service from already-loaded parts.
    pub fn new(
        encoder: Arc<dyn FeatureEncoder>,
        classifier: Arc<dyn Classifier>,
        preprocess: Preprocess,
    ) -> Result<Self, ModelUnavailable> {
        if encoder.dim() != classifier.n_features() {
            return Err(ModelUnavailable::DimensionMismatch {
                encoder: encoder.dim(),
                classifier: classifier.n_features(),
            });
        }
        Ok(Self {
            encoder,
            classifier,
            preprocess,
        })
    }

    /// Load both artifacts from `model_dir`. The preprocessing recorded in
    /// the vectorizer artifact is applied to every request.
    pub fn load(model_dir: &Path) -> Result<Self, ModelUnavailable> {
        let (vectorizer, classifier) = load_model_pair(model_dir)?;
        let preprocess = vectorizer.preprocess;
        Self::new(Arc::new(vectorizer), Arc::new(classifier), preprocess)
    }

    pub fn preprocess(&self) -> Preprocess {
        self.preprocess
    }

    /// Classify one text. Any string is accepted, including the empty one.
    pub fn predict(&self, raw_text: &str) -> Prediction {
        let text = self.preprocess.apply(raw_text);
        let features = self.encoder.encode(&text);
        let class = self.classifier.predict(&features);
        let prediction = Label::from_class(class);

        debug!(
            chars = raw_text.chars().count(),
            active_features = features.entries().len(),
            class,
            %prediction,
            "Classified text"
        );

        Prediction { prediction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::traits::FeatureVector;

    /// Encodes the number of characters into column 0.
    struct LengthEncoder;

    impl FeatureEncoder for LengthEncoder {
        fn dim(&self) -> usize {
            1
        }

        fn encode(&self, text: &str) -> FeatureVector {
            FeatureVector::from_entries(1, vec![(0, text.len() as f64)])
        }
    }

    /// Calls anything with a non-zero column 0 spam.
    struct NonEmptyIsSpam {
        n_features: usize,
    }

    impl Classifier for NonEmptyIsSpam {
        fn n_features(&self) -> usize {
            self.n_features
        }

        fn predict(&self, features: &FeatureVector) -> u32 {
            if features.is_zero() {
                0
            } else {
                1
            }
        }
    }

    fn service(preprocess: Preprocess) -> InferenceService {
        InferenceService::new(
            Arc::new(LengthEncoder),
            Arc::new(NonEmptyIsSpam { n_features: 1 }),
            preprocess,
        )
        .unwrap()
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(Label::from_class(1), Label::Spam);
        assert_eq!(Label::from_class(0), Label::NotSpam);
        assert_eq!(Label::from_class(7), Label::NotSpam);
    }

    #[test]
    fn test_prediction_json_shape() {
        let json = serde_json::to_value(Prediction {
            prediction: Label::NotSpam,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "prediction": "not spam" }));
    }

    #[test]
    fn test_cleaning_applied_before_encoding() {
        // "123 !!!" cleans to "", which the fake classifier calls not spam
        assert_eq!(service(Preprocess::Clean).predict("123 !!!").prediction, Label::NotSpam);
        assert_eq!(service(Preprocess::Raw).predict("123 !!!").prediction, Label::Spam);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = InferenceService::new(
            Arc::new(LengthEncoder),
            Arc::new(NonEmptyIsSpam { n_features: 3 }),
            Preprocess::Clean,
        );
        assert!(matches!(
            result,
            Err(ModelUnavailable::DimensionMismatch {
                encoder: 1,
                classifier: 3
            })
        ));
    }
}
