// Composition tests — the full lifecycle chained together:
//   corpus -> train -> save artifacts -> load service -> predict
// plus the artifacts shipped in models/.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spamcheck::dataset::Dataset;
use spamcheck::inference::{InferenceService, Label};
use spamcheck::metrics::evaluate;
use spamcheck::model::artifact::{artifact_paths, load_model_pair};
use spamcheck::model::train::{train_and_save_model, train_model, TrainOptions};
use spamcheck::text::Preprocess;

const SPAM_TEXT: &str = "You've won a free iPhone! Click to claim.";
const HAM_TEXT: &str = "Let's meet for lunch tomorrow at noon.";

fn manifest_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "spamcheck-composition-{name}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn corpus() -> Dataset {
    Dataset::load(&manifest_path("data/messages.tsv")).unwrap()
}

// ============================================================
// Shipped model
// ============================================================

#[test]
fn shipped_model_classifies_scenarios() {
    let service = InferenceService::load(&manifest_path("models")).unwrap();

    assert_eq!(service.predict(SPAM_TEXT).prediction, Label::Spam);
    assert_eq!(service.predict(HAM_TEXT).prediction, Label::NotSpam);
}

#[test]
fn shipped_model_accepts_empty_text() {
    let service = InferenceService::load(&manifest_path("models")).unwrap();
    let label = service.predict("").prediction;
    assert!(matches!(label, Label::Spam | Label::NotSpam));
}

#[test]
fn shipped_model_records_cleaning() {
    let (vectorizer, classifier) = load_model_pair(&manifest_path("models")).unwrap();
    assert_eq!(vectorizer.preprocess, Preprocess::Clean);
    assert_eq!(classifier.classes, vec![0, 1]);
}

#[test]
fn shipped_model_fits_its_corpus() {
    let service = InferenceService::load(&manifest_path("models")).unwrap();
    let report = evaluate(&service, &corpus());
    assert!(report.accuracy > 0.9, "accuracy {}", report.accuracy);
}

// ============================================================
// Train -> save -> load -> predict
// ============================================================

#[test]
fn trained_model_round_trips_through_disk() {
    let dir = scratch_dir("train");
    let data = corpus();
    let (vectorizer_path, model_path) = artifact_paths(&dir);

    let (model, vectorizer) = train_and_save_model(
        &data.texts,
        &data.labels,
        &model_path,
        &vectorizer_path,
        &TrainOptions::default(),
    )
    .unwrap();

    assert!(model_path.exists());
    assert!(vectorizer_path.exists());

    let in_memory =
        InferenceService::new(Arc::new(vectorizer), Arc::new(model), Preprocess::Clean).unwrap();
    let from_disk = InferenceService::load(&dir).unwrap();

    for text in [SPAM_TEXT, HAM_TEXT, "", "claim your free prize", "see you at lunch"] {
        assert_eq!(
            in_memory.predict(text),
            from_disk.predict(text),
            "disagreement on {text:?}"
        );
    }
    assert_eq!(from_disk.predict(SPAM_TEXT).prediction, Label::Spam);
    assert_eq!(from_disk.predict(HAM_TEXT).prediction, Label::NotSpam);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn tiny_corpus_predicts_its_own_examples() {
    // hello world / spam message, as ham / spam
    let texts = vec!["hello world".to_string(), "spam message".to_string()];
    let (model, vectorizer) = train_model(&texts, &[0, 1], &TrainOptions::default()).unwrap();
    let service =
        InferenceService::new(Arc::new(vectorizer), Arc::new(model), Preprocess::Clean).unwrap();

    assert_eq!(service.predict("hello world").prediction, Label::NotSpam);
    assert_eq!(service.predict("spam message").prediction, Label::Spam);
}

#[test]
fn raw_preprocessing_is_recorded_and_honoured() {
    let dir = scratch_dir("raw");
    let data = corpus();
    let (vectorizer_path, model_path) = artifact_paths(&dir);
    let options = TrainOptions {
        preprocess: Preprocess::Raw,
        ..TrainOptions::default()
    };

    train_and_save_model(&data.texts, &data.labels, &model_path, &vectorizer_path, &options)
        .unwrap();

    let service = InferenceService::load(&dir).unwrap();
    assert_eq!(service.preprocess(), Preprocess::Raw);
    assert_eq!(service.predict(SPAM_TEXT).prediction, Label::Spam);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn predictions_are_deterministic() {
    let service = InferenceService::load(&manifest_path("models")).unwrap();
    for text in corpus().texts.iter().take(20) {
        let first = service.predict(text);
        for _ in 0..3 {
            assert_eq!(service.predict(text), first);
        }
    }
}

#[test]
fn held_out_split_trains_and_evaluates() {
    let (train, test) = corpus().split(0.25, 7).unwrap();
    let (model, vectorizer) =
        train_model(&train.texts, &train.labels, &TrainOptions::default()).unwrap();
    let service =
        InferenceService::new(Arc::new(vectorizer), Arc::new(model), Preprocess::Clean).unwrap();

    let report = evaluate(&service, &test);
    assert_eq!(report.confusion.total(), test.len());
    assert!(report.accuracy >= 0.0 && report.accuracy <= 1.0);
}

#[test]
fn missing_model_dir_is_unavailable() {
    let dir = scratch_dir("absent");
    assert!(InferenceService::load(&dir).is_err());
}
