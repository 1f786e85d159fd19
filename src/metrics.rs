// Evaluation metrics for the binary spam task.
//
// Classes are reported in the order [not spam, spam]. Any ratio whose
// denominator is zero is reported as 0.0.

use serde::Serialize;
use tracing::info;

use crate::dataset::Dataset;
use crate::inference::{InferenceService, Label};

/// Row/column order used by the confusion matrix and the report.
pub const LABEL_ORDER: [Label; 2] = [Label::NotSpam, Label::Spam];

/// Rows are actual labels, columns predicted, both in `LABEL_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_labels(actual: &[Label], predicted: &[Label]) -> Self {
        let mut counts = [[0usize; 2]; 2];
        for (a, p) in actual.iter().zip(predicted) {
            counts[index_of(*a)][index_of(*p)] += 1;
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        self.counts[0][0] + self.counts[1][1]
    }
}

fn index_of(label: Label) -> usize {
    match label {
        Label::NotSpam => 0,
        Label::Spam => 1,
    }
}

/// Precision / recall / F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averages across classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Full classification report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    pub confusion: ConfusionMatrix,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Fraction of predictions that match.
pub fn accuracy(actual: &[Label], predicted: &[Label]) -> f64 {
    let n = actual.len().min(predicted.len());
    let correct = actual.iter().zip(predicted).filter(|(a, p)| a == p).count();
    ratio(correct, n)
}

/// Build the full report from aligned actual/predicted labels.
pub fn classification_report(actual: &[Label], predicted: &[Label]) -> ClassificationReport {
    let confusion = ConfusionMatrix::from_labels(actual, predicted);
    let m = &confusion.counts;

    let per_class: Vec<ClassMetrics> = LABEL_ORDER
        .iter()
        .enumerate()
        .map(|(c, &label)| {
            let true_pos = m[c][c];
            let predicted_as = m[0][c] + m[1][c];
            let support = m[c][0] + m[c][1];
            let precision = ratio(true_pos, predicted_as);
            let recall = ratio(true_pos, support);
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            ClassMetrics {
                label,
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    let total = confusion.total();
    let n_classes = per_class.len() as f64;
    let macro_avg = AverageMetrics {
        precision: per_class.iter().map(|c| c.precision).sum::<f64>() / n_classes,
        recall: per_class.iter().map(|c| c.recall).sum::<f64>() / n_classes,
        f1: per_class.iter().map(|c| c.f1).sum::<f64>() / n_classes,
        support: total,
    };

    let weight = |c: &ClassMetrics| ratio(c.support, total);
    let weighted_avg = AverageMetrics {
        precision: per_class.iter().map(|c| c.precision * weight(c)).sum(),
        recall: per_class.iter().map(|c| c.recall * weight(c)).sum(),
        f1: per_class.iter().map(|c| c.f1 * weight(c)).sum(),
        support: total,
    };

    ClassificationReport {
        accuracy: ratio(confusion.correct(), total),
        per_class,
        macro_avg,
        weighted_avg,
        confusion,
    }
}

/// Predict every message in `dataset` and compare against its labels.
pub fn evaluate(service: &InferenceService, dataset: &Dataset) -> ClassificationReport {
    let actual: Vec<Label> = dataset.labels.iter().map(|&c| Label::from_class(c)).collect();
    let predicted: Vec<Label> = dataset
        .texts
        .iter()
        .map(|t| service.predict(t).prediction)
        .collect();

    let report = classification_report(&actual, &predicted);
    info!(
        messages = dataset.len(),
        accuracy = report.accuracy,
        "Evaluated model"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::Label::{NotSpam as H, Spam as S};

    #[test]
    fn test_accuracy() {
        assert!((accuracy(&[S, H, S], &[S, H, H]) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_confusion_matrix() {
        let cm = ConfusionMatrix::from_labels(&[S, H, S, H], &[S, H, H, S]);
        // rows actual [ham, spam], cols predicted [ham, spam]
        assert_eq!(cm.counts, [[1, 1], [1, 1]]);
        assert_eq!(cm.total(), 4);
    }

    #[test]
    fn test_report_values() {
        let report = classification_report(&[S, H, S], &[S, H, H]);
        let ham = report.per_class[0];
        let spam = report.per_class[1];

        assert!((report.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert!((ham.precision - 0.5).abs() < 1e-12);
        assert!((ham.recall - 1.0).abs() < 1e-12);
        assert_eq!(ham.support, 1);
        assert!((spam.precision - 1.0).abs() < 1e-12);
        assert!((spam.recall - 0.5).abs() < 1e-12);
        assert_eq!(spam.support, 2);
        assert!((report.macro_avg.recall - 0.75).abs() < 1e-12);
        // weighted recall = 1/3 * 1.0 + 2/3 * 0.5
        assert!((report.weighted_avg.recall - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_division_is_zero() {
        let report = classification_report(&[H, H], &[H, H]);
        let spam = report.per_class[1];
        assert_eq!(spam.precision, 0.0);
        assert_eq!(spam.recall, 0.0);
        assert_eq!(spam.f1, 0.0);
        assert_eq!(report.accuracy, 1.0);
    }
}
