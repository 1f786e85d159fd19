// Labelled message corpora.
//
// One message per line, `label<TAB>text` (the SMS spam collection layout).
// Blank lines and `#` comments are skipped.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::model::{HAM_CLASS, SPAM_CLASS};

/// Texts and their class ids, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub texts: Vec<String>,
    pub labels: Vec<u32>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Number of spam messages.
    pub fn spam_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == SPAM_CLASS).count()
    }

    /// Parse corpus text. Errors name the 1-based offending line.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut dataset = Dataset::default();

        for (i, line) in contents.lines().enumerate() {
            let line_no = i + 1;
            let trimmed = line.trim_end_matches('\r');
            if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
                continue;
            }

            let Some((label, text)) = trimmed.split_once('\t') else {
                anyhow::bail!("Line {line_no}: expected `label<TAB>text`");
            };
            let class = parse_label(label)
                .with_context(|| format!("Line {line_no}: unknown label {:?}", label.trim()))?;

            dataset.texts.push(text.to_string());
            dataset.labels.push(class);
        }

        Ok(dataset)
    }

    /// Load a corpus file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        let dataset =
            Self::parse(&contents).with_context(|| format!("Invalid dataset {}", path.display()))?;

        info!(
            path = %path.display(),
            messages = dataset.len(),
            spam = dataset.spam_count(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Shuffle deterministically and split off `test_ratio` of the messages
    /// as a held-out set. A ratio of 0 keeps everything for training.
    pub fn split(&self, test_ratio: f64, seed: u64) -> Result<(Dataset, Dataset)> {
        if !(0.0..1.0).contains(&test_ratio) {
            anyhow::bail!("Test ratio must be in [0, 1), got {test_ratio}");
        }

        let mut order: Vec<usize> = (0..self.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let n_test = (self.len() as f64 * test_ratio).round() as usize;
        let (test_idx, train_idx) = order.split_at(n_test);

        Ok((self.select(train_idx), self.select(test_idx)))
    }

    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            texts: indices.iter().map(|&i| self.texts[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// Map a corpus label to a class id.
pub fn parse_label(label: &str) -> Option<u32> {
    match label.trim().to_lowercase().as_str() {
        "spam" | "1" => Some(SPAM_CLASS),
        "ham" | "0" | "not spam" => Some(HAM_CLASS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# comment\nham\thello world\n\nspam\tWIN cash now\r\n1\tfree prize\nNot Spam\tsee you\n";

    #[test]
    fn test_parse() {
        let ds = Dataset::parse(SAMPLE).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.labels, vec![0, 1, 1, 0]);
        assert_eq!(ds.texts[1], "WIN cash now");
        assert_eq!(ds.spam_count(), 2);
    }

    #[test]
    fn test_parse_errors_name_line() {
        let err = Dataset::parse("ham\tok\nno tab here\n").unwrap_err();
        assert!(err.to_string().contains("Line 2"), "{err}");

        let err = Dataset::parse("ham\tok\nmaybe\tsomething\n").unwrap_err();
        assert!(err.to_string().contains("Line 2"), "{err}");
    }

    #[test]
    fn test_split_is_deterministic_and_complete() {
        let ds = Dataset::parse(SAMPLE).unwrap();
        let (train_a, test_a) = ds.split(0.5, 42).unwrap();
        let (train_b, test_b) = ds.split(0.5, 42).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a.len() + test_a.len(), ds.len());
        assert_eq!(test_a.len(), 2);
    }

    #[test]
    fn test_split_zero_ratio_keeps_all() {
        let ds = Dataset::parse(SAMPLE).unwrap();
        let (train, test) = ds.split(0.0, 1).unwrap();
        assert_eq!(train.len(), ds.len());
        assert!(test.is_empty());
        assert!(ds.split(1.0, 1).is_err());
    }
}
