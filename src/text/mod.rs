// Text preprocessing — normalization applied before vectorizing.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

pub mod clean;

pub use clean::clean_text;

/// Preprocessing a vectorizer was fitted with, recorded in its artifact so
/// inference can apply the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preprocess {
    /// Run `clean_text` first.
    #[default]
    Clean,
    /// Hand the raw text straight to the vectorizer.
    #[serde(rename = "none")]
    Raw,
}

impl Preprocess {
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Preprocess::Clean => Cow::Owned(clean_text(text)),
            Preprocess::Raw => Cow::Borrowed(text),
        }
    }
}
