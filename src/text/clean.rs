// Text cleaning: lowercase, strip URLs, keep only ASCII letters, collapse whitespace.
//
// The same function runs at training time and (when the vectorizer artifact
// says so) at inference time, so the two always see identically shaped input.

use std::sync::LazyLock;

use regex::Regex;

/// URL-like substrings: anything starting with http, https or www up to the
/// next whitespace (Unicode whitespace included, matching the collapse step).
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http\S+|www\S+|https\S+").expect("URL pattern is a valid regex")
});

/// Normalize raw text into lowercase ASCII words separated by single spaces.
///
/// Steps, in order:
/// 1. lowercase everything
/// 2. remove URL-like substrings (`http…`, `https…`, `www…`)
/// 3. drop every character that isn't an ASCII letter or whitespace
/// 4. collapse whitespace runs to one space and trim
///
/// Never fails. Empty input gives empty output, and the result is a fixed
/// point: cleaning it again returns it unchanged.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_urls = URL_PATTERN.replace_all(&lowered, "");

    let letters: String = without_urls
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    // Dropping punctuation can glue fragments into a new URL-like token
    // ("h.ttpx" -> "httpx"); strip those too so the output is stable.
    let letters = URL_PATTERN.replace_all(&letters, "");

    letters.split_whitespace().collect::<Vec<_>>().join(" ")
}
