//! Markup stripping and whitespace normalization ahead of summarization.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip XML/HTML tags and collapse whitespace runs to single spaces.
pub fn clean_text(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, " ");
    WS_RE.replace_all(&stripped, " ").trim().to_string()
}
