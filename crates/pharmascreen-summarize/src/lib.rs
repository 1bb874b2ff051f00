//! Summarization behind a narrow trait so the pipeline can run without a
//! model. The production implementation calls a hosted inference endpoint
//! serving `facebook/bart-large-cnn`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

pub mod clean;

pub use clean::clean_text;

/// Inputs at or below this word count are returned verbatim without a model call.
pub const SHORT_TEXT_WORDS: usize = 500;
/// Inputs above this word count are truncated before the model call.
pub const MAX_INPUT_WORDS: usize = 1000;
/// Minimum summary length requested from the model.
pub const MIN_SUMMARY_LENGTH: u32 = 100;

/// Placeholder written when the model call fails.
pub const SUMMARY_ERROR: &str = "Summarization Error";

pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed model response: {0}")]
    Malformed(String),
}

/// A black-box summarizer: text in, summary out.
pub trait Summarizer: Send + Sync {
    fn summarize<'a>(
        &'a self,
        text: &'a str,
        max_length: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizeError>> + Send + 'a>>;
}

/// Summarize a raw article document.
///
/// Cleans markup first, then applies the length policy: short inputs are
/// returned as-is, over-long inputs are truncated to [`MAX_INPUT_WORDS`]
/// before the model call. A failed model call resolves to
/// [`SUMMARY_ERROR`] rather than aborting the pipeline.
pub async fn summarize_document(summarizer: &dyn Summarizer, raw: &str, max_length: u32) -> String {
    let text = clean_text(raw);
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() <= SHORT_TEXT_WORDS {
        tracing::debug!(words = words.len(), "text short enough, skipping model");
        return text;
    }

    let input = if words.len() > MAX_INPUT_WORDS {
        tracing::debug!(words = words.len(), "truncating input to {MAX_INPUT_WORDS} words");
        words[..MAX_INPUT_WORDS].join(" ")
    } else {
        text
    };

    match summarizer.summarize(&input, max_length).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(error = %e, "summarization failed");
            SUMMARY_ERROR.to_string()
        }
    }
}

/// Hosted-inference client for `facebook/bart-large-cnn`.
pub struct BartSummarizer {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    timeout: Duration,
}

impl BartSummarizer {
    pub fn new(endpoint: String, token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            token,
            timeout,
        }
    }
}

impl Summarizer for BartSummarizer {
    fn summarize<'a>(
        &'a self,
        text: &'a str,
        max_length: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizeError>> + Send + 'a>> {
        Box::pin(async move {
            let body = serde_json::json!({
                "inputs": text,
                "parameters": {
                    "max_length": max_length,
                    "min_length": MIN_SUMMARY_LENGTH,
                    "do_sample": false,
                }
            });

            let mut req = self
                .client
                .post(&self.endpoint)
                .json(&body)
                .timeout(self.timeout);
            if let Some(ref token) = self.token {
                req = req.bearer_auth(token);
            }

            let resp = req.send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(SummarizeError::Status(status));
            }

            let data: serde_json::Value = resp.json().await?;
            data[0]["summary_text"]
                .as_str()
                .map(String::from)
                .ok_or_else(|| SummarizeError::Malformed(data.to_string()))
        })
    }
}

/// Test double returning a canned summary.
pub struct FixedSummarizer {
    pub reply: String,
}

impl Summarizer for FixedSummarizer {
    fn summarize<'a>(
        &'a self,
        _text: &'a str,
        _max_length: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizeError>> + Send + 'a>> {
        let reply = self.reply.clone();
        Box::pin(async move { Ok(reply) })
    }
}

/// Test double that always fails.
pub struct FailingSummarizer;

impl Summarizer for FailingSummarizer {
    fn summarize<'a>(
        &'a self,
        _text: &'a str,
        _max_length: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String, SummarizeError>> + Send + 'a>> {
        Box::pin(async move { Err(SummarizeError::Malformed("no model".to_string())) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[tokio::test]
    async fn test_short_text_returned_verbatim() {
        let summarizer = FixedSummarizer {
            reply: "MODEL OUTPUT".to_string(),
        };
        let raw = format!("<Article>{}</Article>", words(100));
        let out = summarize_document(&summarizer, &raw, 400).await;
        assert_eq!(out, words(100));
    }

    #[tokio::test]
    async fn test_long_text_goes_through_model() {
        let summarizer = FixedSummarizer {
            reply: "MODEL OUTPUT".to_string(),
        };
        let raw = words(600);
        let out = summarize_document(&summarizer, &raw, 400).await;
        assert_eq!(out, "MODEL OUTPUT");
    }

    #[tokio::test]
    async fn test_boundary_at_short_limit() {
        let summarizer = FixedSummarizer {
            reply: "MODEL OUTPUT".to_string(),
        };
        // Exactly SHORT_TEXT_WORDS words: still short, no model call
        let out = summarize_document(&summarizer, &words(SHORT_TEXT_WORDS), 400).await;
        assert_eq!(out, words(SHORT_TEXT_WORDS));
        // One more word crosses the threshold
        let out = summarize_document(&summarizer, &words(SHORT_TEXT_WORDS + 1), 400).await;
        assert_eq!(out, "MODEL OUTPUT");
    }

    #[tokio::test]
    async fn test_model_failure_yields_placeholder() {
        let out = summarize_document(&FailingSummarizer, &words(600), 400).await;
        assert_eq!(out, SUMMARY_ERROR);
    }
}
