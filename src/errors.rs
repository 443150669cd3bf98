//! Error taxonomy for the digest pipeline.
//!
//! Each stage reports failures through its own variant so the caller can tell
//! which external service let it down. Nothing here is retried: the first
//! error aborts the run.

use crate::models::Category;
use thiserror::Error;

/// Errors produced while building or delivering a digest.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The news service did not return a well-formed article list.
    #[error("failed to retrieve {category} headlines: {reason}")]
    Retrieval { category: Category, reason: String },

    /// The language model call errored or returned nothing usable.
    #[error("failed to summarize \"{title}\": {reason}")]
    Summarization { title: String, reason: String },

    /// The email could not be built, authenticated, or relayed.
    #[error("failed to deliver digest: {0}")]
    Delivery(String),

    /// The optional YAML config file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DigestError {
    pub fn retrieval(category: Category, reason: impl ToString) -> Self {
        Self::Retrieval {
            category,
            reason: reason.to_string(),
        }
    }

    pub fn summarization(title: &str, reason: impl ToString) -> Self {
        Self::Summarization {
            title: title.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn delivery(reason: impl ToString) -> Self {
        Self::Delivery(reason.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;
