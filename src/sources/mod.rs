//! News sources that supply headlines for the digest.
//!
//! A source answers one question: "what are the top headlines for this
//! category right now?" The pipeline only talks to the [`NewsSource`] trait, so
//! tests can substitute an in-memory source.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | NewsAPI | [`newsapi`] | Top headlines JSON API | Requires API key; US headlines only |

use crate::errors::Result;
use crate::models::{Category, HeadlineItem};

pub mod newsapi;

/// Retrieves headlines for a single category.
pub trait NewsSource {
    /// Fetch at most `limit` headlines for `category`, most relevant first.
    ///
    /// Items missing a description carry an empty one. Upstream failures are
    /// reported as [`DigestError::Retrieval`](crate::errors::DigestError::Retrieval)
    /// and are not retried.
    async fn fetch(&self, category: Category, limit: u32) -> Result<Vec<HeadlineItem>>;
}
