//! Data models shared by every stage of the digest pipeline.
//!
//! - [`Category`]: the fixed set of news topics that can be requested
//! - [`HeadlineItem`]: one retrieved article, consumed once by the summarizer
//! - [`CategorySection`]: formatted summaries for a single category
//! - [`EmailMessage`]: the envelope and body handed to the mail transport
//!
//! None of these outlive a single run.

use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// A news topic understood by the headlines endpoint.
///
/// The wire name (lowercase) is used for the query string, the CLI and the
/// YAML config file alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Politics,
    Science,
    Sports,
    Technology,
}

impl Category {
    /// Categories requested when none are configured, in digest order.
    pub const DEFAULTS: [Category; 4] = [
        Category::Sports,
        Category::Business,
        Category::Science,
        Category::Politics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Politics => "politics",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single headline as returned by the news source.
///
/// `title` and `link` are never empty; `description` is empty when the
/// upstream article had none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineItem {
    /// The article headline.
    pub title: String,
    /// The upstream teaser text, or an empty string.
    pub description: String,
    /// Absolute URL of the full article.
    pub link: String,
}

/// Summaries for one category, in the order the source returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySection {
    pub category: Category,
    /// One formatted bullet per summarized headline.
    pub lines: Vec<String>,
}

/// A single-recipient plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}
