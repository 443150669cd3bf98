//! Plain-text digest rendering.
//!
//! Rendering is pure: the same sections always produce the same text.
//! Sections without lines contribute nothing, not even a header.

use crate::models::{Category, CategorySection};
use crate::utils::upcase;
use itertools::Itertools;

/// First line of every digest, followed by a blank line.
pub const DIGEST_HEADER: &str = "📅 **Your Daily News Digest**\n\n";

/// Header line for a category section, e.g. `### Sports:`.
pub fn section_header(category: Category) -> String {
    format!("### {}:\n", upcase(category.as_str()))
}

/// One bullet per summarized headline, with a link back to the article.
pub fn bullet_line(summary: &str, link: &str) -> String {
    format!("- {summary} ([Read more]({link}))")
}

/// Render one section: header, bullets joined by newlines, then a blank line.
pub fn render_section(section: &CategorySection) -> String {
    if section.lines.is_empty() {
        return String::new();
    }
    format!(
        "{}{}\n\n",
        section_header(section.category),
        section.lines.iter().join("\n")
    )
}

/// Render the whole digest in the order the sections are given.
pub fn render_digest(sections: &[CategorySection]) -> String {
    let mut out = String::from(DIGEST_HEADER);
    for section in sections {
        out.push_str(&render_section(section));
    }
    out
}
