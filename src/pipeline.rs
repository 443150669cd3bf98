//! The digest pipeline: fetch → summarize → build → send.
//!
//! Everything runs in sequence on one logical thread. Categories are visited
//! in configured order and headlines in the order the source returned them.
//! The first error from any stage aborts the run, so a partial digest is
//! never delivered.

use crate::api::Summarizer;
use crate::config::Config;
use crate::errors::Result;
use crate::models::{Category, CategorySection};
use crate::outputs::digest::{bullet_line, render_digest};
use crate::outputs::email::Notifier;
use crate::sources::NewsSource;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The digest text that was (or, in a dry run, would have been) sent.
    pub digest: String,
    /// `false` only for dry runs.
    pub delivered: bool,
}

/// Fetch and summarize every category, skipping those with no headlines.
#[instrument(level = "info", skip(source, summarizer))]
pub async fn collect_sections<S, M>(
    categories: &[Category],
    limit: u32,
    source: &S,
    summarizer: &M,
) -> Result<Vec<CategorySection>>
where
    S: NewsSource,
    M: Summarizer,
{
    let mut sections = Vec::new();

    for &category in categories {
        let items = source.fetch(category, limit).await?;
        if items.is_empty() {
            debug!(%category, "No headlines; skipping section");
            continue;
        }

        let mut lines = Vec::with_capacity(items.len());
        for item in &items {
            let summary = summarizer.summarize(item).await?;
            lines.push(bullet_line(&summary, &item.link));
        }

        info!(%category, count = lines.len(), "Section ready");
        sections.push(CategorySection { category, lines });
    }

    Ok(sections)
}

/// Build the full digest text for `categories`.
///
/// Each call issues fresh upstream requests.
pub async fn build_digest<S, M>(
    categories: &[Category],
    limit: u32,
    source: &S,
    summarizer: &M,
) -> Result<String>
where
    S: NewsSource,
    M: Summarizer,
{
    let sections = collect_sections(categories, limit, source, summarizer).await?;
    Ok(render_digest(&sections))
}

/// Run the pipeline once and deliver the result.
///
/// The notifier is invoked exactly once, even if every category came back
/// empty, unless `config.dry_run` is set.
#[instrument(level = "info", skip_all, fields(dry_run = config.dry_run))]
pub async fn run<S, M, N>(
    config: &Config,
    source: &S,
    summarizer: &M,
    notifier: &N,
) -> Result<RunReport>
where
    S: NewsSource,
    M: Summarizer,
    N: Notifier,
{
    let t0 = Instant::now();
    let digest = build_digest(&config.categories, config.page_size, source, summarizer).await?;
    info!(
        bytes = digest.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Digest assembled"
    );

    let delivered = if config.dry_run {
        info!("Dry run; skipping email delivery");
        false
    } else {
        notifier.notify(&config.subject, &digest).await?;
        true
    };

    Ok(RunReport { digest, delivered })
}
