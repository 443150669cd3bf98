//! # Daily News Digest
//!
//! Fetches the top headlines for a fixed list of categories, asks an
//! OpenAI-compatible model for a one-sentence summary of each, and emails the
//! assembled plain-text digest to a single recipient.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... OPENAI_API_KEY=... \
//! EMAIL_USER=me@gmail.com EMAIL_PASS=app-password EMAIL_TO=you@example.com \
//! daily_news_digest
//! ```
//!
//! ## Architecture
//!
//! The run is a straight pipeline, executed once:
//! 1. **Fetch**: top headlines per category from NewsAPI
//! 2. **Summarize**: one chat completion per headline
//! 3. **Build**: format the sections into the digest text
//! 4. **Send**: one email over implicit-TLS SMTP
//!
//! The first failure in any stage aborts the run; nothing is retried.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod errors;
mod models;
mod outputs;
mod pipeline;
mod sources;
mod utils;

use api::OpenAiSummarizer;
use cli::Cli;
use config::Config;
use outputs::email::SmtpNotifier;
use sources::newsapi::NewsApiClient;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("daily_news_digest starting up");

    // A missing .env is fine; variables may come from the real environment.
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let args = Cli::parse();
    let config = Config::from_cli(args).inspect_err(|e| error!(error = %e, "Bad configuration"))?;
    debug!(?config, "Resolved configuration");

    let source = NewsApiClient::from_config(&config);
    let summarizer = OpenAiSummarizer::from_config(&config);
    let notifier = SmtpNotifier::from_config(&config);

    let report = match pipeline::run(&config, &source, &summarizer, &notifier).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Digest run failed");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        bytes = report.digest.len(),
        delivered = report.delivered,
        "Execution complete"
    );

    if report.delivered {
        println!("Email sent!");
    } else {
        print!("{}", report.digest);
    }

    Ok(())
}
