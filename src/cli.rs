//! Command-line interface definitions for the daily news digest.
//!
//! Credentials are read from flags or environment variables (a `.env` file is
//! loaded before parsing). Non-secret settings may also come from a YAML file
//! passed with `--config`; flags always win over the file.

use crate::models::Category;
use clap::Parser;

/// Command-line arguments for the daily news digest.
///
/// # Examples
///
/// ```sh
/// # Credentials from the environment, default categories
/// daily_news_digest
///
/// # Preview the digest without sending mail
/// daily_news_digest --dry-run --categories technology,science
///
/// # Load non-secret settings from a file
/// daily_news_digest -c ./digest.yaml
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "DIGEST_CONFIG")]
    pub config: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// SMTP username, also used as the sender address
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    /// SMTP password or app password
    #[arg(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub email_pass: Option<String>,

    /// Recipient address
    #[arg(long, env = "EMAIL_TO")]
    pub email_to: Option<String>,

    /// Categories to include, in digest order
    #[arg(long, value_enum, value_delimiter = ',')]
    pub categories: Option<Vec<Category>>,

    /// Maximum headlines per category
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Chat model used for summaries
    #[arg(long, env = "OPENAI_MODEL")]
    pub model: Option<String>,

    /// Completion token budget per summary
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Headlines endpoint
    #[arg(long, env = "NEWS_API_URL")]
    pub news_api_url: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Outbound SMTP host (implicit TLS)
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// Outbound SMTP port
    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    /// Email subject line
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Print the digest to stdout instead of emailing it
    #[arg(long)]
    pub dry_run: bool,
}
