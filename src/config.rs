//! Runtime configuration.
//!
//! Settings are resolved once at startup, in order of precedence:
//!
//! 1. Command-line flags and environment variables ([`Cli`])
//! 2. The optional YAML file named by `--config` ([`FileConfig`])
//! 3. Built-in defaults
//!
//! Credentials are never read from the YAML file. They stay optional here;
//! the component that needs one reports its absence when it is first used.

use crate::cli::Cli;
use crate::errors::{DigestError, Result};
use crate::models::Category;
use serde::Deserialize;
use std::fmt;
use std::fs;
use tracing::{info, instrument};

pub const DEFAULT_PAGE_SIZE: u32 = 3;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 60;
pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/top-headlines";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Implicit TLS submission port.
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_SUBJECT: &str = "Daily News Digest";

/// Largest page size the headlines endpoint accepts.
const MAX_PAGE_SIZE: u32 = 100;

/// Non-secret settings read from a YAML file.
///
/// ```yaml
/// categories: [technology, science]
/// page_size: 5
/// model: gpt-4o-mini
/// subject: Morning Briefing
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub categories: Option<Vec<Category>>,
    pub page_size: Option<u32>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub news_api_url: Option<String>,
    pub openai_base_url: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub subject: Option<String>,
}

impl FileConfig {
    /// Read and parse a YAML config file.
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| DigestError::Config(format!("cannot read {path}: {e}")))?;
        let parsed = serde_yaml::from_str::<FileConfig>(&raw)
            .map_err(|e| DigestError::Config(format!("cannot parse {path}: {e}")))?;
        info!(path, "Loaded config file");
        Ok(parsed)
    }
}

/// Fully resolved configuration, read-only after startup.
#[derive(Clone)]
pub struct Config {
    pub news_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub email_user: Option<String>,
    pub email_pass: Option<String>,
    pub email_to: Option<String>,
    /// Categories in digest order.
    pub categories: Vec<Category>,
    /// Maximum headlines per category.
    pub page_size: u32,
    pub model: String,
    pub max_tokens: u32,
    pub news_api_url: String,
    pub openai_base_url: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub subject: String,
    pub dry_run: bool,
}

impl Config {
    /// Resolve configuration from parsed CLI arguments, loading the YAML file
    /// they point to, if any.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let file = match cli.config.as_deref() {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    /// Merge CLI values over file values over defaults.
    pub fn resolve(cli: Cli, file: FileConfig) -> Result<Self> {
        let page_size = cli
            .page_size
            .or(file.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(DigestError::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        let max_tokens = cli
            .max_tokens
            .or(file.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS);
        if max_tokens == 0 {
            return Err(DigestError::Config("max_tokens must be positive".into()));
        }

        Ok(Self {
            news_api_key: cli.news_api_key,
            openai_api_key: cli.openai_api_key,
            email_user: cli.email_user,
            email_pass: cli.email_pass,
            email_to: cli.email_to,
            categories: cli
                .categories
                .or(file.categories)
                .unwrap_or_else(|| Category::DEFAULTS.to_vec()),
            page_size,
            model: cli
                .model
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            news_api_url: cli
                .news_api_url
                .or(file.news_api_url)
                .unwrap_or_else(|| DEFAULT_NEWS_API_URL.to_string()),
            openai_base_url: cli
                .openai_base_url
                .or(file.openai_base_url)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            smtp_host: cli
                .smtp_host
                .or(file.smtp_host)
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: cli.smtp_port.or(file.smtp_port).unwrap_or(DEFAULT_SMTP_PORT),
            subject: cli
                .subject
                .or(file.subject)
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            dry_run: cli.dry_run,
        })
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    if secret.is_some() { "<set>" } else { "<unset>" }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("news_api_key", &redact(&self.news_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("email_user", &self.email_user)
            .field("email_pass", &redact(&self.email_pass))
            .field("email_to", &self.email_to)
            .field("categories", &self.categories)
            .field("page_size", &self.page_size)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("news_api_url", &self.news_api_url)
            .field("openai_base_url", &self.openai_base_url)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("subject", &self.subject)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
