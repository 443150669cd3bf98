//! NewsAPI top-headlines client.
//!
//! Issues one `GET /v2/top-headlines` per category with a fixed country of
//! `us`. The endpoint answers with:
//!
//! ```json
//! { "status": "ok", "articles": [ { "title": "...", "description": null, "url": "https://..." } ] }
//! ```
//!
//! or, on failure, `{ "status": "error", "code": "...", "message": "..." }`.

use super::NewsSource;
use crate::config::Config;
use crate::errors::{DigestError, Result};
use crate::models::{Category, HeadlineItem};
use crate::utils::truncate_for_log;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

const COUNTRY: &str = "us";
const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
/// Title NewsAPI substitutes for articles that were taken down.
const REMOVED_PLACEHOLDER: &str = "[Removed]";

#[derive(Debug, Deserialize)]
struct TopHeadlinesResponse {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    articles: Option<Vec<RawArticle>>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
}

impl RawArticle {
    /// Keep only articles with a usable title and an absolute link.
    fn into_headline(self) -> Option<HeadlineItem> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && t != REMOVED_PLACEHOLDER)?;
        let link = self
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| Url::parse(u).is_ok())?;

        Some(HeadlineItem {
            title,
            description: self.description.unwrap_or_default(),
            link,
        })
    }
}

/// Client for the NewsAPI headlines endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.news_api_url.clone(), config.news_api_key.clone())
    }
}

impl NewsSource for NewsApiClient {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, category: Category, limit: u32) -> Result<Vec<HeadlineItem>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DigestError::retrieval(category, "NEWS_API_KEY is not set"))?;

        let t0 = Instant::now();
        let page_size = limit.to_string();
        let resp = self
            .http
            .get(&self.endpoint)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .query(&[
                ("country", COUNTRY),
                ("category", category.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await
            .map_err(|e| DigestError::retrieval(category, e.without_url()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DigestError::retrieval(category, e.without_url()))?;
        debug!(%status, bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Headlines response received");

        let parsed = match serde_json::from_str::<TopHeadlinesResponse>(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                warn!(error = %e, body = %truncate_for_log(&body, 300), "Malformed headlines response");
                return Err(DigestError::retrieval(category, format!("malformed response: {e}")));
            }
            Err(_) => {
                return Err(DigestError::retrieval(
                    category,
                    format!("HTTP {status}: {}", truncate_for_log(&body, 300)),
                ));
            }
        };

        if parsed.status.as_deref() == Some("error") || !status.is_success() {
            let code = parsed.code.unwrap_or_else(|| status.as_u16().to_string());
            let message = parsed.message.unwrap_or_else(|| "no message".to_string());
            return Err(DigestError::retrieval(category, format!("{code}: {message}")));
        }

        let articles = parsed
            .articles
            .ok_or_else(|| DigestError::retrieval(category, "response has no articles array"))?;
        let returned = articles.len();

        let items: Vec<HeadlineItem> = articles
            .into_iter()
            .filter_map(|article| {
                let title = article.title.clone();
                let url = article.url.clone();
                let item = article.into_headline();
                if item.is_none() {
                    warn!(?title, ?url, "Dropping article without a usable title or link");
                }
                item
            })
            .take(limit as usize)
            .collect();

        info!(
            returned,
            kept = items.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched headlines"
        );
        Ok(items)
    }
}
