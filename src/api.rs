//! LLM API interaction for one-sentence headline summaries.
//!
//! This module talks to an OpenAI-compatible chat-completions endpoint.
//!
//! # Architecture
//!
//! - [`Summarizer`]: core trait the pipeline depends on
//! - [`OpenAiSummarizer`]: `POST {base_url}/chat/completions` implementation
//! - [`build_prompt`]: the fixed prompt template shared by every backend
//!
//! Terseness comes from the `max_tokens` budget sent with the request. The
//! returned text is trimmed but never cut locally. Failures are not retried.

use crate::config::Config;
use crate::errors::{DigestError, Result};
use crate::models::HeadlineItem;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Trait for turning a headline into a single sentence.
///
/// Implementors of this trait may call a remote model or, in tests, return
/// canned text.
pub trait Summarizer {
    /// Summarize `item` in one sentence.
    ///
    /// # Returns
    ///
    /// The trimmed summary, or [`DigestError::Summarization`] if the model
    /// errored or produced nothing.
    async fn summarize(&self, item: &HeadlineItem) -> Result<String>;
}

/// Build the prompt for a headline.
///
/// Identical title and description always yield the identical prompt.
pub fn build_prompt(item: &HeadlineItem) -> String {
    format!(
        "Summarize this news in one short sentence:\nTitle: {}\nDescription: {}",
        item.title, item.description
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat-completions client that summarizes one headline per request.
#[derive(Clone)]
pub struct OpenAiSummarizer {
    http: Client,
    /// API root, e.g. `https://api.openai.com/v1`.
    base_url: String,
    api_key: Option<String>,
    model: String,
    /// Generation budget per summary.
    max_tokens: u32,
}

impl OpenAiSummarizer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.model.clone(),
            config.max_tokens,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Summarizer for OpenAiSummarizer {
    #[instrument(level = "info", skip_all, fields(title = %item.title))]
    async fn summarize(&self, item: &HeadlineItem) -> Result<String> {
        let fail = |reason: String| DigestError::summarization(&item.title, reason);

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| fail("OPENAI_API_KEY is not set".to_string()))?;

        let prompt = build_prompt(item);
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let t0 = Instant::now();
        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| fail(e.without_url().to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| fail(e.without_url().to_string()))?;
        let dt = t0.elapsed();

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| truncate_for_log(&body, 300));
            warn!(%status, elapsed_ms = dt.as_millis() as u64, error = %detail, "API call failed");
            return Err(fail(format!("HTTP {status}: {detail}")));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %truncate_for_log(&body, 300), "Model returned an undecodable response");
            fail(format!("malformed response: {e}"))
        })?;

        let summary = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| fail("model returned an empty completion".to_string()))?;

        debug!(summary = %summary, "Summary text");
        info!(elapsed_ms = dt.as_millis() as u64, chars = summary.len(), "Summarized headline");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn item() -> HeadlineItem {
        HeadlineItem {
            title: "Rain expected".to_string(),
            description: "Heavy rain across the coast".to_string(),
            link: "https://news.test/rain".to_string(),
        }
    }

    fn summarizer_for(server: &MockServer) -> OpenAiSummarizer {
        OpenAiSummarizer::new(
            format!("{}/v1/", server.uri()),
            Some("sk-test".to_string()),
            "gpt-4o-mini",
            60,
        )
    }

    fn completion(content: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
            ]
        }))
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt(&item());
        let b = build_prompt(&item());
        assert_eq!(a, b);
        assert_eq!(
            a,
            "Summarize this news in one short sentence:\nTitle: Rain expected\nDescription: Heavy rain across the coast"
        );
    }

    #[test]
    fn test_prompt_with_empty_description() {
        let mut it = item();
        it.description = String::new();
        assert!(build_prompt(&it).ends_with("\nDescription: "));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let s = OpenAiSummarizer::new("https://api.test/v1", Some("sk-secret".into()), "m", 10);
        assert!(!format!("{s:?}").contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_summarize_sends_request_and_trims() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "user", "content": build_prompt(&item()) }],
                "max_tokens": 60
            })))
            .respond_with(completion(json!("  Coastal areas brace for heavy rain.\n")))
            .expect(1)
            .mount(&server)
            .await;

        let summary = summarizer_for(&server).summarize(&item()).await.unwrap();
        assert_eq!(summary, "Coastal areas brace for heavy rain.");
    }

    #[tokio::test]
    async fn test_summarize_empty_content_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(completion(json!("   ")))
            .mount(&server)
            .await;

        let err = summarizer_for(&server).summarize(&item()).await.unwrap_err();
        assert!(matches!(err, DigestError::Summarization { .. }));
    }

    #[tokio::test]
    async fn test_summarize_null_content_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(completion(serde_json::Value::Null))
            .mount(&server)
            .await;

        let err = summarizer_for(&server).summarize(&item()).await.unwrap_err();
        assert!(err.to_string().contains("empty completion"));
    }

    #[tokio::test]
    async fn test_summarize_no_choices_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = summarizer_for(&server).summarize(&item()).await.unwrap_err();
        assert!(matches!(err, DigestError::Summarization { .. }));
    }

    #[tokio::test]
    async fn test_summarize_upstream_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "message": "Rate limit reached", "type": "requests" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = summarizer_for(&server).summarize(&item()).await.unwrap_err();
        match err {
            DigestError::Summarization { title, reason } => {
                assert_eq!(title, "Rain expected");
                assert!(reason.contains("429"));
                assert!(reason.contains("Rate limit reached"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_summarize_html_with_ok_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = summarizer_for(&server).summarize(&item()).await.unwrap_err();
        match err {
            DigestError::Summarization { title, reason } => {
                assert_eq!(title, "Rain expected");
                assert!(reason.starts_with("malformed response"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_summarize_connection_refused() {
        let s = OpenAiSummarizer::new(
            "http://127.0.0.1:9/v1",
            Some("sk-test".to_string()),
            "gpt-4o-mini",
            60,
        );
        let err = s.summarize(&item()).await.unwrap_err();
        assert!(matches!(err, DigestError::Summarization { .. }));
    }

    #[tokio::test]
    async fn test_summarize_without_key() {
        let s = OpenAiSummarizer::new("http://127.0.0.1:9/v1", None, "gpt-4o-mini", 60);
        let err = s.summarize(&item()).await.unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
