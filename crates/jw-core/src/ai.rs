//! AI text generation client.
//!
//! The hosted endpoint takes `{prompt, maxTokens}` and answers `{text}`.
//! Nothing about the shape of the text is guaranteed, so callers parse it
//! loosely with [`parse_list`].

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use crate::config::AiConfig;
use crate::error::{WorkbenchError, WorkbenchResult};

/// Default text generation endpoint.
pub const DEFAULT_AI_URL: &str = "http://localhost:8787";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRequest {
    pub prompt: String,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl TextRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            model: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

/// Anything that can turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, request: TextRequest) -> WorkbenchResult<TextResponse>;
}

/// HTTP client for the hosted text generation endpoint.
#[derive(Clone)]
pub struct HttpTextGenerator {
    base_url: String,
    api_key: Option<String>,
    model: Option<String>,
    client: reqwest::Client,
}

impl HttpTextGenerator {
    pub fn new(config: &AiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
        }
    }

    async fn call(&self, mut request: TextRequest) -> anyhow::Result<TextResponse> {
        if request.model.is_none() {
            request.model = self.model.clone();
        }

        let mut builder = self
            .client
            .post(format!("{}/v1/ai/generate-text", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to reach text generation endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("text generation error ({}): {}", status, body);
        }

        let result: TextResponse = response
            .json()
            .await
            .context("Failed to parse text generation response")?;

        debug!(chars = result.text.len(), "Generated text");
        Ok(result)
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate_text(&self, request: TextRequest) -> WorkbenchResult<TextResponse> {
        self.call(request)
            .await
            .map_err(|e| WorkbenchError::ai(format!("{:#}", e)))
    }
}

/// Returns canned replies in order, repeating the last one. Records every
/// request. Used offline and in tests.
#[derive(Debug, Default)]
pub struct ScriptedTextGenerator {
    replies: Vec<Result<String, String>>,
    cursor: Mutex<usize>,
    requests: Mutex<Vec<TextRequest>>,
}

impl ScriptedTextGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            replies: vec![Ok(text.into())],
            ..Default::default()
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            replies: vec![Err(message.into())],
            ..Default::default()
        }
    }

    pub fn sequence(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<TextRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn generate_text(&self, request: TextRequest) -> WorkbenchResult<TextResponse> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request);

        let reply = {
            let mut cursor = self
                .cursor
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let index = (*cursor).min(self.replies.len().saturating_sub(1));
            *cursor += 1;
            self.replies.get(index).cloned()
        };

        match reply {
            Some(Ok(text)) => Ok(TextResponse { text }),
            Some(Err(message)) => Err(WorkbenchError::ai(message)),
            None => Err(WorkbenchError::ai("no scripted reply")),
        }
    }
}

/// Parse free text into list items: one per non-blank line, with a leading
/// `-`, `•` or `*` bullet stripped. At most `limit` items are kept.
pub fn parse_list(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let stripped = line
                .strip_prefix(['-', '•', '*'])
                .map(str::trim_start)
                .unwrap_or(line);
            stripped.trim().to_string()
        })
        .filter(|item| !item.is_empty())
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_strips_bullets() {
        let text = "- Audit renewals\n• Build health dashboard\n* Run QBR prep\n\nPlain line\n";
        assert_eq!(
            parse_list(text, 10),
            vec![
                "Audit renewals",
                "Build health dashboard",
                "Run QBR prep",
                "Plain line"
            ]
        );
    }

    #[test]
    fn test_parse_list_limit_and_empty_bullets() {
        let text = "-\n- a\n- b\n- c\n- d\n- e\n- f";
        assert_eq!(parse_list(text, 5), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_parse_list_keeps_numbering() {
        // Only bullet characters are stripped.
        assert_eq!(parse_list("1. First", 5), vec!["1. First"]);
    }

    #[test]
    fn test_request_wire_format() {
        let json = serde_json::to_string(&TextRequest::new("hi", 200)).unwrap();
        assert_eq!(json, r#"{"prompt":"hi","maxTokens":200}"#);
    }

    #[tokio::test]
    async fn test_scripted_generator_sequence() {
        let ai = ScriptedTextGenerator::sequence(vec![Ok("one".into()), Err("down".into())]);
        assert_eq!(ai.generate_text(TextRequest::new("a", 1)).await.unwrap().text, "one");
        assert!(ai.generate_text(TextRequest::new("b", 1)).await.is_err());
        // Last reply repeats.
        assert!(ai.generate_text(TextRequest::new("c", 1)).await.is_err());
        assert_eq!(ai.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_http_generator_reports_connection_failure() {
        let ai = HttpTextGenerator::new(&AiConfig {
            base_url: "http://127.0.0.1:9".into(),
            api_key: None,
            model: None,
            timeout_secs: 1,
        });
        let err = ai.generate_text(TextRequest::new("x", 1)).await.unwrap_err();
        assert!(matches!(err, WorkbenchError::Ai(_)));
    }
}
