//! Streaming chat completion client

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use super::stream::{ChunkStream, error_description, sse_chunk_stream};
use crate::config::EndpointConfig;
use crate::error::{BenchError, BenchResult};

/// Issues one streaming chat completion request per call.
///
/// The only network seam of the engine. Tests substitute scripted or mocked
/// implementations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatStreamClient: Send + Sync {
    /// Send `prompt` as a single user message to `endpoint` and return the
    /// chunk stream. Fails if the request cannot be issued or is rejected.
    async fn chat_stream(&self, endpoint: &EndpointConfig, prompt: &str)
    -> BenchResult<ChunkStream>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

/// Client for any endpoint speaking the OpenAI chat completions protocol
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Build a client without any request timeout.
    ///
    /// A hung endpoint only blocks its own worker.
    pub fn new() -> BenchResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("streambench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BenchError::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

/// `POST` target for chat completions under `base_url`
pub fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim().trim_end_matches('/'))
}

/// Message for a rejected request, preferring the provider's error text
fn rejection_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error").map(error_description))
        .filter(|message| !message.trim().is_empty());

    match from_body {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string(),
    }
}

#[async_trait]
impl ChatStreamClient for OpenAiCompatClient {
    #[instrument(
        skip(self, prompt),
        level = "debug",
        fields(endpoint = %endpoint.name, model = %endpoint.model)
    )]
    async fn chat_stream(
        &self,
        endpoint: &EndpointConfig,
        prompt: &str,
    ) -> BenchResult<ChunkStream> {
        let url = completions_url(&endpoint.base_url);
        let body = ChatRequest {
            model: &endpoint.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: true,
        };

        let mut request = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&body);
        if let Some(api_key) = endpoint.api_key() {
            request = request.bearer_auth(api_key);
        }

        tracing::debug!("Sending streaming request to {}", url);
        let response = request
            .send()
            .await
            .map_err(|e| BenchError::http(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!("Endpoint rejected request with {}: {}", status, text);
            return Err(BenchError::http_status(
                rejection_message(&text, status),
                url,
                status.as_u16(),
            ));
        }

        Ok(sse_chunk_stream(response.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_completions_url() {
        assert_eq!(
            completions_url("https://api.siliconflow.cn/v1"),
            "https://api.siliconflow.cn/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:8000/v1/ "),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "deepseek-r1",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            stream: true,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "model": "deepseek-r1",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": true
            })
        );
    }

    #[test]
    fn test_rejection_message_prefers_error_object() {
        let body = r#"{"error":{"message":"Invalid API key","type":"invalid_request_error"}}"#;
        assert_eq!(
            rejection_message(body, StatusCode::UNAUTHORIZED),
            "Invalid API key"
        );
    }

    #[test]
    fn test_rejection_message_falls_back_to_body_then_reason() {
        assert_eq!(
            rejection_message("upstream busy", StatusCode::SERVICE_UNAVAILABLE),
            "upstream busy"
        );
        assert_eq!(
            rejection_message("", StatusCode::NOT_FOUND),
            "Not Found"
        );
    }

    #[test]
    fn test_rejection_status_in_user_message() {
        let err = BenchError::http_status(
            rejection_message("", StatusCode::UNAUTHORIZED),
            "http://x/chat/completions",
            401,
        );
        assert_eq!(err.user_message(), "Unauthorized (401)");
    }
}
