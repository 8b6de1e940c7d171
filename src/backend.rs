//! Text generation backend adapter.
//!
//! The server talks to an external OpenAI-compatible chat-completions
//! endpoint (llama.cpp, LM Studio, or any remote API speaking the same
//! wire format). The endpoint sits behind the [`TextGeneration`] trait so
//! the dispatcher can be exercised against a stub in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::params::GenerationRequest;

/// Single-shot text completion. Implementations must be safe for concurrent
/// calls; the dispatcher does not serialize requests.
#[async_trait]
pub trait TextGeneration: Send + Sync {
    /// Generate a complete response for the validated request. No streaming;
    /// no partial output is surfaced. Failures are wrapped once into
    /// [`ServerError::GenerationFailed`] and propagated unchanged.
    async fn generate(
        &self,
        request: &GenerationRequest,
        system_instructions: &str,
    ) -> Result<String, ServerError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl ChatCompletionResponse {
    fn into_content(self) -> Result<String, ServerError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                ServerError::GenerationFailed("backend returned no choices".into())
            })
    }
}

/// Backend adapter for an OpenAI-compatible chat-completions endpoint.
///
/// The reqwest client is constructed once and reused across calls; it is
/// safe for concurrent use. The model never receives a tool list, so it is
/// used purely for completion, not agentic action.
#[derive(Clone)]
pub struct ChatCompletionsBackend {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ChatCompletionsBackend {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn build_request<'a>(
        &'a self,
        request: &'a GenerationRequest,
        system_instructions: &'a str,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system_instructions,
                },
                Message {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            stream: false,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl TextGeneration for ChatCompletionsBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
        system_instructions: &str,
    ) -> Result<String, ServerError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = self.build_request(request, system_instructions);

        tracing::debug!(
            endpoint = %url,
            model = %self.model,
            prompt_length = request.prompt.len(),
            temperature = request.temperature,
            max_tokens = ?request.max_tokens,
            "sending completion request"
        );

        let mut http_request = self.http.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        // No retry: the backend's failure description is wrapped once and
        // surfaced to the caller as-is.
        let response = http_request
            .send()
            .await
            .map_err(|e| ServerError::GenerationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ServerError::GenerationFailed(format!(
                "backend returned {status}: {detail}"
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ServerError::GenerationFailed(e.to_string()))?;

        let content = completion.into_content()?;
        tracing::debug!(response_length = content.len(), "received completion");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvOverrides;
    use serde_json::json;

    fn backend() -> ChatCompletionsBackend {
        let config = ServerConfig::from_parts(
            Some("Answer briefly.".into()),
            false,
            Some("http://localhost:8080/v1/".into()),
            Some("test-model".into()),
            EnvOverrides::default(),
        );
        ChatCompletionsBackend::new(&config)
    }

    #[test]
    fn trailing_slash_is_stripped_from_endpoint() {
        assert_eq!(backend().endpoint, "http://localhost:8080/v1");
    }

    #[test]
    fn request_wire_format_matches_chat_completions() {
        let backend = backend();
        let request = GenerationRequest {
            prompt: "What is 2+2?".into(),
            temperature: 0.2,
            max_tokens: Some(64),
        };
        let body = backend.build_request(&request, "Answer briefly.");
        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(
            wire,
            json!({
                "model": "test-model",
                "messages": [
                    {"role": "system", "content": "Answer briefly."},
                    {"role": "user", "content": "What is 2+2?"}
                ],
                "stream": false,
                "temperature": 0.2,
                "max_tokens": 64
            })
        );
    }

    #[test]
    fn absent_max_tokens_is_omitted_from_the_wire() {
        let backend = backend();
        let request = GenerationRequest {
            prompt: "hi".into(),
            temperature: 0.7,
            max_tokens: None,
        };
        let wire = serde_json::to_value(backend.build_request(&request, "sys")).unwrap();
        assert!(wire.get("max_tokens").is_none());
    }

    #[test]
    fn response_content_is_extracted_from_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "4"}, "finish_reason": "stop"}
            ]
        }))
        .unwrap();
        assert_eq!(response.into_content().unwrap(), "4");
    }

    #[test]
    fn empty_choices_is_a_generation_failure() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        let err = response.into_content().unwrap_err();
        assert!(matches!(err, ServerError::GenerationFailed(_)));
    }
}
