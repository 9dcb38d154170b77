//! Groq chat model over its OpenAI-compatible `/chat/completions` endpoint.
//!
//! This module is only available when the `groq` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{RagError, Result};
use crate::model::ChatModel;

/// The default Groq API base URL.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// The default Groq model.
pub const DEFAULT_GROQ_MODEL: &str = "mixtral-8x7b-32768";

/// A [`ChatModel`] sending one user message per call to Groq.
///
/// Any OpenAI-compatible chat server works via [`GroqChatModel::with_base_url`].
pub struct GroqChatModel {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqChatModel {
    /// Create a model client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::ModelError {
                model: DEFAULT_GROQ_MODEL.into(),
                message: "API key must not be empty".into(),
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: GROQ_API_BASE.into(),
            model: DEFAULT_GROQ_MODEL.into(),
        })
    }

    /// Create a model client using the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| RagError::ModelError {
            model: DEFAULT_GROQ_MODEL.into(),
            message: "GROQ_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn model_error(&self, message: String) -> RagError {
        RagError::ModelError { model: self.model.clone(), message }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ChatResponse {
    fn into_content(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

#[async_trait]
impl ChatModel for GroqChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "sending chat completion");

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage { role: "user", content: prompt }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "request failed");
                self.model_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!(model = %self.model, %status, "API error");
            return Err(self.model_error(format!("API returned {status}: {detail}")));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "failed to parse response");
            self.model_error(format!("failed to parse response: {e}"))
        })?;

        parsed.into_content().ok_or_else(|| self.model_error("response had no content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        assert!(matches!(GroqChatModel::new(""), Err(RagError::ModelError { .. })));
    }

    #[test]
    fn endpoint_and_model_are_configurable() {
        let model = GroqChatModel::new("gsk-test")
            .unwrap()
            .with_base_url("http://localhost:8000/v1/")
            .with_model("llama-3.1-8b-instant");
        assert_eq!(model.endpoint(), "http://localhost:8000/v1/chat/completions");
        assert_eq!(model.name(), "llama-3.1-8b-instant");
    }

    #[test]
    fn request_is_a_single_user_message() {
        let body = ChatRequest {
            model: DEFAULT_GROQ_MODEL,
            messages: [ChatMessage { role: "user", content: "hi" }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "mixtral-8x7b-32768");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn first_choice_content_is_returned() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"answer"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_content().as_deref(), Some("answer"));

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.into_content(), None);
    }
}
