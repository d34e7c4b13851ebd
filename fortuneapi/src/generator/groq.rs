use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerationParams, TextGenerator};
use crate::core::prelude::*;

/// Client for Groq's OpenAI-compatible chat completions endpoint.
///
/// Sends the prompt as a single user message and returns the text of the
/// first choice.
///
#[derive(Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize, Debug)]
struct ReplyMessage {
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn generate_text(&self, params: &GenerationParams) -> Result<String, BackendError> {
        let request = ChatRequest {
            model: &params.model,
            messages: [ChatMessage {
                role: "user",
                content: &params.prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        debug!(model = %params.model, "requesting completion");
        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(BackendError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let params = GenerationParams::default();
        let request = ChatRequest {
            model: &params.model,
            messages: [ChatMessage {
                role: "user",
                content: &params.prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 500);
        assert!(json["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("luckyElement"));
    }

    #[test]
    fn completions_url_ignores_trailing_slash() {
        let client = GroqClient::new("http://localhost:1/v1/", "key");
        assert_eq!(client.completions_url(), "http://localhost:1/v1/chat/completions");
    }
}
