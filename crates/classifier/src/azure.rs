//! Azure OpenAI chat-completions client.

use crate::provider::CompletionProvider;
use crate::CompletionError;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sampling parameters sent with every request.
///
/// Two output tokens are enough for "yes"/"no".
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub max_completion_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            max_completion_tokens: 2,
            temperature: 1.0,
            top_p: 0.95,
            frequency_penalty: 0.0,
        }
    }
}

/// Client for a deployed chat-completions endpoint.
///
/// `endpoint` is the full deployment URL, including `api-version`.
pub struct AzureChatClient {
    client: HttpClient,
    endpoint: String,
    api_key: String,
    settings: CompletionSettings,
}

impl AzureChatClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, CompletionError> {
        let client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CompletionError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            settings: CompletionSettings::default(),
        })
    }

    pub fn with_settings(mut self, settings: CompletionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_completion_tokens: u32,
    temperature: f32,
    frequency_penalty: f32,
    top_p: f32,
    stop: Option<Vec<String>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionProvider for AzureChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_completion_tokens: self.settings.max_completion_tokens,
            temperature: self.settings.temperature,
            frequency_penalty: self.settings.frequency_penalty,
            top_p: self.settings.top_p,
            stop: None,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            error!("Completion API error: {} {}", status, body);
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| CompletionError::Decode(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyResponse)?;
        debug!("Completion answered {:?}", content);
        Ok(content)
    }

    fn name(&self) -> &str {
        "azure-openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let settings = CompletionSettings::default();
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            max_completion_tokens: settings.max_completion_tokens,
            temperature: settings.temperature,
            frequency_penalty: settings.frequency_penalty,
            top_p: settings.top_p,
            stop: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert_eq!(value["max_completion_tokens"], 2);
        assert_eq!(value["temperature"], 1.0);
        assert_eq!(value["frequency_penalty"], 0.0);
        assert!(value["stop"].is_null());
    }

    #[test]
    fn test_decode_null_content() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
