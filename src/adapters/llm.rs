use crate::domain::ports::FortuneTeller;
use crate::utils::error::{FortuneError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponseChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatResponseChoice>,
}

/// Chat-completions client for OpenAI compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiTeller {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiTeller {
    pub fn new(endpoint: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl FortuneTeller for OpenAiTeller {
    async fn tell(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!("Making chat request to: {} ({})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| FortuneError::ExternalServiceError {
                message: format!("request to {} failed: {}", self.endpoint, e),
            })?;

        let status = response.status();
        tracing::debug!("Chat response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FortuneError::ExternalServiceError {
                message: format!("{} returned {}: {}", self.endpoint, status, body),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| FortuneError::ExternalServiceError {
                message: format!("unreadable reply: {}", e),
            })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| FortuneError::ExternalServiceError {
                message: "reply contained no message content".to_string(),
            })
    }
}
