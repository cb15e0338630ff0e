use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::api::error;
use crate::modules::post::client::{ChatMessage, ChatModel};

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsModel {
    api_key: String,
    url: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message?
            .content
            .filter(|content| !content.trim().is_empty())
    }
}

impl ChatCompletionsModel {
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self { api_key: api_key.into(), url: url.into(), model: model.into(), client }
    }
}

#[async_trait::async_trait]
impl ChatModel for ChatCompletionsModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, error::SystemError> {
        let request = ChatRequest { model: &self.model, messages };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("AI gateway error: {} {}", status, body);
            return Err(error::SystemError::upstream(format!("AI gateway error: {status}")));
        }

        let body: ChatResponse = response.json().await?;
        body.first_content().ok_or_else(|| error::SystemError::upstream("No content generated"))
    }
}
