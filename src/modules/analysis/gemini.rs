use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{api::error, modules::analysis::client::VideoModel};

/// `generateContent` client for Gemini video understanding.
pub struct GeminiVideoModel {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|part| part.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiVideoModel {
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self { api_key: api_key.into(), base_url: base_url.into(), model: model.into(), client }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

#[async_trait::async_trait]
impl VideoModel for GeminiVideoModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn describe_video(
        &self,
        prompt: &str,
        video: &[u8],
        mime_type: &str,
    ) -> Result<String, error::SystemError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type,
                            data: base64::engine::general_purpose::STANDARD.encode(video),
                        },
                    },
                ],
            }],
        };

        log::info!("Sending video to {} ({} bytes, {})", self.model, video.len(), mime_type);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(error::SystemError::upstream(format!(
                "Video model returned {status}: {body}"
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        body.into_text()
            .ok_or_else(|| error::SystemError::upstream("No content in video model response"))
    }
}
