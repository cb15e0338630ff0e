use std::path::Path;

use reqwest::{multipart, StatusCode};

use crate::api::error::{self, ErrorBody};
use crate::client::flow::{AnalysisPoll, BackendApi};
use crate::constants::VIDEO_FIELD;
use crate::modules::{
    analysis::model::VideoAnalysis,
    post::model::{GeneratePostModel, GeneratePostResponse},
    video::schema::{VideoSummary, VideoUploadResponse},
};

/// HTTP client for a running backend.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, http: reqwest::Client) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoSummary>, error::SystemError> {
        let response = self.http.get(self.url("/videos")).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }
}

/// Maps a non-success response back onto the error the server raised.
async fn error_from(response: reqwest::Response) -> error::SystemError {
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error.into_owned(),
        Err(_) => format!("Server responded with {status}"),
    };

    match status {
        StatusCode::BAD_REQUEST => error::SystemError::bad_request(message),
        StatusCode::NOT_FOUND => error::SystemError::not_found(message),
        StatusCode::PAYLOAD_TOO_LARGE => error::SystemError::payload_too_large(message),
        StatusCode::SERVICE_UNAVAILABLE => error::SystemError::ai_disabled(message),
        _ => error::SystemError::upstream(message),
    }
}

#[async_trait::async_trait]
impl BackendApi for ApiClient {
    async fn upload_video(&self, file: &Path) -> Result<VideoUploadResponse, error::SystemError> {
        let bytes = tokio::fs::read(file).await?;
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());
        let mime = mime_guess::from_path(file).first_or_octet_stream();

        let part = multipart::Part::bytes(bytes).file_name(name).mime_str(mime.as_ref())?;
        let form = multipart::Form::new().part(VIDEO_FIELD, part);

        log::debug!("Uploading {} to {}", file.display(), self.base_url);
        let response = self.http.post(self.url("/upload")).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn poll_analysis(&self, filename: &str) -> Result<AnalysisPoll, error::SystemError> {
        let response = self.http.get(self.url(&format!("/analysis/{filename}"))).send().await?;

        match response.status() {
            StatusCode::OK => {
                let analysis: VideoAnalysis = response.json().await?;
                Ok(AnalysisPoll::Ready(Box::new(analysis)))
            }
            // 404 covers servers that only learn about the file once the
            // sidecar lands.
            StatusCode::ACCEPTED | StatusCode::NOT_FOUND => Ok(AnalysisPoll::Pending),
            StatusCode::INTERNAL_SERVER_ERROR => {
                Ok(AnalysisPoll::Failed(error_from(response).await.reason()))
            }
            _ => Err(error_from(response).await),
        }
    }

    async fn generate_post(
        &self,
        request: &GeneratePostModel,
    ) -> Result<GeneratePostResponse, error::SystemError> {
        let response = self.http.post(self.url("/generate-post")).json(request).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }
}
