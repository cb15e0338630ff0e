//! Client-side view state for the two user interactions:
//!
//! ```text
//! upload:   Idle -> Uploading -> WaitingForAnalysis{1..N} -> Complete | Error
//! generate: Idle -> Generating -> Complete | Error
//! ```
//!
//! Polling runs at a fixed interval and gives up after a fixed number of
//! attempts. Nothing here is persisted between runs.
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::error;
use crate::constants::MIB;
use crate::modules::{
    analysis::model::VideoAnalysis,
    post::model::{GeneratePostModel, GeneratePostResponse, PostStyle},
    video::schema::VideoUploadResponse,
};
use crate::utils::bytes_to_mb;

#[derive(Debug, Clone, Copy)]
pub struct FlowConfig {
    pub poll_interval: Duration,
    pub max_attempts: u32,
    /// Files above this are refused before uploading.
    pub max_upload_bytes: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: 30,
            max_upload_bytes: 100 * MIB,
        }
    }
}

/// One answer from the analysis endpoint.
#[derive(Debug, Clone)]
pub enum AnalysisPoll {
    Ready(Box<VideoAnalysis>),
    Pending,
    Failed(String),
}

#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    async fn upload_video(&self, file: &Path) -> Result<VideoUploadResponse, error::SystemError>;

    async fn poll_analysis(&self, filename: &str) -> Result<AnalysisPoll, error::SystemError>;

    async fn generate_post(
        &self,
        request: &GeneratePostModel,
    ) -> Result<GeneratePostResponse, error::SystemError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    Uploading { file: PathBuf },
    WaitingForAnalysis { filename: String, attempt: u32 },
    Complete { filename: String, analysis: Option<Box<VideoAnalysis>> },
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateState {
    Idle,
    Generating { style: String },
    Complete { style: PostStyle, post: String },
    Error(String),
}

fn transition<S, F: FnMut(&S)>(observe: &mut F, next: S) -> S {
    observe(&next);
    next
}

/// Uploads `file`, then polls until the analysis is ready, failed, or the
/// attempt cap is hit. Returns the terminal state.
pub async fn run_upload<A, F>(
    api: &A,
    file: &Path,
    config: &FlowConfig,
    mut observe: F,
) -> UploadState
where
    A: BackendApi + ?Sized,
    F: FnMut(&UploadState),
{
    observe(&UploadState::Idle);

    let size = match tokio::fs::metadata(file).await {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            let message = format!("Cannot read {}: {e}", file.display());
            return transition(&mut observe, UploadState::Error(message));
        }
    };
    if size > config.max_upload_bytes {
        let message = format!(
            "File too large: {:.1} MB, please select a video smaller than {:.0} MB",
            bytes_to_mb(size),
            bytes_to_mb(config.max_upload_bytes)
        );
        return transition(&mut observe, UploadState::Error(message));
    }

    observe(&UploadState::Uploading { file: file.to_path_buf() });
    let uploaded = match api.upload_video(file).await {
        Ok(uploaded) => uploaded,
        Err(e) => return transition(&mut observe, UploadState::Error(e.reason())),
    };

    if !uploaded.analysis_pending {
        let done = UploadState::Complete { filename: uploaded.filename, analysis: None };
        return transition(&mut observe, done);
    }

    for attempt in 1..=config.max_attempts {
        observe(&UploadState::WaitingForAnalysis { filename: uploaded.filename.clone(), attempt });
        tokio::time::sleep(config.poll_interval).await;

        match api.poll_analysis(&uploaded.filename).await {
            Ok(AnalysisPoll::Ready(analysis)) => {
                let done = UploadState::Complete {
                    filename: uploaded.filename,
                    analysis: Some(analysis),
                };
                return transition(&mut observe, done);
            }
            Ok(AnalysisPoll::Pending) => continue,
            Ok(AnalysisPoll::Failed(reason)) => {
                return transition(&mut observe, UploadState::Error(reason));
            }
            Err(e) => return transition(&mut observe, UploadState::Error(e.reason())),
        }
    }

    let message = format!(
        "Analysis timed out after {} attempts. Check back later.",
        config.max_attempts
    );
    transition(&mut observe, UploadState::Error(message))
}

pub async fn run_generate<A, F>(
    api: &A,
    request: &GeneratePostModel,
    mut observe: F,
) -> GenerateState
where
    A: BackendApi + ?Sized,
    F: FnMut(&GenerateState),
{
    observe(&GenerateState::Idle);
    observe(&GenerateState::Generating { style: request.style.clone() });

    let next = match api.generate_post(request).await {
        Ok(response) if response.post.trim().is_empty() => {
            GenerateState::Error("No post generated".to_string())
        }
        Ok(response) => GenerateState::Complete { style: response.style, post: response.post },
        Err(e) => GenerateState::Error(e.reason()),
    };
    transition(&mut observe, next)
}
