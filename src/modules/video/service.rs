use rand::Rng;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::api::error;
use crate::modules::video::{
    model::UploadConfig,
    repository::VideoRepository,
    schema::{VideoEntity, VideoSummary},
};
use crate::utils::bytes_to_mb;

#[derive(Clone)]
pub struct VideoService {
    repo: Arc<dyn VideoRepository + Send + Sync>,
    config: UploadConfig,
    upload_slots: Arc<Semaphore>,
}

impl VideoService {
    pub fn new(repo: Arc<dyn VideoRepository + Send + Sync>, config: UploadConfig) -> Self {
        log::info!(
            "VideoService initialized (dir: {}, limit: {:.0} MB)",
            config.upload_dir.display(),
            bytes_to_mb(config.max_file_size)
        );
        let upload_slots = Arc::new(Semaphore::new(config.max_concurrent_uploads.max(1)));
        Self { repo, config, upload_slots }
    }

    pub fn max_file_size(&self) -> u64 {
        self.config.max_file_size
    }

    /// Waits for a free upload slot. Hold the permit while the body is
    /// buffered so memory stays bounded by the configured concurrency.
    pub async fn reserve_upload(&self) -> Result<OwnedSemaphorePermit, error::SystemError> {
        self.upload_slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| error::SystemError::upstream("Upload slots closed"))
    }

    /// Validate size and extension, returning the normalized extension
    fn validate_file(
        &self,
        original_filename: &str,
        file_size: u64,
    ) -> Result<String, error::SystemError> {
        if file_size > self.config.max_file_size {
            return Err(error::SystemError::payload_too_large(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }

        if file_size == 0 {
            return Err(error::SystemError::bad_request("Uploaded video is empty"));
        }

        let extension = Path::new(original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !self.config.allows_extension(&extension) {
            return Err(error::SystemError::bad_request(format!(
                "File type not allowed. Allowed types: {}",
                self.config.allowed_extensions.join(", ")
            )));
        }

        Ok(extension)
    }

    /// `video-<unix millis>-<random>.<ext>`
    fn generate_filename(extension: &str) -> String {
        let suffix = rand::thread_rng().gen_range(0..1_000_000_000u32);
        format!("video-{}-{}.{}", chrono::Utc::now().timestamp_millis(), suffix, extension)
    }

    pub async fn upload(
        &self,
        original_filename: &str,
        bytes: Vec<u8>,
    ) -> Result<VideoEntity, error::SystemError> {
        let extension = self.validate_file(original_filename, bytes.len() as u64)?;
        let filename = Self::generate_filename(&extension);

        let entity = self.repo.save(&filename, &bytes).await?;
        log::info!(
            "Video uploaded: {} ({:.2} MB) saved to {}",
            entity.filename,
            bytes_to_mb(entity.size),
            entity.path.display()
        );

        Ok(entity)
    }

    pub async fn find(&self, filename: &str) -> Result<Option<VideoEntity>, error::SystemError> {
        self.repo.find(filename).await
    }

    pub async fn list(&self) -> Result<Vec<VideoSummary>, error::SystemError> {
        let videos = self.repo.list().await?;
        Ok(videos.into_iter().map(VideoSummary::from).collect())
    }

    pub async fn open(
        &self,
        filename: &str,
    ) -> Result<Option<(tokio::fs::File, VideoEntity)>, error::SystemError> {
        self.repo.open(filename).await
    }
}
