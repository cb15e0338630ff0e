use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::error;
use crate::modules::analysis::{
    client::VideoModel,
    model::VideoAnalysis,
    parser::parse_analysis,
    prompt::{mime_type_for, ANALYSIS_PROMPT},
    sidecar,
};
use crate::utils::bytes_to_mb;

/// Turns a stored video into an analysis document via a [`VideoModel`].
pub struct VideoAnalyzer {
    model: Arc<dyn VideoModel>,
    max_video_bytes: u64,
}

impl VideoAnalyzer {
    pub fn new(model: Arc<dyn VideoModel>, max_video_bytes: u64) -> Self {
        log::info!(
            "Video analysis enabled with {} (limit {:.0} MB)",
            model.name(),
            bytes_to_mb(max_video_bytes)
        );
        Self { model, max_video_bytes }
    }

    pub async fn analyze(&self, video_path: &Path) -> Result<VideoAnalysis, error::SystemError> {
        let metadata = match tokio::fs::metadata(video_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(error::SystemError::not_found("Video not found"));
            }
            Err(e) => return Err(e.into()),
        };

        let size = metadata.len();
        let size_mb = bytes_to_mb(size);
        log::info!("Analyzing video {} ({:.2} MB)", video_path.display(), size_mb);

        if size > self.max_video_bytes {
            return Err(error::SystemError::payload_too_large(format!(
                "Video file too large for analysis. Limit is {:.0} MB",
                bytes_to_mb(self.max_video_bytes)
            )));
        }

        let video = tokio::fs::read(video_path).await?;
        let mime_type = mime_type_for(video_path);
        let reply = self.model.describe_video(ANALYSIS_PROMPT, &video, mime_type).await?;

        let mut analysis = parse_analysis(&reply);
        if analysis.is_fallback() {
            log::warn!(
                "Model reply for {} was not valid JSON, keeping raw text",
                video_path.display()
            );
        }
        let video_file = video_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        analysis.stamp(video_file, size_mb, chrono::Utc::now());

        Ok(analysis)
    }

    /// Analyzes the video and writes the sidecar next to it.
    pub async fn analyze_and_save(
        &self,
        video_path: &Path,
    ) -> Result<(VideoAnalysis, PathBuf), error::SystemError> {
        let analysis = self.analyze(video_path).await?;

        let output_path = sidecar::sidecar_path(video_path);
        sidecar::write(&output_path, &analysis).await?;
        log::info!("Analysis saved to {}", output_path.display());

        Ok((analysis, output_path))
    }
}
