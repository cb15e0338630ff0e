use std::sync::Arc;

use crate::api::error;
use crate::modules::analysis::{
    analyzer::VideoAnalyzer,
    model::{AnalysisLookup, AnalysisStatus, AnalysisTask, AnalyzeResponse},
    queue::{AnalysisJob, AnalysisQueue, StatusBoard},
    sidecar,
};
use crate::modules::video::repository::VideoRepository;

#[derive(Clone)]
pub struct AnalysisService {
    videos: Arc<dyn VideoRepository + Send + Sync>,
    analyzer: Option<Arc<VideoAnalyzer>>,
    queue: Option<AnalysisQueue>,
    board: StatusBoard,
}

impl AnalysisService {
    /// Builds the service and, when an analyzer is configured, starts its queue.
    pub fn start(
        videos: Arc<dyn VideoRepository + Send + Sync>,
        analyzer: Option<Arc<VideoAnalyzer>>,
        concurrency: usize,
        capacity: usize,
    ) -> Self {
        let board = StatusBoard::default();
        let queue = analyzer
            .clone()
            .map(|analyzer| AnalysisQueue::start(analyzer, board.clone(), concurrency, capacity));

        if queue.is_none() {
            log::warn!("Video analysis disabled: no video model configured");
        }

        Self { videos, analyzer, queue, board }
    }

    pub fn is_enabled(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Queues background analysis for a freshly stored video.
    /// Returns whether the job was accepted.
    pub fn schedule(&self, filename: &str) -> bool {
        let Some(queue) = &self.queue else {
            return false;
        };

        queue.enqueue(AnalysisJob {
            filename: filename.to_string(),
            video_path: self.videos.path_of(filename),
        })
    }

    /// A sidecar on disk wins over the in-memory status, so a finished
    /// document stays readable while a re-analysis is pending.
    pub async fn lookup(&self, filename: &str) -> Result<AnalysisLookup, error::SystemError> {
        let path = self.videos.path_of(&sidecar::sidecar_name(filename));
        if let Some(analysis) = sidecar::read(&path).await? {
            return Ok(AnalysisLookup::Ready(Box::new(analysis)));
        }

        Ok(match self.board.get(filename) {
            Some(task) if task.status == AnalysisStatus::Pending => AnalysisLookup::Pending(task),
            Some(task) if task.status == AnalysisStatus::Failed => AnalysisLookup::Failed(task),
            _ => AnalysisLookup::Missing,
        })
    }

    pub async fn status(&self, filename: &str) -> Result<Option<AnalysisTask>, error::SystemError> {
        if let Some(task) = self.board.get(filename) {
            return Ok(Some(task));
        }

        let path = self.videos.path_of(&sidecar::sidecar_name(filename));
        Ok(tokio::fs::try_exists(&path).await?.then(|| AnalysisTask::done_on_disk(filename)))
    }

    /// Runs an analysis inline and waits for it.
    pub async fn analyze_now(&self, filename: &str) -> Result<AnalyzeResponse, error::SystemError> {
        let analyzer = self
            .analyzer
            .as_ref()
            .ok_or_else(|| error::SystemError::ai_disabled("AI analysis not available"))?;

        let video = self
            .videos
            .find(filename)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Video not found"))?;

        log::info!("Manual analysis requested for {}", filename);
        self.board.mark_pending(filename);

        match analyzer.analyze_and_save(&video.path).await {
            Ok((analysis, output_path)) => {
                self.board.mark_done(filename);
                let analysis_file = output_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| sidecar::sidecar_name(filename));
                Ok(AnalyzeResponse { success: true, analysis, analysis_file })
            }
            Err(e) => {
                log::error!("Analysis of {} failed: {}", filename, e);
                self.board.mark_failed(filename, e.reason());
                Err(e)
            }
        }
    }
}
