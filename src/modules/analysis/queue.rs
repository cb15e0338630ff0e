//! Background analysis queue.
//!
//! Uploads push a job onto a bounded channel and return immediately. A
//! dispatcher task drains the channel and runs each job under a semaphore,
//! so at most `concurrency` model calls are in flight. Every job's progress
//! is recorded on a [`StatusBoard`] that the polling endpoints read.
//!
//! Status transitions: `pending -> done` or `pending -> failed`. A later
//! re-analysis of the same file starts again from `pending`. Finished jobs
//! leave the board: `done` is answered from the sidecar on disk, and only the
//! most recent [`MAX_FAILED_TASKS`] failures are remembered.
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{mpsc, Semaphore};

use crate::modules::analysis::{
    analyzer::VideoAnalyzer,
    model::{AnalysisStatus, AnalysisTask},
};

/// Failed tasks kept for status queries; older failures are forgotten.
pub const MAX_FAILED_TASKS: usize = 256;

#[derive(Debug)]
pub struct AnalysisJob {
    pub filename: String,
    pub video_path: PathBuf,
}

#[derive(Default)]
struct Tasks {
    by_name: HashMap<String, AnalysisTask>,
    /// Failed filenames, oldest first.
    failed: VecDeque<String>,
}

impl Tasks {
    fn forget_failure(&mut self, filename: &str) {
        self.failed.retain(|name| name != filename);
    }
}

/// Shared, lock-protected task table. The lock is never held across `.await`.
#[derive(Clone, Default)]
pub struct StatusBoard {
    tasks: Arc<RwLock<Tasks>>,
}

impl StatusBoard {
    fn read(&self) -> RwLockReadGuard<'_, Tasks> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tasks> {
        self.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, filename: &str) -> Option<AnalysisTask> {
        self.read().by_name.get(filename).cloned()
    }

    pub fn mark_pending(&self, filename: &str) {
        let mut tasks = self.write();
        tasks.forget_failure(filename);
        tasks.by_name.insert(filename.to_string(), AnalysisTask::pending(filename));
    }

    /// The sidecar is the record of a finished analysis, so the task is dropped.
    pub fn mark_done(&self, filename: &str) {
        let mut tasks = self.write();
        tasks.forget_failure(filename);
        tasks.by_name.remove(filename);
    }

    pub fn mark_failed(&self, filename: &str, reason: impl Into<String>) {
        let mut tasks = self.write();
        let task = tasks
            .by_name
            .entry(filename.to_string())
            .or_insert_with(|| AnalysisTask::pending(filename));
        task.status = AnalysisStatus::Failed;
        task.error = Some(reason.into());
        task.finished_at = Some(chrono::Utc::now());

        tasks.forget_failure(filename);
        tasks.failed.push_back(filename.to_string());
        while tasks.failed.len() > MAX_FAILED_TASKS {
            if let Some(oldest) = tasks.failed.pop_front() {
                tasks.by_name.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.read().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct AnalysisQueue {
    sender: mpsc::Sender<AnalysisJob>,
    board: StatusBoard,
}

impl AnalysisQueue {
    /// Spawns the dispatcher on the current tokio runtime.
    pub fn start(
        analyzer: Arc<VideoAnalyzer>,
        board: StatusBoard,
        concurrency: usize,
        capacity: usize,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let permits = Arc::new(Semaphore::new(concurrency.max(1)));

        tokio::spawn(dispatch(receiver, analyzer, board.clone(), permits));

        Self { sender, board }
    }

    /// Queues a job. Returns false when the queue is full or stopped; the
    /// task is then recorded as failed.
    pub fn enqueue(&self, job: AnalysisJob) -> bool {
        let filename = job.filename.clone();
        self.board.mark_pending(&filename);

        match self.sender.try_send(job) {
            Ok(()) => {
                tracing::debug!("Queued analysis for {}", filename);
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Analysis queue full, dropping {}", filename);
                self.board.mark_failed(&filename, "Analysis queue is full");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!("Analysis queue stopped, dropping {}", filename);
                self.board.mark_failed(&filename, "Analysis queue is not running");
                false
            }
        }
    }
}

async fn dispatch(
    mut receiver: mpsc::Receiver<AnalysisJob>,
    analyzer: Arc<VideoAnalyzer>,
    board: StatusBoard,
    permits: Arc<Semaphore>,
) {
    tracing::info!("Analysis queue started");

    while let Some(job) = receiver.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let analyzer = analyzer.clone();
        let board = board.clone();

        tokio::spawn(async move {
            let _permit = permit;
            run_job(&analyzer, &board, job).await;
        });
    }

    tracing::info!("Analysis queue stopped");
}

async fn run_job(analyzer: &VideoAnalyzer, board: &StatusBoard, job: AnalysisJob) {
    tracing::info!("Starting analysis of {}", job.filename);

    match analyzer.analyze_and_save(&job.video_path).await {
        Ok((_, path)) => {
            tracing::info!("Analysis of {} complete: {}", job.filename, path.display());
            board.mark_done(&job.filename);
        }
        Err(e) => {
            tracing::error!("Analysis of {} failed: {}", job.filename, e);
            board.mark_failed(&job.filename, e.reason());
        }
    }
}
