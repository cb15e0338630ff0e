use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A video file stored in the uploads directory
#[derive(Debug, Clone, Serialize)]
pub struct VideoEntity {
    pub filename: String,
    pub size: u64,
    pub path: PathBuf,
    pub created: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUploadResponse {
    pub success: bool,
    pub filename: String,
    pub size: u64,
    pub path: String,
    pub analysis_pending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
    pub filename: String,
    pub size: u64,
    pub created: chrono::DateTime<chrono::Utc>,
}

impl From<VideoEntity> for VideoSummary {
    fn from(entity: VideoEntity) -> Self {
        Self { filename: entity.filename, size: entity.size, created: entity.created }
    }
}
