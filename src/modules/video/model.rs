use std::path::PathBuf;

use crate::constants::{MIB, UPLOAD_EXTENSIONS};

/// Video upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
    pub upload_dir: PathBuf,
    /// Uploads buffered in memory at once; peak buffer use is this times `max_file_size`.
    pub max_concurrent_uploads: usize,
}

impl UploadConfig {
    pub fn new(upload_dir: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self { upload_dir: upload_dir.into(), max_file_size, ..Default::default() }
    }

    pub fn with_concurrent_uploads(mut self, max_concurrent_uploads: usize) -> Self {
        self.max_concurrent_uploads = max_concurrent_uploads.max(1);
        self
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 500 * MIB,
            allowed_extensions: UPLOAD_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            upload_dir: PathBuf::from("./uploads"),
            max_concurrent_uploads: 4,
        }
    }
}
