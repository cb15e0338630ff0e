use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{
    api::error,
    constants::LISTED_EXTENSIONS,
    modules::video::{repository::VideoRepository, schema::VideoEntity},
};

#[derive(Clone)]
pub struct VideoFsRepository {
    root: PathBuf,
}

impl VideoFsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entity(filename: &str, path: PathBuf, metadata: &std::fs::Metadata) -> VideoEntity {
        // Not every filesystem records birth time.
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map(chrono::DateTime::<chrono::Utc>::from)
            .unwrap_or_else(|_| chrono::Utc::now());

        VideoEntity { filename: filename.to_string(), size: metadata.len(), path, created }
    }

    fn is_listed(filename: &str) -> bool {
        LISTED_EXTENSIONS.iter().any(|ext| filename.ends_with(ext))
    }
}

#[async_trait::async_trait]
impl VideoRepository for VideoFsRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<VideoEntity, error::SystemError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.path_of(filename);
        tokio::fs::write(&path, bytes).await?;

        let metadata = tokio::fs::metadata(&path).await?;
        Ok(Self::entity(filename, path, &metadata))
    }

    async fn find(&self, filename: &str) -> Result<Option<VideoEntity>, error::SystemError> {
        let path = self.path_of(filename);

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(Some(Self::entity(filename, path, &metadata))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<VideoEntity>, error::SystemError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut videos = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !Self::is_listed(&filename) {
                continue;
            }

            let metadata = entry.metadata().await?;
            if metadata.is_file() {
                videos.push(Self::entity(&filename, entry.path(), &metadata));
            }
        }

        videos.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.filename.cmp(&b.filename)));
        Ok(videos)
    }

    async fn open(
        &self,
        filename: &str,
    ) -> Result<Option<(tokio::fs::File, VideoEntity)>, error::SystemError> {
        let Some(entity) = self.find(filename).await? else {
            return Ok(None);
        };

        match tokio::fs::File::open(&entity.path).await {
            Ok(file) => Ok(Some((file, entity))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
