use std::path::{Path, PathBuf};

use crate::{api::error, modules::video::schema::VideoEntity};

#[async_trait::async_trait]
pub trait VideoRepository {
    /// Directory holding videos and their analysis sidecars.
    fn root(&self) -> &Path;

    fn path_of(&self, filename: &str) -> PathBuf {
        self.root().join(filename)
    }

    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<VideoEntity, error::SystemError>;

    async fn find(&self, filename: &str) -> Result<Option<VideoEntity>, error::SystemError>;

    /// Videos with a listable extension, newest first.
    async fn list(&self) -> Result<Vec<VideoEntity>, error::SystemError>;

    async fn open(
        &self,
        filename: &str,
    ) -> Result<Option<(tokio::fs::File, VideoEntity)>, error::SystemError>;
}
