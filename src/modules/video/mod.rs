pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_fs;
pub mod route;
pub mod schema;
pub mod service;

pub use model::UploadConfig;
pub use repository::VideoRepository;
pub use repository_fs::VideoFsRepository;
pub use schema::{VideoEntity, VideoSummary, VideoUploadResponse};
pub use service::VideoService;
