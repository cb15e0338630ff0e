use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    api::error,
    constants::Env,
    modules::{
        analysis::{AnalysisService, GeminiVideoModel, VideoAnalyzer, VideoModel},
        post::{ChatCompletionsModel, ChatModel, PostService},
        video::{UploadConfig, VideoFsRepository, VideoService},
    },
};

/// Shared outbound client for AI vendors.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, error::SystemError> {
    let client = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?;
    Ok(client)
}

pub async fn prepare_upload_dir(dir: &str) -> Result<PathBuf, error::SystemError> {
    let path = PathBuf::from(dir);
    tokio::fs::create_dir_all(&path).await?;
    Ok(path)
}

pub fn video_model(env: &Env, client: &reqwest::Client) -> Option<Arc<dyn VideoModel>> {
    let api_key = env.gemini_api_key.as_ref()?;
    Some(Arc::new(GeminiVideoModel::new(
        client.clone(),
        api_key,
        &env.gemini_api_url,
        &env.gemini_model,
    )))
}

pub fn chat_model(env: &Env, client: &reqwest::Client) -> Option<Arc<dyn ChatModel>> {
    let api_key = env.chat_api_key.as_ref()?;
    Some(Arc::new(ChatCompletionsModel::new(
        client.clone(),
        api_key,
        &env.chat_api_url,
        &env.chat_model,
    )))
}

#[derive(Clone)]
pub struct Services {
    pub videos: VideoService,
    pub analysis: AnalysisService,
    pub posts: PostService,
}

/// Wires repositories, AI clients and services. Must run inside the
/// server's runtime because the analysis queue spawns its dispatcher.
pub async fn build_services(env: &Env) -> Result<Services, error::SystemError> {
    let upload_dir = prepare_upload_dir(&env.upload_dir).await?;
    let client = http_client(env.ai_request_timeout_secs)?;

    let repo = Arc::new(VideoFsRepository::new(&upload_dir));
    let upload_config = UploadConfig::new(&upload_dir, env.max_upload_bytes)
        .with_concurrent_uploads(env.upload_concurrency);
    let videos = VideoService::new(repo.clone(), upload_config);

    let analyzer = video_model(env, &client)
        .map(|model| Arc::new(VideoAnalyzer::new(model, env.max_analysis_bytes)));
    let analysis = AnalysisService::start(
        repo,
        analyzer,
        env.analysis_concurrency,
        env.analysis_queue_capacity,
    );

    let posts = PostService::new(chat_model(env, &client));

    Ok(Services { videos, analysis, posts })
}
