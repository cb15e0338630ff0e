use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use serde_json::Value;

use crate::api::error;
use crate::modules::{
    self,
    analysis::{AnalysisService, VideoAnalyzer, VideoModel},
    post::{ChatMessage, ChatModel, PostService},
    video::{UploadConfig, VideoFsRepository, VideoService},
};

const BOUNDARY: &str = "----snarkboundary";

const MODEL_REPLY: &str = r#"Here you go:
```json
{
  "outfit": {"description": "navy blazer over a hoodie", "items": ["blazer", "hoodie"], "colors": ["navy"]},
  "activity": {"description": "typing furiously", "actions": ["typing"], "intensity": "medium"},
  "background": {"description": "open plan office", "location_type": "office", "environment": "indoor", "lighting": "fluorescent"},
  "summary": "Someone typing in an office"
}
```"#;

struct StaticVideoModel;

#[async_trait::async_trait]
impl VideoModel for StaticVideoModel {
    fn name(&self) -> &str {
        "static"
    }

    async fn describe_video(
        &self,
        _prompt: &str,
        _video: &[u8],
        _mime_type: &str,
    ) -> Result<String, error::SystemError> {
        Ok(MODEL_REPLY.to_string())
    }
}

/// Holds every call until the test releases it.
struct GatedVideoModel {
    gate: Arc<tokio::sync::Semaphore>,
}

#[async_trait::async_trait]
impl VideoModel for GatedVideoModel {
    fn name(&self) -> &str {
        "gated"
    }

    async fn describe_video(
        &self,
        _prompt: &str,
        _video: &[u8],
        _mime_type: &str,
    ) -> Result<String, error::SystemError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| error::SystemError::upstream("gate closed"))?;
        Ok(MODEL_REPLY.to_string())
    }
}

struct FailingVideoModel;

#[async_trait::async_trait]
impl VideoModel for FailingVideoModel {
    fn name(&self) -> &str {
        "failing"
    }

    async fn describe_video(
        &self,
        _prompt: &str,
        _video: &[u8],
        _mime_type: &str,
    ) -> Result<String, error::SystemError> {
        Err(error::SystemError::upstream("model quota exceeded"))
    }
}

struct EchoChatModel;

#[async_trait::async_trait]
impl ChatModel for EchoChatModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, error::SystemError> {
        let user = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        Ok(format!("Agree? {user}"))
    }
}

struct Harness {
    videos: VideoService,
    analysis: AnalysisService,
    posts: PostService,
}

fn harness(dir: &Path, max_upload: u64, with_ai: bool) -> Harness {
    let model = with_ai.then(|| Arc::new(StaticVideoModel) as Arc<dyn VideoModel>);
    harness_with_model(dir, max_upload, model)
}

fn harness_with_model(
    dir: &Path,
    max_upload: u64,
    model: Option<Arc<dyn VideoModel>>,
) -> Harness {
    let repo = Arc::new(VideoFsRepository::new(dir));
    let videos = VideoService::new(repo.clone(), UploadConfig::new(dir, max_upload));

    let with_ai = model.is_some();
    let analyzer = model.map(|model| Arc::new(VideoAnalyzer::new(model, max_upload)));
    let analysis = AnalysisService::start(repo, analyzer, 2, 8);

    let chat = with_ai.then(|| Arc::new(EchoChatModel) as Arc<dyn ChatModel>);
    let posts = PostService::new(chat);

    Harness { videos, analysis, posts }
}

/// Uploads a small clip and returns its stored name.
macro_rules! upload_clip {
    ($app:expr) => {{
        let req = upload_request("video", "clip.mp4", b"fake video").to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        assert_eq!(body["analysis_pending"], true);
        body["filename"].as_str().unwrap().to_string()
    }};
}

macro_rules! init_app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.videos.clone()))
                .app_data(web::Data::new($harness.analysis.clone()))
                .app_data(web::Data::new($harness.posts.clone()))
                .configure(modules::configure),
        )
        .await
    };
}

fn multipart(field: &str, filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

fn upload_request(field: &str, filename: &str, content: &[u8]) -> test::TestRequest {
    let (content_type, body) = multipart(field, filename, content);
    test::TestRequest::post()
        .uri("/upload")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
}

fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[actix_web::test]
async fn upload_then_poll_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 1024 * 1024, true);
    let app = init_app!(h);

    let req = upload_request("video", "desk.MP4", b"fake video").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let filename = body["filename"].as_str().unwrap().to_string();
    assert!(filename.starts_with("video-") && filename.ends_with(".mp4"));
    assert_eq!(body["size"], 10);
    assert_eq!(body["analysis_pending"], true);

    let mut analysis = None;
    for _ in 0..200 {
        let req = test::TestRequest::get().uri(&format!("/analysis/{filename}")).to_request();
        let res = test::call_service(&app, req).await;
        match res.status() {
            StatusCode::OK => {
                analysis = Some(test::read_body_json::<Value, _>(res).await);
                break;
            }
            StatusCode::ACCEPTED => tokio::time::sleep(Duration::from_millis(10)).await,
            other => panic!("unexpected status {other}"),
        }
    }

    let analysis = analysis.expect("analysis never completed");
    assert_eq!(analysis["outfit"]["description"], "navy blazer over a hoodie");
    assert_eq!(analysis["activity"]["intensity"], "medium");
    assert_eq!(analysis["background"]["location_type"], "office");
    assert_eq!(analysis["summary"], "Someone typing in an office");
    assert_eq!(analysis["video_file"], filename.as_str());
    assert!(dir.path().join(filename.replace(".mp4", "-analysis.json")).exists());

    let req = test::TestRequest::get().uri(&format!("/analysis/{filename}/status")).to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["status"], "done");
}

#[actix_web::test]
async fn analysis_in_flight_is_reported_as_pending() {
    let dir = tempfile::tempdir().unwrap();
    let gate = Arc::new(tokio::sync::Semaphore::new(0));
    let model = Arc::new(GatedVideoModel { gate: gate.clone() }) as Arc<dyn VideoModel>;
    let h = harness_with_model(dir.path(), 1024 * 1024, Some(model));
    let app = init_app!(h);

    let filename = upload_clip!(&app);

    let req = test::TestRequest::get().uri(&format!("/analysis/{filename}")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["filename"], filename.as_str());
    assert_eq!(body["status"], "pending");

    let req = test::TestRequest::get().uri(&format!("/analysis/{filename}/status")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "pending");

    gate.add_permits(1);
    let mut status = StatusCode::ACCEPTED;
    for _ in 0..200 {
        let req = test::TestRequest::get().uri(&format!("/analysis/{filename}")).to_request();
        status = test::call_service(&app, req).await.status();
        if status != StatusCode::ACCEPTED {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn failed_analysis_is_reported_with_reason() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(FailingVideoModel) as Arc<dyn VideoModel>;
    let h = harness_with_model(dir.path(), 1024 * 1024, Some(model));
    let app = init_app!(h);

    let filename = upload_clip!(&app);

    let mut failed = None;
    for _ in 0..200 {
        let req = test::TestRequest::get().uri(&format!("/analysis/{filename}")).to_request();
        let res = test::call_service(&app, req).await;
        match res.status() {
            StatusCode::ACCEPTED => tokio::time::sleep(Duration::from_millis(10)).await,
            StatusCode::INTERNAL_SERVER_ERROR => {
                failed = Some(test::read_body_json::<Value, _>(res).await);
                break;
            }
            other => panic!("unexpected status {other}"),
        }
    }

    let body = failed.expect("analysis never failed");
    assert_eq!(body["error"], "Analysis failed: model quota exceeded");

    let req = test::TestRequest::get().uri(&format!("/analysis/{filename}/status")).to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["status"], "failed");
    assert_eq!(status["error"], "model quota exceeded");
    assert!(!dir.path().join(filename.replace(".mp4", "-analysis.json")).exists());
}

#[actix_web::test]
async fn upload_without_video_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 1024, false);
    let app = init_app!(h);

    let req = upload_request("attachment", "a.mp4", b"data").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "No video file uploaded");
    assert_eq!(files_in(dir.path()), 0);
}

#[actix_web::test]
async fn upload_with_unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 1024, false);
    let app = init_app!(h);

    let req = upload_request("video", "notes.txt", b"data").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(files_in(dir.path()), 0);
}

#[actix_web::test]
async fn oversize_upload_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 8, true);
    let app = init_app!(h);

    let req = upload_request("video", "big.mp4", &[7u8; 64]).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(files_in(dir.path()), 0);
}

#[actix_web::test]
async fn declared_length_over_limit_is_refused_early() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 8, false);
    let app = init_app!(h);

    let req = upload_request("video", "huge.mp4", &vec![0u8; 128 * 1024]).to_request();
    let status = match test::try_call_service(&app, req).await {
        Ok(res) => res.status(),
        Err(e) => e.as_response_error().status_code(),
    };
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(files_in(dir.path()), 0);
}

#[actix_web::test]
async fn unknown_analysis_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 1024, true);
    let app = init_app!(h);

    let req = test::TestRequest::get().uri("/analysis/video-1-1.mp4").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Analysis not found");

    let req = test::TestRequest::get().uri("/analysis/video-1-1.mp4/status").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn manual_analysis_requires_ai() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("clip.mp4"), b"clip").unwrap();
    let h = harness(dir.path(), 1024, false);
    let app = init_app!(h);

    let req = test::TestRequest::post().uri("/analyze/clip.mp4").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "AI analysis not available");
}

#[actix_web::test]
async fn manual_analysis_of_missing_video_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 1024, true);
    let app = init_app!(h);

    let req = test::TestRequest::post().uri("/analyze/ghost.mp4").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Video not found");
}

#[actix_web::test]
async fn manual_analysis_writes_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("clip.webm"), b"clip").unwrap();
    let h = harness(dir.path(), 1024, true);
    let app = init_app!(h);

    let req = test::TestRequest::post().uri("/analyze/clip.webm").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["analysis_file"], "clip-analysis.json");
    assert_eq!(body["analysis"]["summary"], "Someone typing in an office");

    let req = test::TestRequest::get().uri("/analysis/clip.webm").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn path_traversal_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 1024, true);
    let app = init_app!(h);

    let req = test::TestRequest::get().uri("/uploads/..%2Fsecret.mp4").to_request();
    let status = test::call_service(&app, req).await.status();
    assert!(status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn lists_mp4_and_webm_only() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.mp4", "b.webm", "c.mov", "a-analysis.json"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    let h = harness(dir.path(), 1024, false);
    let app = init_app!(h);

    let req = test::TestRequest::get().uri("/videos").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let mut names: Vec<&str> = body.iter().filter_map(|v| v["filename"].as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["a.mp4", "b.webm"]);
}

#[actix_web::test]
async fn serves_uploaded_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("clip.webm"), b"webm bytes").unwrap();
    let h = harness(dir.path(), 1024, false);
    let app = init_app!(h);

    let req = test::TestRequest::get().uri("/uploads/clip.webm").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "video/webm");
    assert_eq!(test::read_body(res).await.as_ref(), b"webm bytes");

    let req = test::TestRequest::get().uri("/uploads/missing.mp4").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn generates_posts_with_and_without_ai() {
    let dir = tempfile::tempdir().unwrap();

    let h = harness(dir.path(), 1024, true);
    let app = init_app!(h);
    let req = test::TestRequest::post()
        .uri("/generate-post")
        .set_json(serde_json::json!({"postType": "boardy", "context": "new job", "hasFile": false}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["style"], "boardy");
    assert_eq!(body["source"], "ai");
    assert!(body["post"].as_str().unwrap().contains("new job"));

    let h = harness(dir.path(), 1024, false);
    let app = init_app!(h);
    let req = test::TestRequest::post()
        .uri("/generate-post")
        .set_json(serde_json::json!({"style": "serious", "context": "layoffs"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["source"], "template");
    assert!(!body["post"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn unknown_post_style_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 1024, true);
    let app = init_app!(h);

    let req = test::TestRequest::post()
        .uri("/generate-post")
        .set_json(serde_json::json!({"style": "unhinged"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Unknown post style: unhinged");
}

#[actix_web::test]
async fn health_reports_configured_services() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), 1024, false);
    let app = init_app!(h);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["video_upload"], true);
    assert_eq!(body["services"]["video_analysis"], false);
    assert_eq!(body["services"]["post_generation"], false);
}
