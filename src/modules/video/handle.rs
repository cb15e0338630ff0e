use actix_multipart::Multipart;
use actix_web::{get, web, HttpResponse};
use futures_util::{stream, TryStreamExt};
use tokio::io::AsyncReadExt;

use crate::api::{error, success::Success};
use crate::constants::VIDEO_FIELD;
use crate::modules::analysis::service::AnalysisService;
use crate::modules::video::{
    schema::{VideoSummary, VideoUploadResponse},
    service::VideoService,
};
use crate::utils::ensure_plain_filename;

const STREAM_CHUNK: usize = 64 * 1024;

/// Upload video handler
pub async fn upload_video(
    mut payload: Multipart,
    video_service: web::Data<VideoService>,
    analysis_service: web::Data<AnalysisService>,
) -> Result<Success<VideoUploadResponse>, error::Error> {
    let limit = video_service.max_file_size();
    let _slot = video_service.reserve_upload().await?;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| error::Error::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        if upload.is_some() || field.name() != Some(VIDEO_FIELD) {
            // Drain fields we don't use
            while field.try_next().await.map_err(|_| error::Error::InternalServer)?.is_some() {}
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
            .ok_or_else(|| error::Error::bad_request("Missing filename"))?;

        // Buffer in memory; nothing reaches disk until the size is known to be fine
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|_| error::Error::InternalServer)? {
            if (bytes.len() + chunk.len()) as u64 > limit {
                return Err(error::Error::payload_too_large(format!(
                    "File size exceeds maximum allowed size of {limit} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        upload = Some((filename, bytes));
    }

    let (original_filename, bytes) =
        upload.ok_or_else(|| error::Error::bad_request("No video file uploaded"))?;

    let video = video_service.upload(&original_filename, bytes).await?;
    let analysis_pending = analysis_service.schedule(&video.filename);

    Ok(Success::ok(VideoUploadResponse {
        success: true,
        filename: video.filename,
        size: video.size,
        path: video.path.display().to_string(),
        analysis_pending,
    }))
}

#[get("/videos")]
pub async fn list_videos(
    video_service: web::Data<VideoService>,
) -> Result<Success<Vec<VideoSummary>>, error::Error> {
    let videos = video_service.list().await?;
    Ok(Success::ok(videos))
}

/// Streams a stored file back in fixed-size chunks
#[get("/uploads/{filename}")]
pub async fn serve_upload(
    video_service: web::Data<VideoService>,
    filename: web::Path<String>,
) -> Result<HttpResponse, error::Error> {
    let filename = ensure_plain_filename(&filename)?;

    let (file, video) = video_service
        .open(filename)
        .await?
        .ok_or_else(|| error::Error::not_found("Video not found"))?;

    let body = stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; STREAM_CHUNK];
        let read = file.read(&mut buf).await?;
        if read == 0 {
            return Ok::<_, std::io::Error>(None);
        }
        buf.truncate(read);
        Ok(Some((web::Bytes::from(buf), file)))
    });

    let mime = mime_guess::from_path(&video.path).first_or_octet_stream();
    Ok(HttpResponse::Ok().content_type(mime.essence_str()).no_chunking(video.size).streaming(body))
}
