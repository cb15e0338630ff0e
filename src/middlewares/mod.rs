use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    web, Error,
};

use crate::{api::error, modules::video::service::VideoService};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Rejects uploads whose declared `Content-Length` already exceeds the
/// limit, before a single body byte is read.
pub async fn limit_upload_size<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let limit = req.app_data::<web::Data<VideoService>>().map(|service| service.max_file_size());
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.parse::<u64>().ok());

    if let (Some(limit), Some(declared)) = (limit, declared) {
        if declared > limit.saturating_add(MULTIPART_OVERHEAD) {
            log::warn!("Rejected upload of {} bytes (limit {})", declared, limit);
            return Err(error::Error::payload_too_large(format!(
                "File size exceeds maximum allowed size of {limit} bytes"
            ))
            .into());
        }
    }

    next.call(req).await
}
