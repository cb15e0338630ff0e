use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::api::success::Success;
use crate::modules::{analysis::AnalysisService, post::PostService};

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceFlags {
    pub video_upload: bool,
    pub video_analysis: bool,
    pub post_generation: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub services: ServiceFlags,
}

#[get("/health")]
pub async fn health_check(
    analysis_service: web::Data<AnalysisService>,
    post_service: web::Data<PostService>,
) -> Success<HealthResponse> {
    Success::ok(HealthResponse {
        status: "healthy".to_string(),
        services: ServiceFlags {
            video_upload: true,
            video_analysis: analysis_service.is_enabled(),
            post_generation: post_service.is_ai_enabled(),
        },
    })
}
