use actix_web::{get, post, web, Either};

use crate::api::{error, success::Success};
use crate::modules::analysis::{
    model::{AnalysisLookup, AnalysisTask, AnalyzeResponse, VideoAnalysis},
    service::AnalysisService,
};
use crate::utils::ensure_plain_filename;

#[get("/analysis/{filename}")]
pub async fn get_analysis(
    analysis_service: web::Data<AnalysisService>,
    filename: web::Path<String>,
) -> Result<Either<Success<VideoAnalysis>, Success<AnalysisTask>>, error::Error> {
    let filename = ensure_plain_filename(&filename)?;

    match analysis_service.lookup(filename).await? {
        AnalysisLookup::Ready(analysis) => Ok(Either::Left(Success::ok(*analysis))),
        AnalysisLookup::Pending(task) => Ok(Either::Right(Success::accepted(task))),
        AnalysisLookup::Failed(task) => Err(error::Error::upstream(format!(
            "Analysis failed: {}",
            task.error.unwrap_or_else(|| "unknown error".to_string())
        ))),
        AnalysisLookup::Missing => Err(error::Error::not_found("Analysis not found")),
    }
}

#[get("/analysis/{filename}/status")]
pub async fn get_analysis_status(
    analysis_service: web::Data<AnalysisService>,
    filename: web::Path<String>,
) -> Result<Success<AnalysisTask>, error::Error> {
    let filename = ensure_plain_filename(&filename)?;

    analysis_service
        .status(filename)
        .await?
        .map(Success::ok)
        .ok_or_else(|| error::Error::not_found("Analysis not found"))
}

#[post("/analyze/{filename}")]
pub async fn trigger_analysis(
    analysis_service: web::Data<AnalysisService>,
    filename: web::Path<String>,
) -> Result<Success<AnalyzeResponse>, error::Error> {
    let filename = ensure_plain_filename(&filename)?;

    let response = analysis_service.analyze_now(filename).await.map_err(|e| match e {
        error::SystemError::Upstream(_) | error::SystemError::HttpError(_) => {
            error::Error::upstream(format!("Analysis failed: {}", e.reason()))
        }
        other => error::Error::from(other),
    })?;

    Ok(Success::ok(response))
}
