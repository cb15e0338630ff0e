use actix_web::{post, web};

use crate::api::{error, success::Success};
use crate::modules::post::{
    model::{GeneratePostModel, GeneratePostResponse},
    service::PostService,
};
use crate::utils::ValidatedJson;

#[post("/generate-post")]
pub async fn generate_post(
    post_service: web::Data<PostService>,
    request: ValidatedJson<GeneratePostModel>,
) -> Result<Success<GeneratePostResponse>, error::Error> {
    let response = post_service.generate(request.0).await?;
    Ok(Success::ok(response))
}
