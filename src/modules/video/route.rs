use actix_web::{middleware::from_fn, web};

use crate::middlewares::limit_upload_size;
use crate::modules::video::handle::*;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/upload")
            .wrap(from_fn(limit_upload_size))
            .route(web::post().to(upload_video)),
    )
    .service(list_videos)
    .service(serve_upload);
}
