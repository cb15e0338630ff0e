use actix_web::web::ServiceConfig;

pub mod analysis;
pub mod health;
pub mod post;
pub mod video;

/// Every HTTP route the backend serves.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .configure(video::route::configure)
        .configure(analysis::route::configure)
        .configure(post::route::configure);
}
