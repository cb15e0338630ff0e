use crate::modules::analysis::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(get_analysis_status).service(get_analysis).service(trigger_analysis);
}
