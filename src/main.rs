use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use snark_scribe::{configs::build_services, modules, ENV};

fn cors(frontend_url: &str) -> Cors {
    if frontend_url == "*" {
        Cors::permissive()
    } else {
        Cors::default()
            .allowed_origin(frontend_url)
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_any_header()
            .max_age(3600)
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let services = build_services(&ENV)
        .await
        .map_err(|e| std::io::Error::other(format!("Service initialization error: {e}")))?;

    log::info!("Videos will be saved to {}", ENV.upload_dir);
    log::info!("Starting server at http://{}:{}", ENV.ip, ENV.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&ENV.frontend_url))
            .app_data(web::Data::new(services.videos.clone()))
            .app_data(web::Data::new(services.analysis.clone()))
            .app_data(web::Data::new(services.posts.clone()))
            .configure(modules::configure)
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(ENV.workers.max(1))
    .run()
    .await
}
