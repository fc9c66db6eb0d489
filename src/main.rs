use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use std::io;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use aidhub::{
    AppState,
    api::{self, docs::ApiDoc, helpers, middleware::RequestId},
    config::Config,
    database::{self, schema, seed},
};

fn build_cors(config: &Config) -> Cors {
    match config.cors_allowed_origin.as_deref() {
        Some(origin) if !origin.trim().is_empty() => Cors::default()
            .allowed_origin(origin.trim())
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
        _ => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| io::Error::other(format!("Failed to load configuration: {}", e)))?;
    let db = database::connect().await?;

    // Схема и справочники создаются идемпотентно
    schema::create_schema(&db)
        .await
        .map_err(|e| io::Error::other(format!("Failed to create schema: {}", e)))?;
    seed::seed_roles(&db)
        .await
        .map_err(|e| io::Error::other(format!("Failed to seed roles: {}", e)))?;

    let host = config.host.clone();
    let port = config.port;
    let workers = config.effective_workers();
    let body_limit = config.effective_max_body_bytes();

    log::info!("Starting server at http://{}:{} with {} workers", host, port, workers);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    let state = web::Data::new(AppState { db, config });

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .wrap(build_cors(&state.config))
            .wrap(RequestId)
            .app_data(state.clone())
            .app_data(helpers::payload_config(body_limit))
            .configure(api::init_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
