use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod form;
pub mod reservation;

use crate::config::FormConfig;
use crate::form::resources::{DefaultResourceSource, FileResourceSource, HttpResourceSource};
use crate::form::RegistrationFormGenerator;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn validation_failed(message: &str) -> Self {
        Self::new("ValidationError", message)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new("ResourceUnavailable", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::form::handlers::generate_form,
        crate::form::handlers::update_form,
        crate::form::handlers::health
    ),
    components(
        schemas(
            reservation::ReservationRecord,
            reservation::Applicant,
            reservation::Payment,
            reservation::AdminAnnotation,
            reservation::Signature,
            reservation::SignatureKind,
            reservation::SignatureData,
            reservation::Reviewer,
            reservation::Scalar,
            form::handlers::HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Registration Form", description = "Guest house registration form generation.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
pub struct ApiDoc;

/// Build the form generator described by the configuration.
pub fn build_generator(config: &FormConfig) -> Result<RegistrationFormGenerator, reqwest::Error> {
    let http = HttpResourceSource::with_default_client(config.resource_base_url.clone())?;
    let source = DefaultResourceSource::new(http, FileResourceSource::new("."));
    Ok(
        RegistrationFormGenerator::new(Arc::new(source), config.locations.clone())
            .with_display_offset(config.display_offset),
    )
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));
    cors.allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600)
}

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = FormConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let generator = build_generator(&config).map_err(std::io::Error::other)?;
    let generator = web::Data::new(generator);

    let prometheus = PrometheusMetricsBuilder::new("reservation_form_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!(
        "Form template: {}, fonts: {} / {}",
        config.locations.template,
        config.locations.body_font,
        config.locations.symbol_font
    );
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let origins = config.cors_allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(build_cors(&origins))
            .app_data(generator.clone())
            .app_data(web::JsonConfig::default().limit(8 * 1024 * 1024))
            .service(web::scope("/api").configure(form::handlers::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
