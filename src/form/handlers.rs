use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::traits::Validator;
use super::{GeneratedDocument, GeneratorError, RegistrationFormGenerator};
use crate::reservation::ReservationRecord;
use crate::ErrorResponse;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

fn pdf_response(document: GeneratedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(document.content_type())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        ))
        .body(document.pdf)
}

fn generation_failure(error: &GeneratorError) -> HttpResponse {
    match error {
        GeneratorError::ResourceFetch(e) => {
            log::error!("Form resource unavailable ({}): {}", e.location(), e);
            HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(&e.to_string()))
        }
        other => {
            log::error!("Registration form generation failed: {}", other);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&other.to_string()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/registration-form",
    tag = "Registration Form",
    request_body = ReservationRecord,
    responses(
        (status = 200, description = "Filled registration form", body = Vec<u8>, content_type = "application/pdf"),
        (status = 502, description = "Template or font could not be fetched", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_form(
    generator: web::Data<RegistrationFormGenerator>,
    record: web::Json<ReservationRecord>,
) -> impl Responder {
    match generator.generate(&record).await {
        Ok(document) => pdf_response(document),
        Err(e) => generation_failure(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/registration-form",
    tag = "Registration Form",
    request_body = ReservationRecord,
    responses(
        (status = 200, description = "Regenerated registration form", body = Vec<u8>, content_type = "application/pdf"),
        (status = 422, description = "Record is missing required fields or could not be regenerated", body = ErrorResponse)
    )
)]
pub async fn update_form(
    generator: web::Data<RegistrationFormGenerator>,
    record: web::Json<ReservationRecord>,
) -> impl Responder {
    if let Err(errors) = record.validate() {
        return HttpResponse::UnprocessableEntity()
            .json(ErrorResponse::validation_failed(&errors.to_report()));
    }

    match generator.update(&record).await {
        Some(document) => pdf_response(document),
        None => HttpResponse::UnprocessableEntity().json(ErrorResponse::new(
            "UpdateFailed",
            "The registration form could not be regenerated",
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Registration Form",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/registration-form")
            .route(web::post().to(generate_form))
            .route(web::put().to(update_form)),
    )
    .service(web::resource("/health").route(web::get().to(health)));
}
