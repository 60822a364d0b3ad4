// API route configuration

use crate::api::handlers;
use actix_web::{error, web, HttpResponse};

use super::models::ApiResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Liveness (no auth required)
        .route("/", web::get().to(handlers::root))
        .route("/health", web::get().to(handlers::health_check))
        // Requires the bearer key when one is configured
        .route("/parts", web::post().to(handlers::compare_parts));
}

/// Malformed bodies get the JSON error envelope instead of actix's plain text
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            let message = format!("Invalid request body: {err}");
            tracing::debug!(error = %err, "Rejected /parts payload");
            error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(ApiResponse::error(message)),
            )
            .into()
        })
}
