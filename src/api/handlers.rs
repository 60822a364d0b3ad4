// HTTP request handlers for API endpoints

use crate::api::models::*;
use crate::compare::PartsService;
use actix_web::{web, HttpResponse, Result};

/// Liveness marker
pub async fn root() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(StatusResponse {
        status: "RockAuto + eBay parts API is running".to_string(),
    }))
}

/// Health check endpoint
pub async fn health_check(service: web::Data<PartsService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        ebay_configured: service.ebay_configured(),
    }))
}

/// Compare catalog and marketplace listings for a vehicle/category
pub async fn compare_parts(
    payload: web::Json<PartsRequest>,
    service: web::Data<PartsService>,
) -> Result<HttpResponse> {
    tracing::info!(
        make = %payload.make,
        year = payload.year,
        model = %payload.model,
        category = %payload.category,
        "Parts comparison requested"
    );

    let response = service.compare(&payload).await;
    Ok(HttpResponse::Ok().json(response))
}
