use actix_web::{get, HttpResponse};
use sar_core::{now, Timestamp};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: Timestamp,
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: now(),
    })
}
