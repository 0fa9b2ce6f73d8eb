use actix_web::{get, web, HttpResponse};
use sar_core::now_epoch_millis;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    service: String,
    environment: String,
    region: Option<String>,
    timestamp_ms: u64,
}

#[get("/api/status")]
pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    let response = StatusResponse {
        service: state.config.service_name.clone(),
        environment: state.config.environment.to_string(),
        region: state.config.region.clone(),
        timestamp_ms: now_epoch_millis(),
    };

    HttpResponse::Ok().json(response)
}
