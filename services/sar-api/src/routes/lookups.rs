use actix_web::{get, web, HttpResponse};

use crate::routes::common::engine_error;
use crate::state::AppState;

#[get("/api/available-vehicles")]
pub async fn available_vehicles(state: web::Data<AppState>) -> HttpResponse {
    match state.engine.available_vehicles().await {
        Ok(vehicles) => HttpResponse::Ok().json(vehicles),
        Err(err) => engine_error(err),
    }
}

/// Teams that are not deployed and have at least one person on them.
#[get("/api/deployable-teams")]
pub async fn deployable_teams(state: web::Data<AppState>) -> HttpResponse {
    match state.engine.deployable_teams().await {
        Ok(teams) => HttpResponse::Ok().json(teams),
        Err(err) => engine_error(err),
    }
}

#[get("/api/deployment")]
pub async fn deployment(state: web::Data<AppState>) -> HttpResponse {
    match state.engine.deployment().await {
        Ok(deployment) => HttpResponse::Ok().json(deployment),
        Err(err) => engine_error(err),
    }
}
