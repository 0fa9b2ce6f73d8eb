use actix_web::{delete, get, post, put, web, HttpResponse};
use sar_core::{NewTeam, RenameTeam, ResourceRef, TeamId};

use crate::routes::common::engine_error;
use crate::state::AppState;

#[get("/api/teams")]
pub async fn list_teams(state: web::Data<AppState>) -> HttpResponse {
    match state.engine.list_teams().await {
        Ok(teams) => HttpResponse::Ok().json(teams),
        Err(err) => engine_error(err),
    }
}

#[post("/api/teams")]
pub async fn create_team(state: web::Data<AppState>, payload: web::Json<NewTeam>) -> HttpResponse {
    match state.engine.create_team(payload.into_inner()).await {
        Ok(team) => HttpResponse::Created().json(team),
        Err(err) => engine_error(err),
    }
}

#[get("/api/teams/{id}")]
pub async fn get_team(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let team_id = TeamId::from(id.into_inner());

    match state.engine.get_team(&team_id).await {
        Ok(team) => HttpResponse::Ok().json(team),
        Err(err) => engine_error(err),
    }
}

#[put("/api/teams/{id}")]
pub async fn rename_team(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<RenameTeam>,
) -> HttpResponse {
    let team_id = TeamId::from(id.into_inner());

    match state
        .engine
        .rename_team(&team_id, payload.into_inner())
        .await
    {
        Ok(team) => HttpResponse::Ok().json(team),
        Err(err) => engine_error(err),
    }
}

#[delete("/api/teams/{id}")]
pub async fn delete_team(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let team_id = TeamId::from(id.into_inner());

    match state.engine.delete_team(&team_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => engine_error(err),
    }
}

#[post("/api/teams/{id}/assign")]
pub async fn assign_resource(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<ResourceRef>,
) -> HttpResponse {
    let team_id = TeamId::from(id.into_inner());

    match state
        .engine
        .assign_resource_to_team(&team_id, &payload.resource_id)
        .await
    {
        Ok(assignment) => HttpResponse::Ok().json(assignment),
        Err(err) => engine_error(err),
    }
}

#[post("/api/teams/{id}/unassign")]
pub async fn unassign_resource(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<ResourceRef>,
) -> HttpResponse {
    let team_id = TeamId::from(id.into_inner());

    match state
        .engine
        .unassign_resource_from_team(&team_id, &payload.resource_id)
        .await
    {
        Ok(assignment) => HttpResponse::Ok().json(assignment),
        Err(err) => engine_error(err),
    }
}
