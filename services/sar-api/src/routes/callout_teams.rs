use actix_web::{delete, post, web, HttpResponse};
use sar_core::{CalloutId, MergeTeams, NewTeam, ResourceRef, TeamId};

use crate::routes::common::engine_error;
use crate::state::AppState;

fn ids(path: web::Path<(String, String)>) -> (CalloutId, TeamId) {
    let (callout_id, team_id) = path.into_inner();
    (CalloutId::from(callout_id), TeamId::from(team_id))
}

#[post("/api/callouts/{id}/teams")]
pub async fn create_team(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<NewTeam>,
) -> HttpResponse {
    let callout_id = CalloutId::from(id.into_inner());

    match state
        .engine
        .create_team_in_callout(&callout_id, payload.into_inner())
        .await
    {
        Ok(team) => HttpResponse::Created().json(team),
        Err(err) => engine_error(err),
    }
}

#[delete("/api/callouts/{id}/teams/{team_id}")]
pub async fn delete_team(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (callout_id, team_id) = ids(path);

    match state
        .engine
        .delete_team_in_callout(&callout_id, &team_id)
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => engine_error(err),
    }
}

#[post("/api/callouts/{id}/teams/{team_id}/assign")]
pub async fn assign_resource(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    payload: web::Json<ResourceRef>,
) -> HttpResponse {
    let (callout_id, team_id) = ids(path);

    match state
        .engine
        .assign_resource_to_team_in_callout(&callout_id, &team_id, &payload.resource_id)
        .await
    {
        Ok(assignment) => HttpResponse::Ok().json(assignment),
        Err(err) => engine_error(err),
    }
}

#[post("/api/callouts/{id}/teams/{team_id}/unassign")]
pub async fn unassign_resource(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    payload: web::Json<ResourceRef>,
) -> HttpResponse {
    let (callout_id, team_id) = ids(path);

    match state
        .engine
        .unassign_resource_from_team_in_callout(&callout_id, &team_id, &payload.resource_id)
        .await
    {
        Ok(assignment) => HttpResponse::Ok().json(assignment),
        Err(err) => engine_error(err),
    }
}

#[post("/api/callouts/{id}/merge-teams")]
pub async fn merge_teams(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<MergeTeams>,
) -> HttpResponse {
    let callout_id = CalloutId::from(id.into_inner());

    match state
        .engine
        .merge_teams(&callout_id, payload.into_inner())
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(err) => engine_error(err),
    }
}
