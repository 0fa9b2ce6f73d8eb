use actix_web::{delete, get, post, put, web, HttpResponse};
use sar_core::{CalloutId, CalloutPatch, NewCallout, ResourceRef, TeamRef};

use crate::routes::common::engine_error;
use crate::state::AppState;

#[get("/api/callouts")]
pub async fn list_callouts(state: web::Data<AppState>) -> HttpResponse {
    match state.engine.list_callouts().await {
        Ok(callouts) => HttpResponse::Ok().json(callouts),
        Err(err) => engine_error(err),
    }
}

#[post("/api/callouts")]
pub async fn create_callout(
    state: web::Data<AppState>,
    payload: web::Json<NewCallout>,
) -> HttpResponse {
    match state.engine.create_callout(payload.into_inner()).await {
        Ok(callout) => HttpResponse::Created().json(callout),
        Err(err) => engine_error(err),
    }
}

#[get("/api/callouts/{id}")]
pub async fn get_callout(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let callout_id = CalloutId::from(id.into_inner());

    match state.engine.get_callout(&callout_id).await {
        Ok(callout) => HttpResponse::Ok().json(callout),
        Err(err) => engine_error(err),
    }
}

#[put("/api/callouts/{id}")]
pub async fn update_callout(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<CalloutPatch>,
) -> HttpResponse {
    let callout_id = CalloutId::from(id.into_inner());

    match state
        .engine
        .update_callout(&callout_id, payload.into_inner())
        .await
    {
        Ok(callout) => HttpResponse::Ok().json(callout),
        Err(err) => engine_error(err),
    }
}

/// Removes the callout together with its teams and releases every resource
/// that was committed to it.
#[delete("/api/callouts/{id}")]
pub async fn delete_callout(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let callout_id = CalloutId::from(id.into_inner());

    match state.engine.delete_callout(&callout_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => engine_error(err),
    }
}

#[post("/api/callouts/{id}/assign")]
pub async fn assign_resource(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<ResourceRef>,
) -> HttpResponse {
    let callout_id = CalloutId::from(id.into_inner());

    match state
        .engine
        .assign_resource_to_callout(&callout_id, &payload.resource_id)
        .await
    {
        Ok(assignment) => HttpResponse::Ok().json(assignment),
        Err(err) => engine_error(err),
    }
}

#[post("/api/callouts/{id}/unassign")]
pub async fn unassign_resource(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<ResourceRef>,
) -> HttpResponse {
    let callout_id = CalloutId::from(id.into_inner());

    match state
        .engine
        .unassign_resource_from_callout(&callout_id, &payload.resource_id)
        .await
    {
        Ok(assignment) => HttpResponse::Ok().json(assignment),
        Err(err) => engine_error(err),
    }
}

#[post("/api/callouts/{id}/assign-team")]
pub async fn assign_team(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<TeamRef>,
) -> HttpResponse {
    let callout_id = CalloutId::from(id.into_inner());

    match state
        .engine
        .link_team_to_callout(&callout_id, &payload.team_id)
        .await
    {
        Ok(link) => HttpResponse::Ok().json(link),
        Err(err) => engine_error(err),
    }
}

#[post("/api/callouts/{id}/unassign-team")]
pub async fn unassign_team(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<TeamRef>,
) -> HttpResponse {
    let callout_id = CalloutId::from(id.into_inner());

    match state
        .engine
        .unlink_team_from_callout(&callout_id, &payload.team_id)
        .await
    {
        Ok(link) => HttpResponse::Ok().json(link),
        Err(err) => engine_error(err),
    }
}
