use actix_web::{delete, get, post, put, web, HttpResponse};
use sar_core::{
    NewResource, ResourceId, ResourcePatch, ResourceStatus, ResourceType, ResourceView,
};
use sar_engine::ResourceFilter;
use serde::Deserialize;
use std::str::FromStr;

use crate::routes::common::engine_error;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub team: Option<String>,
}

impl ResourceQuery {
    /// `None` when a type or status names no known value, so nothing can
    /// match. Blank values and `All` leave that field unfiltered.
    fn into_filter(self) -> Option<ResourceFilter> {
        Some(ResourceFilter {
            kind: parse_field::<ResourceType>(self.kind)?,
            status: parse_field::<ResourceStatus>(self.status)?,
            team: self
                .team
                .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all")),
        })
    }
}

fn parse_field<T: FromStr>(value: Option<String>) -> Option<Option<T>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Some(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Some(None),
        Some(value) => value.parse::<T>().ok().map(Some),
    }
}

#[get("/api/resources")]
pub async fn list_resources(
    state: web::Data<AppState>,
    query: web::Query<ResourceQuery>,
) -> HttpResponse {
    let Some(filter) = query.into_inner().into_filter() else {
        return HttpResponse::Ok().json(Vec::<ResourceView>::new());
    };

    match state.engine.list_resources(&filter).await {
        Ok(resources) => HttpResponse::Ok().json(resources),
        Err(err) => engine_error(err),
    }
}

#[post("/api/resources")]
pub async fn create_resource(
    state: web::Data<AppState>,
    payload: web::Json<NewResource>,
) -> HttpResponse {
    match state.engine.create_resource(payload.into_inner()).await {
        Ok(resource) => HttpResponse::Created().json(resource),
        Err(err) => engine_error(err),
    }
}

#[get("/api/resources/{id}")]
pub async fn get_resource(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let resource_id = ResourceId::from(id.into_inner());

    match state.engine.get_resource(&resource_id).await {
        Ok(resource) => HttpResponse::Ok().json(resource),
        Err(err) => engine_error(err),
    }
}

#[put("/api/resources/{id}")]
pub async fn update_resource(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<ResourcePatch>,
) -> HttpResponse {
    let resource_id = ResourceId::from(id.into_inner());

    match state
        .engine
        .update_resource(&resource_id, payload.into_inner())
        .await
    {
        Ok(resource) => HttpResponse::Ok().json(resource),
        Err(err) => engine_error(err),
    }
}

#[delete("/api/resources/{id}")]
pub async fn delete_resource(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let resource_id = ResourceId::from(id.into_inner());

    match state.engine.delete_resource(&resource_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => engine_error(err),
    }
}
