use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::Actor;
use crate::errors::AppResult;
use crate::models::event::{Event, EventCreateRequest, EventUpdateRequest};
use crate::services;

#[utoipa::path(
    get,
    path = "/events",
    tag = "Events",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Events, earliest first", body = [Event]))
)]
pub async fn list_events(State(state): State<AppState>, actor: Actor) -> AppResult<Json<Vec<Event>>> {
    Ok(Json(services::events::list_events(&state.pool, &actor).await?))
}

#[utoipa::path(
    post,
    path = "/events",
    tag = "Events",
    security(("bearerAuth" = [])),
    request_body = EventCreateRequest,
    responses((status = 201, description = "Event created", body = Event))
)]
pub async fn create_event(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<EventCreateRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let event = services::events::create_event(&state.pool, &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event detail", body = Event),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(State(state): State<AppState>, actor: Actor, Path(id): Path<Uuid>) -> AppResult<Json<Event>> {
    Ok(Json(services::events::get_event(&state.pool, &actor, id).await?))
}

#[utoipa::path(
    patch,
    path = "/events/{id}",
    tag = "Events",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = EventUpdateRequest,
    responses((status = 200, description = "Event updated", body = Event))
)]
pub async fn update_event(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventUpdateRequest>,
) -> AppResult<Json<Event>> {
    Ok(Json(services::events::update_event(&state.pool, &actor, id, payload).await?))
}
