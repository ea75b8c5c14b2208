use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::Actor;
use crate::errors::AppResult;
use crate::models::application::{Application, ApplicationCreateRequest, ApplicationUpdateRequest};
use crate::services;

#[utoipa::path(
    get,
    path = "/applications",
    tag = "Applications",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Applications of the organization", body = [Application]),
        (status = 403, description = "Application screener role required")
    )
)]
pub async fn list_applications(State(state): State<AppState>, actor: Actor) -> AppResult<Json<Vec<Application>>> {
    Ok(Json(services::applications::list_applications(&state.pool, &actor).await?))
}

#[utoipa::path(
    post,
    path = "/applications",
    tag = "Applications",
    security(("bearerAuth" = [])),
    request_body = ApplicationCreateRequest,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 400, description = "Organization mismatch or pet not found")
    )
)]
pub async fn create_application(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<ApplicationCreateRequest>,
) -> AppResult<(StatusCode, Json<Application>)> {
    let application = services::applications::create_application(&state.pool, &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/applications/{id}",
    tag = "Applications",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application detail", body = Application),
        (status = 404, description = "Application not found")
    )
)]
pub async fn get_application(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Application>> {
    Ok(Json(services::applications::get_application(&state.pool, &actor, id).await?))
}

#[utoipa::path(
    patch,
    path = "/applications/{id}",
    tag = "Applications",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = ApplicationUpdateRequest,
    responses((status = 200, description = "Application updated", body = Application))
)]
pub async fn update_application(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplicationUpdateRequest>,
) -> AppResult<Json<Application>> {
    Ok(Json(services::applications::update_application(&state.pool, &actor, id, payload).await?))
}
