use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::authz::Actor;
use crate::errors::AppResult;
use crate::models::organization::{OnboardRequest, OnboardResponse, Organization, OrganizationUpdateRequest};
use crate::services;

#[utoipa::path(
    post,
    path = "/orgs",
    tag = "Organizations",
    request_body = OnboardRequest,
    responses(
        (status = 201, description = "Organization and first admin created", body = OnboardResponse),
        (status = 409, description = "Admin email already in use")
    )
)]
pub async fn onboard(
    State(state): State<AppState>,
    Json(payload): Json<OnboardRequest>,
) -> AppResult<(StatusCode, Json<OnboardResponse>)> {
    let response = services::organizations::onboard_organization(&state.pool, &state.config.jwt, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/orgs/me",
    tag = "Organizations",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "The caller's organization", body = Organization))
)]
pub async fn get_my_org(State(state): State<AppState>, actor: Actor) -> AppResult<Json<Organization>> {
    Ok(Json(services::organizations::get_my_organization(&state.pool, &actor).await?))
}

#[utoipa::path(
    patch,
    path = "/orgs/me",
    tag = "Organizations",
    security(("bearerAuth" = [])),
    request_body = OrganizationUpdateRequest,
    responses(
        (status = 200, description = "Organization updated", body = Organization),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn update_my_org(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<OrganizationUpdateRequest>,
) -> AppResult<Json<Organization>> {
    Ok(Json(services::organizations::update_my_organization(&state.pool, &actor, payload).await?))
}
