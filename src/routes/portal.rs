use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::authz::Actor;
use crate::errors::AppResult;
use crate::models::portal::PortalSummary;
use crate::services;

#[utoipa::path(
    get,
    path = "/portal/me",
    tag = "Portal",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "The caller's applications, foster pets and tasks", body = PortalSummary))
)]
pub async fn my_portal(State(state): State<AppState>, actor: Actor) -> AppResult<Json<PortalSummary>> {
    Ok(Json(services::portal::my_portal(&state.pool, &actor).await?))
}
