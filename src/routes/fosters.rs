use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::authz::Actor;
use crate::errors::AppResult;
use crate::models::portal::FosterSummary;
use crate::services;

#[utoipa::path(
    get,
    path = "/fosters",
    tag = "Fosters",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Active fosters with their pets", body = [FosterSummary]))
)]
pub async fn list_fosters(State(state): State<AppState>, actor: Actor) -> AppResult<Json<Vec<FosterSummary>>> {
    Ok(Json(services::fosters::list_fosters(&state.pool, &actor).await?))
}
