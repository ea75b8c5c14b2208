use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::Actor;
use crate::errors::AppResult;
use crate::models::medical::{MedicalRecord, MedicalRecordCreateRequest};
use crate::models::pet::{AssignFosterRequest, Pet, PetCreateRequest, PetUpdateRequest};
use crate::services;

#[utoipa::path(
    get,
    path = "/pets",
    tag = "Pets",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Pets of the organization", body = [Pet]))
)]
pub async fn list_pets(State(state): State<AppState>, actor: Actor) -> AppResult<Json<Vec<Pet>>> {
    Ok(Json(services::pets::list_pets(&state.pool, &actor).await?))
}

#[utoipa::path(
    post,
    path = "/pets",
    tag = "Pets",
    security(("bearerAuth" = [])),
    request_body = PetCreateRequest,
    responses(
        (status = 201, description = "Pet created", body = Pet),
        (status = 400, description = "Organization mismatch"),
        (status = 403, description = "Pet coordinator role required")
    )
)]
pub async fn create_pet(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<PetCreateRequest>,
) -> AppResult<(StatusCode, Json<Pet>)> {
    let pet = services::pets::create_pet(&state.pool, &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

#[utoipa::path(
    get,
    path = "/pets/{id}",
    tag = "Pets",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Pet detail", body = Pet),
        (status = 404, description = "Pet not found")
    )
)]
pub async fn get_pet(State(state): State<AppState>, actor: Actor, Path(id): Path<Uuid>) -> AppResult<Json<Pet>> {
    Ok(Json(services::pets::get_pet(&state.pool, &actor, id).await?))
}

#[utoipa::path(
    patch,
    path = "/pets/{id}",
    tag = "Pets",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body = PetUpdateRequest,
    responses(
        (status = 200, description = "Pet updated", body = Pet),
        (status = 404, description = "Pet not found")
    )
)]
pub async fn update_pet(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<PetUpdateRequest>,
) -> AppResult<Json<Pet>> {
    Ok(Json(services::pets::update_pet(&state.pool, &actor, id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/pets/{id}/foster",
    tag = "Fosters",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body = AssignFosterRequest,
    responses(
        (status = 200, description = "Foster assigned", body = Pet),
        (status = 400, description = "Foster user is inactive"),
        (status = 404, description = "Pet or user not found"),
        (status = 409, description = "Pet changed concurrently or write lock timed out; retry")
    )
)]
pub async fn assign_foster(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignFosterRequest>,
) -> AppResult<Json<Pet>> {
    Ok(Json(services::fosters::assign_foster(&state.pool, &actor, id, payload.foster_user_id).await?))
}

#[utoipa::path(
    delete,
    path = "/pets/{id}/foster",
    tag = "Fosters",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Foster removed", body = Pet),
        (status = 404, description = "Pet not found"),
        (status = 409, description = "Pet changed concurrently or write lock timed out; retry")
    )
)]
pub async fn unassign_foster(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Pet>> {
    Ok(Json(services::fosters::unassign_foster(&state.pool, &actor, id).await?))
}

#[utoipa::path(
    get,
    path = "/pets/{id}/medical",
    tag = "Medical",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    responses((status = 200, description = "Medical history", body = [MedicalRecord]))
)]
pub async fn list_medical_records(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<MedicalRecord>>> {
    Ok(Json(services::medical::list_medical_records(&state.pool, &actor, id).await?))
}

#[utoipa::path(
    post,
    path = "/pets/{id}/medical",
    tag = "Medical",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body = MedicalRecordCreateRequest,
    responses((status = 201, description = "Medical record added", body = MedicalRecord))
)]
pub async fn create_medical_record(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<MedicalRecordCreateRequest>,
) -> AppResult<(StatusCode, Json<MedicalRecord>)> {
    let record = services::medical::create_medical_record(&state.pool, &actor, id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
