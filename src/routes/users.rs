use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::Actor;
use crate::errors::AppResult;
use crate::models::user::{AssignRoleRequest, User, UserCreateRequest, UserUpdateRequest, UserWithRoles};
use crate::services;

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Users of the organization", body = [User]))
)]
pub async fn list_users(State(state): State<AppState>, actor: Actor) -> AppResult<Json<Vec<User>>> {
    Ok(Json(services::users::list_users(&state.pool, &actor).await?))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearerAuth" = [])),
    request_body = UserCreateRequest,
    responses(
        (status = 201, description = "User created", body = UserWithRoles),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<UserCreateRequest>,
) -> AppResult<(StatusCode, Json<UserWithRoles>)> {
    let user = services::users::create_user(&state.pool, &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User with roles", body = UserWithRoles),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserWithRoles>> {
    Ok(Json(services::users::get_user(&state.pool, &actor, id).await?))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UserUpdateRequest,
    responses((status = 200, description = "User updated", body = User))
)]
pub async fn update_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserUpdateRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(services::users::update_user(&state.pool, &actor, id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/users/{id}/roles",
    tag = "Users",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    request_body = AssignRoleRequest,
    responses((status = 200, description = "Role granted", body = UserWithRoles))
)]
pub async fn assign_role(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRoleRequest>,
) -> AppResult<Json<UserWithRoles>> {
    Ok(Json(services::users::assign_role(&state.pool, &actor, id, &payload.role_name).await?))
}

#[utoipa::path(
    delete,
    path = "/users/{id}/roles/{role}",
    tag = "Users",
    security(("bearerAuth" = [])),
    params(
        ("id" = Uuid, Path, description = "User id"),
        ("role" = String, Path, description = "Role name")
    ),
    responses(
        (status = 200, description = "Role revoked", body = UserWithRoles),
        (status = 404, description = "User or role assignment not found")
    )
)]
pub async fn revoke_role(
    State(state): State<AppState>,
    actor: Actor,
    Path((id, role)): Path<(Uuid, String)>,
) -> AppResult<Json<UserWithRoles>> {
    Ok(Json(services::users::revoke_role(&state.pool, &actor, id, &role).await?))
}
