use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::Actor;
use crate::errors::AppResult;
use crate::models::task::{Task, TaskCreateRequest, TaskUpdateRequest};
use crate::services;

#[utoipa::path(
    get,
    path = "/tasks",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Tasks of the organization", body = [Task]))
)]
pub async fn list_tasks(State(state): State<AppState>, actor: Actor) -> AppResult<Json<Vec<Task>>> {
    Ok(Json(services::tasks::list_tasks(&state.pool, &actor).await?))
}

#[utoipa::path(
    post,
    path = "/tasks",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    request_body = TaskCreateRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Assignee or related entity not found, or assignee inactive")
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<TaskCreateRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let task = services::tasks::create_task(&state.pool, &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task detail", body = Task),
        (status = 404, description = "Task not found")
    )
)]
pub async fn get_task(State(state): State<AppState>, actor: Actor, Path(id): Path<Uuid>) -> AppResult<Json<Task>> {
    Ok(Json(services::tasks::get_task(&state.pool, &actor, id).await?))
}

#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = TaskUpdateRequest,
    responses((status = 200, description = "Task updated", body = Task))
)]
pub async fn update_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskUpdateRequest>,
) -> AppResult<Json<Task>> {
    Ok(Json(services::tasks::update_task(&state.pool, &actor, id, payload).await?))
}
