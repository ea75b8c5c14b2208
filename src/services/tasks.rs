use sqlx::sqlite::Sqlite;
use sqlx::{Executor, SqlitePool};
use uuid::Uuid;

use crate::authz::{ensure_same_org, requirements, Actor};
use crate::db::{self, ensure_in_org, fetch_in_org, list_in_org};
use crate::errors::{AppError, AppResult};
use crate::models::task::{Task, TaskCreateRequest, TaskUpdateRequest};
use crate::models::user::DbUser;
use crate::utils::{patch_nullable, utc_now};

/// An assignee must be an active member of the organization.
async fn ensure_assignable<'e, E>(executor: E, org_id: Uuid, user_id: Option<Uuid>) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let Some(user_id) = user_id else {
        return Ok(());
    };

    let user = fetch_in_org::<DbUser, _>(executor, org_id, user_id)
        .await
        .map_err(|err| match err {
            AppError::NotFound(_) => AppError::bad_request("assignee not found"),
            other => other,
        })?;

    if !user.is_active {
        return Err(AppError::invalid_state("cannot assign task to inactive user"));
    }

    Ok(())
}

pub async fn create_task(pool: &SqlitePool, actor: &Actor, input: TaskCreateRequest) -> AppResult<Task> {
    actor.require(&requirements::TASK_MANAGE)?;
    ensure_same_org(actor, input.org_id)?;

    let org_id = actor.org_id();
    let mut tx = db::begin_write(pool).await?;
    ensure_assignable(&mut *tx, org_id, input.assigned_to_user_id).await?;
    ensure_in_org(&mut *tx, "pets", org_id, input.related_pet_id, "pet").await?;
    ensure_in_org(&mut *tx, "events", org_id, input.related_event_id, "event").await?;

    let task_id = Uuid::new_v4();
    let now = utc_now();
    sqlx::query(
        "INSERT INTO tasks (id, org_id, title, description, status, priority, due_date, assigned_to_user_id, related_pet_id, related_event_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(task_id)
    .bind(org_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.status)
    .bind(input.priority)
    .bind(input.due_date)
    .bind(input.assigned_to_user_id)
    .bind(input.related_pet_id)
    .bind(input.related_event_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let task = fetch_in_org::<Task, _>(&mut *tx, org_id, task_id).await?;
    tx.commit().await?;

    tracing::info!(task_id = %task.id, "task created");
    Ok(task)
}

pub async fn list_tasks(pool: &SqlitePool, actor: &Actor) -> AppResult<Vec<Task>> {
    list_in_org::<Task, _>(pool, actor.org_id()).await
}

pub async fn get_task(pool: &SqlitePool, actor: &Actor, task_id: Uuid) -> AppResult<Task> {
    fetch_in_org::<Task, _>(pool, actor.org_id(), task_id).await
}

pub async fn update_task(
    pool: &SqlitePool,
    actor: &Actor,
    task_id: Uuid,
    input: TaskUpdateRequest,
) -> AppResult<Task> {
    actor.require(&requirements::TASK_MANAGE)?;

    let org_id = actor.org_id();
    let mut tx = db::begin_write(pool).await?;
    let mut task = fetch_in_org::<Task, _>(&mut *tx, org_id, task_id).await?;

    if let Some(assignee) = input.assigned_to_user_id {
        ensure_assignable(&mut *tx, org_id, assignee).await?;
    }
    if let Some(pet_id) = input.related_pet_id {
        ensure_in_org(&mut *tx, "pets", org_id, pet_id, "pet").await?;
    }
    if let Some(event_id) = input.related_event_id {
        ensure_in_org(&mut *tx, "events", org_id, event_id, "event").await?;
    }

    if let Some(title) = input.title {
        task.title = title;
    }
    patch_nullable(&mut task.description, input.description);
    if let Some(status) = input.status {
        task.status = status;
    }
    if let Some(priority) = input.priority {
        task.priority = priority;
    }
    patch_nullable(&mut task.due_date, input.due_date);
    patch_nullable(&mut task.assigned_to_user_id, input.assigned_to_user_id);
    patch_nullable(&mut task.related_pet_id, input.related_pet_id);
    patch_nullable(&mut task.related_event_id, input.related_event_id);

    sqlx::query(
        "UPDATE tasks SET title = ?, description = ?, status = ?, priority = ?, due_date = ?, assigned_to_user_id = ?, \
         related_pet_id = ?, related_event_id = ?, updated_at = ? WHERE id = ? AND org_id = ?",
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.due_date)
    .bind(task.assigned_to_user_id)
    .bind(task.related_pet_id)
    .bind(task.related_event_id)
    .bind(utc_now())
    .bind(task.id)
    .bind(org_id)
    .execute(&mut *tx)
    .await?;

    let task = fetch_in_org::<Task, _>(&mut *tx, org_id, task_id).await?;
    tx.commit().await?;

    Ok(task)
}
