use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::authz::{ensure_same_org, requirements, Actor};
use crate::db::{self, ensure_in_org, fetch_in_org, list_in_org};
use crate::errors::AppResult;
use crate::models::application::{
    Application, ApplicationCreateRequest, ApplicationStatus, ApplicationUpdateRequest,
};
use crate::utils::{patch_nullable, utc_now};

/// Any member may apply; the applicant is always the actor.
pub async fn create_application(
    pool: &SqlitePool,
    actor: &Actor,
    input: ApplicationCreateRequest,
) -> AppResult<Application> {
    ensure_same_org(actor, input.org_id)?;

    let mut tx = db::begin_write(pool).await?;
    ensure_in_org(&mut *tx, "pets", actor.org_id(), input.pet_id, "pet").await?;

    let answers = match input.answers_json {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    let application_id = Uuid::new_v4();
    let now = utc_now();
    sqlx::query(
        "INSERT INTO applications (id, org_id, applicant_user_id, pet_id, type, status, answers_json, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(application_id)
    .bind(actor.org_id())
    .bind(actor.user_id())
    .bind(input.pet_id)
    .bind(input.kind)
    .bind(ApplicationStatus::Submitted)
    .bind(Json(answers))
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let application = fetch_in_org::<Application, _>(&mut *tx, actor.org_id(), application_id).await?;
    tx.commit().await?;

    tracing::info!(application_id = %application.id, applicant = %actor.user_id(), "application submitted");
    Ok(application)
}

pub async fn list_applications(pool: &SqlitePool, actor: &Actor) -> AppResult<Vec<Application>> {
    actor.require(&requirements::APPLICATION_REVIEW)?;
    list_in_org::<Application, _>(pool, actor.org_id()).await
}

pub async fn get_application(pool: &SqlitePool, actor: &Actor, application_id: Uuid) -> AppResult<Application> {
    actor.require(&requirements::APPLICATION_REVIEW)?;
    fetch_in_org::<Application, _>(pool, actor.org_id(), application_id).await
}

pub async fn update_application(
    pool: &SqlitePool,
    actor: &Actor,
    application_id: Uuid,
    input: ApplicationUpdateRequest,
) -> AppResult<Application> {
    actor.require(&requirements::APPLICATION_REVIEW)?;

    let mut tx = db::begin_write(pool).await?;
    let mut application = fetch_in_org::<Application, _>(&mut *tx, actor.org_id(), application_id).await?;

    if let Some(Some(pet_id)) = input.pet_id {
        ensure_in_org(&mut *tx, "pets", actor.org_id(), Some(pet_id), "pet").await?;
    }

    if let Some(status) = input.status {
        application.status = status;
    }
    patch_nullable(&mut application.pet_id, input.pet_id);
    if let Some(answers) = input.answers_json {
        application.answers_json = Json(answers);
    }

    sqlx::query(
        "UPDATE applications SET status = ?, pet_id = ?, answers_json = ?, updated_at = ? WHERE id = ? AND org_id = ?",
    )
    .bind(application.status)
    .bind(application.pet_id)
    .bind(&application.answers_json)
    .bind(utc_now())
    .bind(application.id)
    .bind(actor.org_id())
    .execute(&mut *tx)
    .await?;

    let application = fetch_in_org::<Application, _>(&mut *tx, actor.org_id(), application_id).await?;
    tx.commit().await?;

    Ok(application)
}
