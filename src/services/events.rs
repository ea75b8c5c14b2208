use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::authz::{ensure_same_org, requirements, Actor};
use crate::db::{self, fetch_in_org, list_in_org};
use crate::errors::{AppError, AppResult};
use crate::models::event::{Event, EventCreateRequest, EventUpdateRequest};
use crate::utils::{patch_nullable, utc_now};

fn validate_window(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> AppResult<()> {
    match end {
        Some(end) if end < start => Err(AppError::bad_request("end_datetime must not precede start_datetime")),
        _ => Ok(()),
    }
}

pub async fn create_event(pool: &SqlitePool, actor: &Actor, input: EventCreateRequest) -> AppResult<Event> {
    actor.require(&requirements::EVENT_MANAGE)?;
    ensure_same_org(actor, input.org_id)?;
    validate_window(input.start_datetime, input.end_datetime)?;

    let event_id = Uuid::new_v4();
    let now = utc_now();
    let mut tx = db::begin_write(pool).await?;

    sqlx::query(
        "INSERT INTO events (id, org_id, name, description, start_datetime, end_datetime, location_name, location_address, capacity, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(event_id)
    .bind(actor.org_id())
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.start_datetime)
    .bind(input.end_datetime)
    .bind(&input.location_name)
    .bind(&input.location_address)
    .bind(input.capacity)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let event = fetch_in_org::<Event, _>(&mut *tx, actor.org_id(), event_id).await?;
    tx.commit().await?;

    tracing::info!(event_id = %event.id, "event created");
    Ok(event)
}

pub async fn list_events(pool: &SqlitePool, actor: &Actor) -> AppResult<Vec<Event>> {
    list_in_org::<Event, _>(pool, actor.org_id()).await
}

pub async fn get_event(pool: &SqlitePool, actor: &Actor, event_id: Uuid) -> AppResult<Event> {
    fetch_in_org::<Event, _>(pool, actor.org_id(), event_id).await
}

pub async fn update_event(
    pool: &SqlitePool,
    actor: &Actor,
    event_id: Uuid,
    input: EventUpdateRequest,
) -> AppResult<Event> {
    actor.require(&requirements::EVENT_MANAGE)?;

    let mut tx = db::begin_write(pool).await?;
    let mut event = fetch_in_org::<Event, _>(&mut *tx, actor.org_id(), event_id).await?;

    if let Some(name) = input.name {
        event.name = name;
    }
    patch_nullable(&mut event.description, input.description);
    if let Some(start) = input.start_datetime {
        event.start_datetime = start;
    }
    patch_nullable(&mut event.end_datetime, input.end_datetime);
    patch_nullable(&mut event.location_name, input.location_name);
    patch_nullable(&mut event.location_address, input.location_address);
    patch_nullable(&mut event.capacity, input.capacity);
    validate_window(event.start_datetime, event.end_datetime)?;

    sqlx::query(
        "UPDATE events SET name = ?, description = ?, start_datetime = ?, end_datetime = ?, location_name = ?, \
         location_address = ?, capacity = ?, updated_at = ? WHERE id = ? AND org_id = ?",
    )
    .bind(&event.name)
    .bind(&event.description)
    .bind(event.start_datetime)
    .bind(event.end_datetime)
    .bind(&event.location_name)
    .bind(&event.location_address)
    .bind(event.capacity)
    .bind(utc_now())
    .bind(event.id)
    .bind(actor.org_id())
    .execute(&mut *tx)
    .await?;

    let event = fetch_in_org::<Event, _>(&mut *tx, actor.org_id(), event_id).await?;
    tx.commit().await?;

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn end_before_start_is_rejected() {
        let start = Utc::now();
        assert!(validate_window(start, None).is_ok());
        assert!(validate_window(start, Some(start + Duration::hours(2))).is_ok());
        assert!(matches!(
            validate_window(start, Some(start - Duration::hours(1))),
            Err(AppError::BadRequest(_))
        ));
    }
}
