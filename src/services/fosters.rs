//! Foster assignment state machine.
//!
//! `assign_foster` and `unassign_foster` are the only writers of
//! `pets.foster_user_id`. Each runs as a read-modify-write inside one
//! `db::begin_write` transaction, so racing transitions apply one after the
//! other. The write is still conditional on the state that was read.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::authz::{requirements, roles, Actor};
use crate::db::{self, fetch_in_org, list_in_org_by};
use crate::errors::{AppError, AppResult};
use crate::models::pet::{Pet, PetStatus};
use crate::models::portal::FosterSummary;
use crate::models::user::{DbUser, User};
use crate::utils::utc_now;

pub async fn assign_foster(
    pool: &SqlitePool,
    actor: &Actor,
    pet_id: Uuid,
    foster_user_id: Uuid,
) -> AppResult<Pet> {
    actor.require(&requirements::FOSTER_MANAGE)?;

    let mut tx = db::begin_write(pool).await?;
    let pet = fetch_in_org::<Pet, _>(&mut *tx, actor.org_id(), pet_id).await?;
    let foster = fetch_in_org::<DbUser, _>(&mut *tx, actor.org_id(), foster_user_id).await?;

    if !foster.is_active {
        return Err(AppError::invalid_state("cannot assign pet to inactive user"));
    }

    let next_status = pet.status.after_foster_assigned();
    write_foster_link(&mut tx, actor.org_id(), &pet, Some(foster.id), next_status).await?;

    let updated = fetch_in_org::<Pet, _>(&mut *tx, actor.org_id(), pet_id).await?;
    tx.commit().await?;

    tracing::info!(
        pet_id = %updated.id,
        foster_user_id = %foster.id,
        from = pet.status.as_str(),
        to = updated.status.as_str(),
        "foster assigned"
    );
    Ok(updated)
}

pub async fn unassign_foster(pool: &SqlitePool, actor: &Actor, pet_id: Uuid) -> AppResult<Pet> {
    actor.require(&requirements::FOSTER_MANAGE)?;

    let mut tx = db::begin_write(pool).await?;
    let pet = fetch_in_org::<Pet, _>(&mut *tx, actor.org_id(), pet_id).await?;

    let next_status = pet.status.after_foster_unassigned();
    write_foster_link(&mut tx, actor.org_id(), &pet, None, next_status).await?;

    let updated = fetch_in_org::<Pet, _>(&mut *tx, actor.org_id(), pet_id).await?;
    tx.commit().await?;

    tracing::info!(
        pet_id = %updated.id,
        from = pet.status.as_str(),
        to = updated.status.as_str(),
        "foster unassigned"
    );
    Ok(updated)
}

/// Compare-and-set on `(status, foster_user_id)` as read in this transaction.
async fn write_foster_link(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    org_id: Uuid,
    current: &Pet,
    foster_user_id: Option<Uuid>,
    next_status: PetStatus,
) -> AppResult<()> {
    let result = sqlx::query(
        "UPDATE pets SET foster_user_id = ?, status = ?, updated_at = ? \
         WHERE id = ? AND org_id = ? AND status = ? AND foster_user_id IS ?",
    )
    .bind(foster_user_id)
    .bind(next_status)
    .bind(utc_now())
    .bind(current.id)
    .bind(org_id)
    .bind(current.status)
    .bind(current.foster_user_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() != 1 {
        return Err(AppError::conflict("pet was modified concurrently; retry"));
    }

    Ok(())
}

/// Active users holding the foster role, each with their current pets.
pub async fn list_fosters(pool: &SqlitePool, actor: &Actor) -> AppResult<Vec<FosterSummary>> {
    actor.require(&requirements::FOSTER_MANAGE)?;

    let fosters = sqlx::query_as::<_, DbUser>(
        "SELECT id, org_id, email, full_name, phone, password_hash, is_active, created_at, updated_at FROM users \
         WHERE org_id = ? AND is_active = 1 \
         AND id IN (SELECT user_id FROM roles WHERE org_id = ? AND role_name = ?) \
         ORDER BY full_name ASC",
    )
    .bind(actor.org_id())
    .bind(actor.org_id())
    .bind(roles::FOSTER)
    .fetch_all(pool)
    .await?;

    let mut summaries = Vec::with_capacity(fosters.len());
    for foster in fosters {
        let pets = list_in_org_by::<Pet, _>(
            pool,
            actor.org_id(),
            "foster_user_id",
            foster.id,
        )
        .await?;
        summaries.push(FosterSummary {
            user: User::from(foster),
            pets,
        });
    }

    Ok(summaries)
}
