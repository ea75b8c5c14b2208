use sqlx::SqlitePool;
use uuid::Uuid;

use crate::authz::{ensure_same_org, requirements, Actor};
use crate::db::{self, fetch_in_org, list_in_org};
use crate::errors::{AppError, AppResult};
use crate::models::pet::{Pet, PetCreateRequest, PetStatus, PetUpdateRequest};
use crate::utils::{patch_nullable, utc_now};

pub async fn create_pet(pool: &SqlitePool, actor: &Actor, input: PetCreateRequest) -> AppResult<Pet> {
    actor.require(&requirements::PET_MANAGE)?;
    ensure_same_org(actor, input.org_id)?;

    if input.status == PetStatus::InFoster {
        return Err(AppError::invalid_state("a new pet cannot start in foster; assign a foster instead"));
    }

    let pet_id = Uuid::new_v4();
    let now = utc_now();
    let mut tx = db::begin_write(pool).await?;

    sqlx::query(
        "INSERT INTO pets (id, org_id, name, species, breed, sex, status, description_public, description_internal, foster_user_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)",
    )
    .bind(pet_id)
    .bind(actor.org_id())
    .bind(&input.name)
    .bind(&input.species)
    .bind(&input.breed)
    .bind(&input.sex)
    .bind(input.status)
    .bind(&input.description_public)
    .bind(&input.description_internal)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let pet = fetch_in_org::<Pet, _>(&mut *tx, actor.org_id(), pet_id).await?;
    tx.commit().await?;

    tracing::info!(pet_id = %pet.id, org_id = %pet.org_id, "pet created");
    Ok(pet)
}

pub async fn list_pets(pool: &SqlitePool, actor: &Actor) -> AppResult<Vec<Pet>> {
    list_in_org::<Pet, _>(pool, actor.org_id()).await
}

pub async fn get_pet(pool: &SqlitePool, actor: &Actor, pet_id: Uuid) -> AppResult<Pet> {
    fetch_in_org::<Pet, _>(pool, actor.org_id(), pet_id).await
}

pub async fn update_pet(
    pool: &SqlitePool,
    actor: &Actor,
    pet_id: Uuid,
    input: PetUpdateRequest,
) -> AppResult<Pet> {
    actor.require(&requirements::PET_MANAGE)?;

    let mut tx = db::begin_write(pool).await?;
    let mut pet = fetch_in_org::<Pet, _>(&mut *tx, actor.org_id(), pet_id).await?;

    let PetUpdateRequest {
        name,
        species,
        breed,
        sex,
        status,
        description_public,
        description_internal,
    } = input;

    if let Some(name) = name {
        pet.name = name;
    }
    if let Some(species) = species {
        pet.species = species;
    }
    patch_nullable(&mut pet.breed, breed);
    patch_nullable(&mut pet.sex, sex);
    patch_nullable(&mut pet.description_public, description_public);
    patch_nullable(&mut pet.description_internal, description_internal);
    if let Some(status) = status {
        if status == PetStatus::InFoster && pet.foster_user_id.is_none() {
            return Err(AppError::invalid_state("pet has no foster; assign a foster instead"));
        }
        pet.status = status;
    }

    let now = utc_now();
    sqlx::query(
        "UPDATE pets SET name = ?, species = ?, breed = ?, sex = ?, status = ?, description_public = ?, description_internal = ?, updated_at = ? \
         WHERE id = ? AND org_id = ?",
    )
    .bind(&pet.name)
    .bind(&pet.species)
    .bind(&pet.breed)
    .bind(&pet.sex)
    .bind(pet.status)
    .bind(&pet.description_public)
    .bind(&pet.description_internal)
    .bind(now)
    .bind(pet.id)
    .bind(actor.org_id())
    .execute(&mut *tx)
    .await?;

    let pet = fetch_in_org::<Pet, _>(&mut *tx, actor.org_id(), pet_id).await?;
    tx.commit().await?;

    Ok(pet)
}
