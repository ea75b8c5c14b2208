use sqlx::SqlitePool;
use uuid::Uuid;

use crate::authz::{requirements, Actor};
use crate::db::{self, fetch_in_org, list_in_org_by};
use crate::errors::AppResult;
use crate::models::medical::{MedicalRecord, MedicalRecordCreateRequest};
use crate::models::pet::Pet;
use crate::utils::utc_now;

pub async fn create_medical_record(
    pool: &SqlitePool,
    actor: &Actor,
    pet_id: Uuid,
    input: MedicalRecordCreateRequest,
) -> AppResult<MedicalRecord> {
    actor.require(&requirements::MEDICAL_MANAGE)?;

    let org_id = actor.org_id();
    let mut tx = db::begin_write(pool).await?;
    let pet = fetch_in_org::<Pet, _>(&mut *tx, org_id, pet_id).await?;

    let record_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO medical_records (id, org_id, pet_id, record_type, description, performed_at, vet_name, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(record_id)
    .bind(org_id)
    .bind(pet.id)
    .bind(&input.record_type)
    .bind(&input.description)
    .bind(input.performed_at)
    .bind(&input.vet_name)
    .bind(utc_now())
    .execute(&mut *tx)
    .await?;

    let record = fetch_in_org::<MedicalRecord, _>(&mut *tx, org_id, record_id).await?;
    tx.commit().await?;

    tracing::info!(record_id = %record.id, pet_id = %pet.id, "medical record added");
    Ok(record)
}

pub async fn list_medical_records(pool: &SqlitePool, actor: &Actor, pet_id: Uuid) -> AppResult<Vec<MedicalRecord>> {
    actor.require(&requirements::MEDICAL_MANAGE)?;

    let pet = fetch_in_org::<Pet, _>(pool, actor.org_id(), pet_id).await?;
    list_in_org_by::<MedicalRecord, _>(pool, actor.org_id(), "pet_id", pet.id).await
}
