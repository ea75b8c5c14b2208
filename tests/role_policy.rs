mod common;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use rescueworks::errors::AppError;
use rescueworks::models::event::EventCreateRequest;
use rescueworks::models::medical::MedicalRecordCreateRequest;
use rescueworks::models::pet::{PetCreateRequest, PetStatus};
use rescueworks::services::{applications, events, fosters, medical, pets, users};

use common::{seed_org, seed_pet, seed_user, setup};

fn is_forbidden<T: std::fmt::Debug>(result: Result<T, AppError>) -> bool {
    matches!(result, Err(AppError::Forbidden(_)))
}

#[tokio::test]
async fn unrelated_roles_are_forbidden_from_privileged_operations() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let pet_id = seed_pet(&env.pool, org, "Biscuit", PetStatus::Intake).await?;
    let foster = seed_user(&env.pool, org, "foster@happytails.test", &["foster"], true).await?;
    let screener = env
        .actor(seed_user(&env.pool, org, "screener@happytails.test", &["application_screener"], true).await?)
        .await?;
    let adopter = env.actor(seed_user(&env.pool, org, "adopter@happytails.test", &["adopter"], true).await?).await?;

    let pet_request = PetCreateRequest {
        org_id: org,
        name: "Nope".to_string(),
        species: "Cat".to_string(),
        breed: None,
        sex: None,
        status: PetStatus::Intake,
        description_public: None,
        description_internal: None,
    };
    assert!(is_forbidden(pets::create_pet(&env.pool, &screener, pet_request).await));
    assert!(is_forbidden(fosters::assign_foster(&env.pool, &screener, pet_id, foster).await));
    assert!(is_forbidden(fosters::unassign_foster(&env.pool, &adopter, pet_id).await));
    assert!(is_forbidden(
        events::create_event(
            &env.pool,
            &adopter,
            EventCreateRequest {
                org_id: org,
                name: "Party".to_string(),
                description: None,
                start_datetime: Utc::now(),
                end_datetime: None,
                location_name: None,
                location_address: None,
                capacity: None,
            },
        )
        .await
    ));
    assert!(is_forbidden(applications::list_applications(&env.pool, &adopter).await));
    assert!(is_forbidden(users::list_users(&env.pool, &screener).await));
    assert!(is_forbidden(
        medical::create_medical_record(
            &env.pool,
            &adopter,
            pet_id,
            MedicalRecordCreateRequest {
                record_type: "vaccination".to_string(),
                description: None,
                performed_at: None,
                vet_name: None,
            },
        )
        .await
    ));

    let status: PetStatus = sqlx::query_scalar("SELECT status FROM pets WHERE id = ?")
        .bind(pet_id)
        .fetch_one(&env.pool)
        .await?;
    assert_eq!(status, PetStatus::Intake);

    Ok(())
}

#[tokio::test]
async fn role_check_runs_before_the_lookup() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let adopter = env.actor(seed_user(&env.pool, org, "adopter@happytails.test", &["adopter"], true).await?).await?;

    let patch = serde_json::from_value(json!({"name": "Ghost"}))?;
    let result = pets::update_pet(&env.pool, &adopter, Uuid::new_v4(), patch).await;
    assert!(is_forbidden(result));

    Ok(())
}

#[tokio::test]
async fn privileged_roles_bypass_resource_roles() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let pet_id = seed_pet(&env.pool, org, "Biscuit", PetStatus::Intake).await?;
    let foster = seed_user(&env.pool, org, "foster@happytails.test", &["foster"], true).await?;
    let super_admin = env
        .actor(seed_user(&env.pool, org, "root@happytails.test", &["super_admin"], true).await?)
        .await?;

    let pet = fosters::assign_foster(&env.pool, &super_admin, pet_id, foster).await?;
    assert_eq!(pet.status, PetStatus::InFoster);
    assert!(applications::list_applications(&env.pool, &super_admin).await?.is_empty());

    let record = medical::create_medical_record(
        &env.pool,
        &super_admin,
        pet_id,
        MedicalRecordCreateRequest {
            record_type: "checkup".to_string(),
            description: Some("Healthy".to_string()),
            performed_at: Some(Utc::now()),
            vet_name: Some("Dr. Herriot".to_string()),
        },
    )
    .await?;
    let records = medical::list_medical_records(&env.pool, &super_admin, pet_id).await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, record.id);

    Ok(())
}

#[tokio::test]
async fn any_one_listed_role_is_enough() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let pet_id = seed_pet(&env.pool, org, "Biscuit", PetStatus::NeedsFoster).await?;
    let foster = seed_user(&env.pool, org, "foster@happytails.test", &["foster"], true).await?;
    let pet_coordinator = env
        .actor(seed_user(&env.pool, org, "pets@happytails.test", &["volunteer", "pet_coordinator"], true).await?)
        .await?;

    let pet = fosters::assign_foster(&env.pool, &pet_coordinator, pet_id, foster).await?;
    assert_eq!(pet.foster_user_id, Some(foster));

    Ok(())
}
