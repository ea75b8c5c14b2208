mod common;

use anyhow::Result;
use rescueworks::errors::AppError;
use rescueworks::models::pet::{PetStatus, PetUpdateRequest};
use rescueworks::services::{fosters, pets};

use common::{seed_org, seed_pet, seed_user, setup};

#[tokio::test]
async fn assigning_a_foster_moves_intake_pet_into_foster() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let coordinator = seed_user(&env.pool, org, "coord@happytails.test", &["foster_coordinator"], true).await?;
    let foster = seed_user(&env.pool, org, "foster@happytails.test", &["foster"], true).await?;
    let pet_id = seed_pet(&env.pool, org, "Biscuit", PetStatus::Intake).await?;

    let actor = env.actor(coordinator).await?;
    let pet = fosters::assign_foster(&env.pool, &actor, pet_id, foster).await?;

    assert_eq!(pet.foster_user_id, Some(foster));
    assert_eq!(pet.status, PetStatus::InFoster);

    let pet = fosters::unassign_foster(&env.pool, &actor, pet_id).await?;
    assert_eq!(pet.foster_user_id, None);
    assert_eq!(pet.status, PetStatus::NeedsFoster);

    let pet = fosters::assign_foster(&env.pool, &actor, pet_id, foster).await?;
    assert_eq!(pet.status, PetStatus::InFoster);

    Ok(())
}

#[tokio::test]
async fn assigning_a_foster_leaves_unrelated_status_alone() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let admin = seed_user(&env.pool, org, "admin@happytails.test", &["admin"], true).await?;
    let foster = seed_user(&env.pool, org, "foster@happytails.test", &["foster"], true).await?;
    let pet_id = seed_pet(&env.pool, org, "Pepper", PetStatus::Adopted).await?;

    let actor = env.actor(admin).await?;
    let pet = fosters::assign_foster(&env.pool, &actor, pet_id, foster).await?;
    assert_eq!(pet.foster_user_id, Some(foster));
    assert_eq!(pet.status, PetStatus::Adopted);

    let pet = fosters::unassign_foster(&env.pool, &actor, pet_id).await?;
    assert_eq!(pet.foster_user_id, None);
    assert_eq!(pet.status, PetStatus::Adopted);

    Ok(())
}

#[tokio::test]
async fn pet_in_another_org_is_not_found_for_assignment() -> Result<()> {
    let env = setup().await?;
    let org_one = seed_org(&env.pool, "One").await?;
    let org_two = seed_org(&env.pool, "Two").await?;
    let pet_id = seed_pet(&env.pool, org_one, "Biscuit", PetStatus::Intake).await?;
    let foster_one = seed_user(&env.pool, org_one, "foster@one.test", &["foster"], true).await?;
    let coordinator_two = seed_user(&env.pool, org_two, "coord@two.test", &["foster_coordinator"], true).await?;
    let foster_two = seed_user(&env.pool, org_two, "foster@two.test", &["foster"], true).await?;

    let outsider = env.actor(coordinator_two).await?;
    let err = fosters::assign_foster(&env.pool, &outsider, pet_id, foster_two).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    let err = fosters::assign_foster(&env.pool, &outsider, pet_id, foster_one).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    let err = fosters::unassign_foster(&env.pool, &outsider, pet_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn foster_from_another_org_is_not_found() -> Result<()> {
    let env = setup().await?;
    let org_one = seed_org(&env.pool, "One").await?;
    let org_two = seed_org(&env.pool, "Two").await?;
    let coordinator = seed_user(&env.pool, org_one, "coord@one.test", &["pet_coordinator"], true).await?;
    let stranger = seed_user(&env.pool, org_two, "foster@two.test", &["foster"], true).await?;
    let pet_id = seed_pet(&env.pool, org_one, "Biscuit", PetStatus::NeedsFoster).await?;

    let actor = env.actor(coordinator).await?;
    let err = fosters::assign_foster(&env.pool, &actor, pet_id, stranger).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    let pet = pets::get_pet(&env.pool, &actor, pet_id).await?;
    assert_eq!(pet.foster_user_id, None);
    assert_eq!(pet.status, PetStatus::NeedsFoster);

    Ok(())
}

#[tokio::test]
async fn inactive_foster_is_rejected_and_pet_is_unchanged() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let coordinator = seed_user(&env.pool, org, "coord@happytails.test", &["foster_coordinator"], true).await?;
    let inactive = seed_user(&env.pool, org, "gone@happytails.test", &["foster"], false).await?;
    let pet_id = seed_pet(&env.pool, org, "Biscuit", PetStatus::Intake).await?;

    let actor = env.actor(coordinator).await?;
    let before = pets::get_pet(&env.pool, &actor, pet_id).await?;

    let err = fosters::assign_foster(&env.pool, &actor, pet_id, inactive).await.unwrap_err();
    match err {
        AppError::InvalidState(message) => assert_eq!(message, "cannot assign pet to inactive user"),
        other => panic!("expected InvalidState, got {other:?}"),
    }

    let after = pets::get_pet(&env.pool, &actor, pet_id).await?;
    assert_eq!(before, after);

    Ok(())
}

#[tokio::test]
async fn status_only_patch_keeps_every_other_field() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let coordinator = seed_user(&env.pool, org, "coord@happytails.test", &["pet_coordinator"], true).await?;
    let foster = seed_user(&env.pool, org, "foster@happytails.test", &["foster"], true).await?;
    let pet_id = seed_pet(&env.pool, org, "Biscuit", PetStatus::Intake).await?;

    let actor = env.actor(coordinator).await?;
    let fostered = fosters::assign_foster(&env.pool, &actor, pet_id, foster).await?;

    let patch = PetUpdateRequest {
        status: Some(PetStatus::MedicalHold),
        ..Default::default()
    };
    let patched = pets::update_pet(&env.pool, &actor, pet_id, patch).await?;

    assert_eq!(patched.status, PetStatus::MedicalHold);
    assert_eq!(patched.name, fostered.name);
    assert_eq!(patched.species, fostered.species);
    assert_eq!(patched.breed, fostered.breed);
    assert_eq!(patched.sex, fostered.sex);
    assert_eq!(patched.foster_user_id, Some(foster));

    Ok(())
}

#[tokio::test]
async fn in_foster_status_requires_a_foster() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let coordinator = seed_user(&env.pool, org, "coord@happytails.test", &["pet_coordinator"], true).await?;
    let pet_id = seed_pet(&env.pool, org, "Biscuit", PetStatus::Intake).await?;

    let actor = env.actor(coordinator).await?;
    let patch = PetUpdateRequest {
        status: Some(PetStatus::InFoster),
        ..Default::default()
    };
    let err = pets::update_pet(&env.pool, &actor, pet_id, patch).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn foster_list_shows_active_fosters_with_their_pets() -> Result<()> {
    let env = setup().await?;
    let org = seed_org(&env.pool, "Happy Tails").await?;
    let other_org = seed_org(&env.pool, "Elsewhere").await?;
    let coordinator = seed_user(&env.pool, org, "coord@happytails.test", &["foster_coordinator"], true).await?;
    let foster = seed_user(&env.pool, org, "foster@happytails.test", &["foster"], true).await?;
    seed_user(&env.pool, org, "retired@happytails.test", &["foster"], false).await?;
    seed_user(&env.pool, other_org, "foster@elsewhere.test", &["foster"], true).await?;
    let pet_id = seed_pet(&env.pool, org, "Biscuit", PetStatus::Intake).await?;

    let actor = env.actor(coordinator).await?;
    fosters::assign_foster(&env.pool, &actor, pet_id, foster).await?;

    let summaries = fosters::list_fosters(&env.pool, &actor).await?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].user.id, foster);
    assert_eq!(summaries[0].pets.len(), 1);
    assert_eq!(summaries[0].pets[0].id, pet_id);

    Ok(())
}
