use sqlx::SqlitePool;
use uuid::Uuid;

use crate::authz::{requirements, roles, Actor};
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::jwt::JwtConfig;
use crate::models::organization::{OnboardRequest, OnboardResponse, Organization, OrganizationUpdateRequest};
use crate::services::users::{grant_role, insert_user};
use crate::utils::{hash_password_blocking, patch_nullable, utc_now};

const ORGANIZATION_COLUMNS: &str = "id, name, logo_url, primary_contact_email, created_at, updated_at";

async fn fetch_organization<'e, E>(executor: E, org_id: Uuid) -> AppResult<Organization>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let sql = format!("SELECT {} FROM organizations WHERE id = ?", ORGANIZATION_COLUMNS);
    sqlx::query_as::<_, Organization>(&sql)
        .bind(org_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::UnknownOrganization)
}

/// Create an organization and its first administrator in one transaction.
pub async fn onboard_organization(
    pool: &SqlitePool,
    jwt: &JwtConfig,
    input: OnboardRequest,
) -> AppResult<OnboardResponse> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("organization name is required"));
    }

    let password_hash = hash_password_blocking(&input.admin.password).await?;

    let org_id = Uuid::new_v4();
    let now = utc_now();
    let mut tx = db::begin_write(pool).await?;

    sqlx::query(
        "INSERT INTO organizations (id, name, logo_url, primary_contact_email, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(org_id)
    .bind(name)
    .bind(&input.logo_url)
    .bind(&input.primary_contact_email)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let admin = insert_user(
        &mut tx,
        org_id,
        &input.admin.email,
        &input.admin.full_name,
        input.admin.phone.as_deref(),
        &password_hash,
    )
    .await?;
    grant_role(&mut tx, org_id, admin.id, roles::ADMIN).await?;

    let organization = fetch_organization(&mut *tx, org_id).await?;
    let access_token = jwt.encode(admin.id)?;
    tx.commit().await?;

    tracing::info!(org_id = %org_id, admin_id = %admin.id, "organization onboarded");
    Ok(OnboardResponse {
        organization,
        access_token,
        token_type: "bearer".to_string(),
        user: admin.into(),
    })
}

pub async fn get_my_organization(pool: &SqlitePool, actor: &Actor) -> AppResult<Organization> {
    fetch_organization(pool, actor.org_id()).await
}

pub async fn update_my_organization(
    pool: &SqlitePool,
    actor: &Actor,
    input: OrganizationUpdateRequest,
) -> AppResult<Organization> {
    actor.require(&requirements::ORG_MANAGE)?;

    let mut tx = db::begin_write(pool).await?;
    let mut organization = fetch_organization(&mut *tx, actor.org_id()).await?;

    if let Some(name) = input.name {
        if name.trim().is_empty() {
            return Err(AppError::bad_request("organization name is required"));
        }
        organization.name = name;
    }
    patch_nullable(&mut organization.logo_url, input.logo_url);
    patch_nullable(&mut organization.primary_contact_email, input.primary_contact_email);

    sqlx::query(
        "UPDATE organizations SET name = ?, logo_url = ?, primary_contact_email = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&organization.name)
    .bind(&organization.logo_url)
    .bind(&organization.primary_contact_email)
    .bind(utc_now())
    .bind(organization.id)
    .execute(&mut *tx)
    .await?;

    let organization = fetch_organization(&mut *tx, actor.org_id()).await?;
    tx.commit().await?;

    Ok(organization)
}
