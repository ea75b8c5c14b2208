use sqlx::SqlitePool;

use crate::authz::{ensure_organization_exists, roles, Actor};
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::jwt::JwtConfig;
use crate::models::user::{AuthResponse, DbUser, LoginRequest, RegisterRequest, UserWithRoles};
use crate::services::users::{grant_role, insert_user, normalize_email};
use crate::utils::{hash_password_blocking, verify_password_blocking, verify_password_decoy};

/// Self-registration into an existing organization as an adopter.
pub async fn register(pool: &SqlitePool, jwt: &JwtConfig, input: RegisterRequest) -> AppResult<AuthResponse> {
    let password_hash = hash_password_blocking(&input.password).await?;

    let mut tx = db::begin_write(pool).await?;
    ensure_organization_exists(&mut *tx, input.org_id).await?;

    let user = insert_user(
        &mut tx,
        input.org_id,
        &input.email,
        &input.full_name,
        input.phone.as_deref(),
        &password_hash,
    )
    .await?;
    grant_role(&mut tx, input.org_id, user.id, roles::ADOPTER).await?;

    let token = jwt.encode(user.id)?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, org_id = %user.org_id, "user registered");
    Ok(AuthResponse::bearer(token, user.into()))
}

/// Unknown email, wrong password and deactivated account are one failure.
pub async fn login(pool: &SqlitePool, jwt: &JwtConfig, input: LoginRequest) -> AppResult<AuthResponse> {
    let invalid = || AppError::unauthenticated("invalid credentials");
    let email = normalize_email(&input.email).map_err(|_| invalid())?;

    let user = sqlx::query_as::<_, DbUser>(
        "SELECT id, org_id, email, full_name, phone, password_hash, is_active, created_at, updated_at FROM users WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?;

    let Some(user) = user else {
        verify_password_decoy(&input.password).await?;
        return Err(invalid());
    };

    if !verify_password_blocking(&input.password, &user.password_hash).await? || !user.is_active {
        tracing::debug!(user_id = %user.id, "login rejected");
        return Err(invalid());
    }

    let token = jwt.encode(user.id)?;
    Ok(AuthResponse::bearer(token, user.into()))
}

pub fn me(actor: &Actor) -> UserWithRoles {
    UserWithRoles {
        user: actor.user.clone(),
        roles: actor.roles.sorted(),
    }
}
