use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::authz::{requirements, roles, Actor};
use crate::db::{self, fetch_in_org, list_in_org};
use crate::errors::{AppError, AppResult};
use crate::models::user::{DbUser, RoleAssignment, User, UserCreateRequest, UserUpdateRequest, UserWithRoles};
use crate::utils::{hash_password_blocking, patch_nullable, utc_now};

pub(crate) fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::bad_request("a valid email is required"));
    }
    Ok(email)
}

/// Insert a user row with an already hashed password. The caller owns the transaction.
pub(crate) async fn insert_user(
    tx: &mut Transaction<'_, Sqlite>,
    org_id: Uuid,
    email: &str,
    full_name: &str,
    phone: Option<&str>,
    password_hash: &str,
) -> AppResult<DbUser> {
    let email = normalize_email(email)?;

    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(&email)
        .fetch_one(&mut **tx)
        .await?;
    if taken {
        return Err(AppError::conflict("email already registered"));
    }

    let user_id = Uuid::new_v4();
    let now = utc_now();
    sqlx::query(
        "INSERT INTO users (id, org_id, email, full_name, phone, password_hash, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(user_id)
    .bind(org_id)
    .bind(&email)
    .bind(full_name)
    .bind(phone)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    fetch_in_org::<DbUser, _>(&mut **tx, org_id, user_id).await
}

/// Grant a role to a user of `org_id`. Granting a held role is a no-op.
pub(crate) async fn grant_role(
    tx: &mut Transaction<'_, Sqlite>,
    org_id: Uuid,
    user_id: Uuid,
    role_name: &str,
) -> AppResult<()> {
    if !roles::is_known(role_name) {
        return Err(AppError::bad_request(format!("unknown role: {role_name}")));
    }

    sqlx::query(
        "INSERT INTO roles (id, user_id, org_id, role_name, created_at) VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT (user_id, role_name) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(org_id)
    .bind(role_name)
    .bind(utc_now())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn role_names<'e, E>(executor: E, org_id: Uuid, user_id: Uuid) -> AppResult<Vec<String>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let assignments = sqlx::query_as::<_, RoleAssignment>(
        "SELECT id, user_id, org_id, role_name, created_at FROM roles WHERE user_id = ? AND org_id = ? ORDER BY role_name ASC",
    )
    .bind(user_id)
    .bind(org_id)
    .fetch_all(executor)
    .await?;

    Ok(assignments.into_iter().map(|assignment| assignment.role_name).collect())
}

fn ensure_may_grant(actor: &Actor, role_name: &str) -> AppResult<()> {
    if role_name == roles::SUPER_ADMIN && !actor.has_role(roles::SUPER_ADMIN) {
        return Err(AppError::forbidden("only a super_admin may manage the super_admin role"));
    }
    Ok(())
}

pub async fn list_users(pool: &SqlitePool, actor: &Actor) -> AppResult<Vec<User>> {
    actor.require(&requirements::USER_MANAGE)?;

    let users = list_in_org::<DbUser, _>(pool, actor.org_id()).await?;
    Ok(users.into_iter().map(User::from).collect())
}

pub async fn get_user(pool: &SqlitePool, actor: &Actor, user_id: Uuid) -> AppResult<UserWithRoles> {
    actor.require(&requirements::USER_MANAGE)?;

    let user = fetch_in_org::<DbUser, _>(pool, actor.org_id(), user_id).await?;
    let roles = role_names(pool, actor.org_id(), user.id).await?;

    Ok(UserWithRoles { user: user.into(), roles })
}

pub async fn create_user(pool: &SqlitePool, actor: &Actor, input: UserCreateRequest) -> AppResult<UserWithRoles> {
    actor.require(&requirements::USER_MANAGE)?;
    for role in &input.roles {
        ensure_may_grant(actor, role)?;
    }

    let org_id = actor.org_id();
    let password_hash = hash_password_blocking(&input.password).await?;
    let mut tx = db::begin_write(pool).await?;
    let user = insert_user(
        &mut tx,
        org_id,
        &input.email,
        &input.full_name,
        input.phone.as_deref(),
        &password_hash,
    )
    .await?;
    for role in &input.roles {
        grant_role(&mut tx, org_id, user.id, role).await?;
    }
    let roles = role_names(&mut *tx, org_id, user.id).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, org_id = %org_id, roles = ?roles, "user created");
    Ok(UserWithRoles { user: user.into(), roles })
}

pub async fn update_user(
    pool: &SqlitePool,
    actor: &Actor,
    user_id: Uuid,
    input: UserUpdateRequest,
) -> AppResult<User> {
    actor.require(&requirements::USER_MANAGE)?;

    let org_id = actor.org_id();
    let mut tx = db::begin_write(pool).await?;
    let mut user = fetch_in_org::<DbUser, _>(&mut *tx, org_id, user_id).await?;

    if input.is_active == Some(false) && user.id == actor.user_id() {
        return Err(AppError::invalid_state("cannot deactivate yourself"));
    }

    if let Some(full_name) = input.full_name {
        user.full_name = full_name;
    }
    patch_nullable(&mut user.phone, input.phone);
    if let Some(is_active) = input.is_active {
        user.is_active = is_active;
    }

    sqlx::query("UPDATE users SET full_name = ?, phone = ?, is_active = ?, updated_at = ? WHERE id = ? AND org_id = ?")
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(user.is_active)
        .bind(utc_now())
        .bind(user.id)
        .bind(org_id)
        .execute(&mut *tx)
        .await?;

    let user = fetch_in_org::<DbUser, _>(&mut *tx, org_id, user_id).await?;
    tx.commit().await?;

    if !user.is_active {
        tracing::info!(user_id = %user.id, "user deactivated");
    }
    Ok(user.into())
}

pub async fn assign_role(pool: &SqlitePool, actor: &Actor, user_id: Uuid, role_name: &str) -> AppResult<UserWithRoles> {
    actor.require(&requirements::USER_MANAGE)?;
    ensure_may_grant(actor, role_name)?;

    let org_id = actor.org_id();
    let mut tx = db::begin_write(pool).await?;
    let user = fetch_in_org::<DbUser, _>(&mut *tx, org_id, user_id).await?;
    if !user.is_active {
        return Err(AppError::invalid_state("cannot assign role to inactive user"));
    }

    grant_role(&mut tx, user.org_id, user.id, role_name).await?;
    let roles = role_names(&mut *tx, org_id, user.id).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, role = role_name, "role granted");
    Ok(UserWithRoles { user: user.into(), roles })
}

pub async fn revoke_role(pool: &SqlitePool, actor: &Actor, user_id: Uuid, role_name: &str) -> AppResult<UserWithRoles> {
    actor.require(&requirements::USER_MANAGE)?;
    ensure_may_grant(actor, role_name)?;

    let org_id = actor.org_id();
    let mut tx = db::begin_write(pool).await?;
    let user = fetch_in_org::<DbUser, _>(&mut *tx, org_id, user_id).await?;

    let removed = sqlx::query("DELETE FROM roles WHERE user_id = ? AND org_id = ? AND role_name = ?")
        .bind(user.id)
        .bind(org_id)
        .bind(role_name)
        .execute(&mut *tx)
        .await?;
    if removed.rows_affected() == 0 {
        return Err(AppError::not_found("role assignment not found"));
    }

    let roles = role_names(&mut *tx, org_id, user.id).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, role = role_name, "role revoked");
    Ok(UserWithRoles { user: user.into(), roles })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
        assert!(normalize_email("not-an-email").is_err());
    }
}
