use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::policy::{Requirement, RoleSet};
use super::roles;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::user::{DbUser, User};

/// The authenticated caller: a user, their organization and their roles.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
    pub roles: RoleSet,
}

impl Actor {
    pub fn new(user: User, roles: RoleSet) -> Self {
        Self { user, roles }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn org_id(&self) -> Uuid {
        self.user.org_id
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_staff(&self) -> bool {
        self.roles.satisfies(roles::STAFF)
    }

    /// Role gate. Runs before any state is read for a mutation.
    pub fn require(&self, requirement: &Requirement) -> AppResult<()> {
        if self.roles.satisfies(requirement.roles) {
            tracing::debug!(
                user_id = %self.user.id,
                action = requirement.action,
                "role requirement satisfied"
            );
            return Ok(());
        }

        tracing::debug!(
            user_id = %self.user.id,
            action = requirement.action,
            "permission denied"
        );
        Err(AppError::forbidden(format!(
            "one of the roles [{}] is required",
            requirement.roles.join(", ")
        )))
    }
}

/// Resolve the acting user for a verified token subject.
///
/// Missing and deactivated users are both `Unauthenticated`.
pub async fn resolve_actor(pool: &SqlitePool, user_id: Uuid) -> AppResult<Actor> {
    let db_user = sqlx::query_as::<_, DbUser>(
        "SELECT id, org_id, email, full_name, phone, password_hash, is_active, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .filter(|user| user.is_active)
    .ok_or_else(|| AppError::unauthenticated("user not found or inactive"))?;

    let role_names: Vec<String> =
        sqlx::query_scalar("SELECT role_name FROM roles WHERE user_id = ? AND org_id = ?")
            .bind(db_user.id)
            .bind(db_user.org_id)
            .fetch_all(pool)
            .await?;

    Ok(Actor::new(db_user.into(), role_names.into_iter().collect()))
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthenticated("Authorization header missing"))?;

        let claims = state.config.jwt.decode(token)?;

        resolve_actor(&state.pool, claims.sub).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::requirements;
    use chrono::Utc;

    fn actor_with(roles: &[&str]) -> Actor {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            org_id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            full_name: "A".to_string(),
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        Actor::new(user, roles.iter().copied().collect())
    }

    #[test]
    fn admin_bypasses_resource_roles() {
        let admin = actor_with(&["admin"]);
        assert!(admin.require(&requirements::PET_MANAGE).is_ok());
        assert!(admin.require(&requirements::EVENT_MANAGE).is_ok());
    }

    #[test]
    fn unrelated_role_is_forbidden() {
        let screener = actor_with(&["application_screener"]);
        assert!(matches!(
            screener.require(&requirements::PET_MANAGE),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn community_roles_are_not_staff() {
        assert!(!actor_with(&["foster", "adopter"]).is_staff());
        assert!(actor_with(&["vet"]).is_staff());
    }
}
