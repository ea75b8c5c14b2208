use sqlx::sqlite::Sqlite;
use sqlx::Executor;
use uuid::Uuid;

use super::actor::Actor;
use crate::errors::{AppError, AppResult};

/// Create-time guard: the requested `org_id` must be the actor's own.
///
/// Existing resources never reach this check; their lookups are scoped in the
/// query (`crate::db::scoped`) and a foreign row is simply not found.
pub fn ensure_same_org(actor: &Actor, org_id: Uuid) -> AppResult<()> {
    if actor.org_id() == org_id {
        return Ok(());
    }

    tracing::warn!(
        user_id = %actor.user_id(),
        actor_org = %actor.org_id(),
        requested_org = %org_id,
        "cross-organization create rejected"
    );
    Err(AppError::cross_tenant("user org mismatch"))
}

pub async fn ensure_organization_exists<'e, E>(executor: E, org_id: Uuid) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM organizations WHERE id = ?)")
        .bind(org_id)
        .fetch_one(executor)
        .await?;

    if !exists {
        return Err(AppError::UnknownOrganization);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use chrono::Utc;

    #[test]
    fn mismatched_org_is_cross_tenant() {
        let now = Utc::now();
        let actor = Actor::new(
            User {
                id: Uuid::new_v4(),
                org_id: Uuid::new_v4(),
                email: "a@example.com".to_string(),
                full_name: "A".to_string(),
                phone: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            ["admin"].into_iter().collect(),
        );

        assert!(ensure_same_org(&actor, actor.org_id()).is_ok());
        assert!(matches!(
            ensure_same_org(&actor, Uuid::new_v4()),
            Err(AppError::CrossTenant(_))
        ));
    }
}
