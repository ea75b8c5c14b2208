use sqlx::SqlitePool;

use crate::authz::Actor;
use crate::db::list_in_org_by;
use crate::errors::AppResult;
use crate::models::application::Application;
use crate::models::pet::Pet;
use crate::models::portal::PortalSummary;
use crate::models::task::Task;

/// The actor's own applications, fostered pets and assigned tasks.
pub async fn my_portal(pool: &SqlitePool, actor: &Actor) -> AppResult<PortalSummary> {
    let org_id = actor.org_id();
    let user_id = actor.user_id();

    Ok(PortalSummary {
        my_applications: list_in_org_by::<Application, _>(pool, org_id, "applicant_user_id", user_id).await?,
        my_foster_pets: list_in_org_by::<Pet, _>(pool, org_id, "foster_user_id", user_id).await?,
        my_tasks: list_in_org_by::<Task, _>(pool, org_id, "assigned_to_user_id", user_id).await?,
    })
}
