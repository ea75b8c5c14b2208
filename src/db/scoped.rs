//! Organization-scoped data access.
//!
//! Every read of a tenant-owned row goes through these helpers, so the
//! `org_id` predicate is part of the lookup query itself. A row that exists
//! in another organization is indistinguishable from a missing one.

use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{Executor, FromRow};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// A table whose rows are owned by exactly one organization.
pub trait OrgScoped: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static str;
    const NOT_FOUND: &'static str;
    const ORDER_BY: &'static str = "created_at DESC";
}

pub async fn fetch_in_org<'e, T, E>(executor: E, org_id: Uuid, id: Uuid) -> AppResult<T>
where
    T: OrgScoped,
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ? AND org_id = ?",
        T::COLUMNS,
        T::TABLE
    );

    sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .bind(org_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(T::NOT_FOUND))
}

pub async fn list_in_org<'e, T, E>(executor: E, org_id: Uuid) -> AppResult<Vec<T>>
where
    T: OrgScoped,
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM {} WHERE org_id = ? ORDER BY {}",
        T::COLUMNS,
        T::TABLE,
        T::ORDER_BY
    );

    Ok(sqlx::query_as::<_, T>(&sql)
        .bind(org_id)
        .fetch_all(executor)
        .await?)
}

/// List rows of the organization whose `column` equals `value`.
/// `column` is always a compile-time column name, never caller input.
pub async fn list_in_org_by<'e, T, E>(
    executor: E,
    org_id: Uuid,
    column: &'static str,
    value: Uuid,
) -> AppResult<Vec<T>>
where
    T: OrgScoped,
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM {} WHERE org_id = ? AND {} = ? ORDER BY {}",
        T::COLUMNS,
        T::TABLE,
        column,
        T::ORDER_BY
    );

    Ok(sqlx::query_as::<_, T>(&sql)
        .bind(org_id)
        .bind(value)
        .fetch_all(executor)
        .await?)
}

/// Check that an optional cross-reference resolves inside the organization.
pub async fn ensure_in_org<'e, E>(
    executor: E,
    table: &'static str,
    org_id: Uuid,
    id: Option<Uuid>,
    label: &str,
) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let Some(id) = id else {
        return Ok(());
    };

    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ? AND org_id = ?)", table);
    let exists: bool = sqlx::query_scalar(&sql)
        .bind(id)
        .bind(org_id)
        .fetch_one(executor)
        .await?;

    if !exists {
        return Err(AppError::bad_request(format!("{label} not found")));
    }

    Ok(())
}
