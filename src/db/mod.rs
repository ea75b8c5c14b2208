use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub mod scoped;

pub use scoped::{ensure_in_org, fetch_in_org, list_in_org, list_in_org_by, OrgScoped};

/// How long a writer waits for the SQLite write lock before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn init(database_url: &str) -> anyhow::Result<SqlitePool> {
	let options = SqliteConnectOptions::from_str(database_url)
		.context("invalid DATABASE_URL")?
		.create_if_missing(true)
		.foreign_keys(true)
		.journal_mode(SqliteJournalMode::Wal)
		.busy_timeout(BUSY_TIMEOUT);

	let pool = SqlitePoolOptions::new()
		.max_connections(10)
		.min_connections(1)
		.acquire_timeout(Duration::from_secs(10))
		.connect_with(options)
		.await
		.context("failed to connect to database")?;

	sqlx::migrate!()
		.run(&pool)
		.await
		.context("failed to run migrations")?;

	Ok(pool)
}

/// Open a transaction that holds the write lock from its first statement.
///
/// Every mutation reads before it writes. Under a deferred `BEGIN` the lock
/// upgrade fails immediately when another connection is writing; with
/// `BEGIN IMMEDIATE` writers queue on the busy timeout instead.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
	pool.begin_with("BEGIN IMMEDIATE").await
}
