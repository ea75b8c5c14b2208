#![allow(dead_code)]

use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::SqlitePool;
use tempfile::{tempdir, TempDir};
use tower::util::ServiceExt;
use uuid::Uuid;

use rescueworks::authz::{resolve_actor, Actor};
use rescueworks::config::AppConfig;
use rescueworks::create_app;
use rescueworks::models::pet::PetStatus;
use rescueworks::utils::{hash_password, utc_now};

pub const PASSWORD: &str = "password123";

pub struct TestEnv {
    pub dir: TempDir,
    pub pool: SqlitePool,
    pub config: AppConfig,
}

impl TestEnv {
    pub async fn app(&self) -> Result<Router> {
        Ok(create_app(self.pool.clone(), self.config.clone()).await?)
    }

    pub fn token(&self, user_id: Uuid) -> Result<String> {
        Ok(self.config.jwt.encode(user_id)?)
    }

    pub async fn actor(&self, user_id: Uuid) -> Result<Actor> {
        Ok(resolve_actor(&self.pool, user_id).await?)
    }
}

pub async fn setup() -> Result<TestEnv> {
    let dir = tempdir()?;
    let db_path = dir.path().join("test.db");

    let opts = SqliteConnectOptions::new()
        .filename(db_path.as_path())
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(rescueworks::db::BUSY_TIMEOUT);
    let pool = SqlitePool::connect_with(opts).await?;

    let migrator =
        sqlx::migrate::Migrator::new(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")).await?;
    migrator.run(&pool).await?;

    let config = AppConfig::new(
        format!("sqlite://{}", db_path.display()),
        "test-secret",
        dir.path().join("uploads"),
    );

    Ok(TestEnv { dir, pool, config })
}

pub async fn seed_org(pool: &SqlitePool, name: &str) -> Result<Uuid> {
    let org_id = Uuid::new_v4();
    let now = utc_now();
    sqlx::query("INSERT INTO organizations (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(org_id)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(org_id)
}

pub async fn seed_user(pool: &SqlitePool, org_id: Uuid, email: &str, roles: &[&str], is_active: bool) -> Result<Uuid> {
    let user_id = Uuid::new_v4();
    let now = utc_now();
    sqlx::query(
        "INSERT INTO users (id, org_id, email, full_name, phone, password_hash, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, NULL, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(org_id)
    .bind(email)
    .bind(email.split('@').next().unwrap_or(email))
    .bind(hash_password(PASSWORD)?)
    .bind(is_active)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    for role in roles {
        sqlx::query("INSERT INTO roles (id, user_id, org_id, role_name, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(org_id)
            .bind(*role)
            .bind(now)
            .execute(pool)
            .await?;
    }

    Ok(user_id)
}

pub async fn seed_pet(pool: &SqlitePool, org_id: Uuid, name: &str, status: PetStatus) -> Result<Uuid> {
    let pet_id = Uuid::new_v4();
    let now = utc_now();
    sqlx::query(
        "INSERT INTO pets (id, org_id, name, species, breed, sex, status, created_at, updated_at) \
         VALUES (?, ?, ?, 'Dog', 'Beagle', 'Female', ?, ?, ?)",
    )
    .bind(pet_id)
    .bind(org_id)
    .bind(name)
    .bind(status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(pet_id)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}
