use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::routes::{applications, auth, events, files, fosters, health, orgs, pets, portal, tasks, users};
use crate::storage::{BlobStore, LocalBlobStore};

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        let blobs = Arc::new(LocalBlobStore::new(config.upload_root.clone()));
        Self::with_blob_store(pool, config, blobs)
    }

    pub fn with_blob_store(pool: SqlitePool, config: AppConfig, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            blobs,
        }
    }
}

fn cors_layer(config: &AppConfig) -> Result<CorsLayer, AppError> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| AppError::configuration(format!("invalid CORS origin: {origin}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true))
}

pub async fn create_app(pool: SqlitePool, config: AppConfig) -> Result<Router, AppError> {
    let cors = cors_layer(&config)?;
    let state = AppState::new(pool, config);

    Ok(router(state).layer(cors).layer(TraceLayer::new_for_http()))
}

pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/token", post(auth::token))
        .route("/me", get(auth::me));

    let org_routes = Router::new()
        .route("/", post(orgs::onboard))
        .route("/me", get(orgs::get_my_org).patch(orgs::update_my_org));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/:id", get(users::get_user).patch(users::update_user))
        .route("/:id/roles", post(users::assign_role))
        .route("/:id/roles/:role", delete(users::revoke_role));

    let pet_routes = Router::new()
        .route("/", get(pets::list_pets).post(pets::create_pet))
        .route("/:id", get(pets::get_pet).patch(pets::update_pet))
        .route("/:id/foster", post(pets::assign_foster).delete(pets::unassign_foster))
        .route("/:id/medical", get(pets::list_medical_records).post(pets::create_medical_record));

    let application_routes = Router::new()
        .route("/", get(applications::list_applications).post(applications::create_application))
        .route("/:id", get(applications::get_application).patch(applications::update_application));

    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/:id", get(events::get_event).patch(events::update_event));

    let task_routes = Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route("/:id", get(tasks::get_task).patch(tasks::update_task));

    let file_routes = Router::new()
        .route("/", get(files::list_files))
        .route(
            "/upload",
            post(files::upload_file).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/:id", get(files::get_file).patch(files::update_file));

    Router::new()
        .route("/api/health", get(health::health))
        .route("/fosters", get(fosters::list_fosters))
        .route("/portal/me", get(portal::my_portal))
        .nest("/auth", auth_routes)
        .nest("/orgs", org_routes)
        .nest("/users", user_routes)
        .nest("/pets", pet_routes)
        .nest("/applications", application_routes)
        .nest("/events", event_routes)
        .nest("/tasks", task_routes)
        .nest("/files", file_routes)
        .with_state(state)
}
