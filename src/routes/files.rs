use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::Actor;
use crate::errors::{AppError, AppResult};
use crate::models::document::{Document, DocumentListQuery, DocumentUpdateRequest, DocumentUpload, DocumentVisibility};
use crate::services;

/// Multipart body of `POST /files/upload`. Documentation only.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadForm {
    pub org_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub medical_record_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    #[schema(example = "internal")]
    pub visibility: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

fn parse_uuid(field: &str, raw: &str) -> AppResult<Option<Uuid>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(raw)
        .map(Some)
        .map_err(|_| AppError::bad_request(format!("{field} must be a UUID")))
}

async fn read_upload(mut multipart: Multipart) -> AppResult<DocumentUpload> {
    let mut org_id = None;
    let mut pet_id = None;
    let mut medical_record_id = None;
    let mut event_id = None;
    let mut task_id = None;
    let mut visibility = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("malformed multipart body: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::bad_request(format!("could not read file: {err}")))?;
            file = Some((file_name, content_type, bytes.to_vec()));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| AppError::bad_request(format!("could not read field {name}: {err}")))?;
        match name.as_str() {
            "org_id" => org_id = parse_uuid("org_id", &value)?,
            "pet_id" => pet_id = parse_uuid("pet_id", &value)?,
            "medical_record_id" => medical_record_id = parse_uuid("medical_record_id", &value)?,
            "event_id" => event_id = parse_uuid("event_id", &value)?,
            "task_id" => task_id = parse_uuid("task_id", &value)?,
            "visibility" => visibility = Some(value),
            _ => {}
        }
    }

    let org_id = org_id.ok_or_else(|| AppError::bad_request("org_id is required"))?;
    let (file_name, content_type, bytes) = file.ok_or_else(|| AppError::bad_request("file is required"))?;

    Ok(DocumentUpload {
        org_id,
        pet_id,
        medical_record_id,
        event_id,
        task_id,
        visibility: DocumentVisibility::parse_or_internal(visibility.as_deref()),
        file_name,
        content_type,
        bytes,
    })
}

#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "Documents",
    security(("bearerAuth" = [])),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document stored", body = Document),
        (status = 400, description = "Organization mismatch or unknown reference")
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    actor: Actor,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Document>)> {
    let upload = read_upload(multipart).await?;
    let document = services::documents::upload_document(&state.pool, state.blobs.as_ref(), &actor, upload).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    get,
    path = "/files",
    tag = "Documents",
    security(("bearerAuth" = [])),
    params(("pet_id" = Option<Uuid>, Query, description = "Only documents of this pet")),
    responses((status = 200, description = "Documents visible to the caller", body = [Document]))
)]
pub async fn list_files(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<DocumentListQuery>,
) -> AppResult<Json<Vec<Document>>> {
    Ok(Json(services::documents::list_documents(&state.pool, &actor, query).await?))
}

#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "Documents",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document metadata", body = Document),
        (status = 404, description = "Document not found")
    )
)]
pub async fn get_file(State(state): State<AppState>, actor: Actor, Path(id): Path<Uuid>) -> AppResult<Json<Document>> {
    Ok(Json(services::documents::get_document(&state.pool, &actor, id).await?))
}

#[utoipa::path(
    patch,
    path = "/files/{id}",
    tag = "Documents",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Document id")),
    request_body = DocumentUpdateRequest,
    responses((status = 200, description = "Document updated", body = Document))
)]
pub async fn update_file(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<DocumentUpdateRequest>,
) -> AppResult<Json<Document>> {
    Ok(Json(services::documents::update_document(&state.pool, &actor, id, payload).await?))
}
