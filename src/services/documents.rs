//! Documents: metadata rows in the store, bytes in a [`BlobStore`].

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::authz::{ensure_same_org, requirements, Actor};
use crate::db::{self, ensure_in_org, fetch_in_org, OrgScoped};
use crate::errors::{AppError, AppResult};
use crate::models::document::{Document, DocumentListQuery, DocumentUpdateRequest, DocumentUpload, DocumentVisibility};
use crate::storage::{sanitize_file_name, BlobStore};
use crate::utils::{patch_nullable, utc_now};

/// Staff see every document of the organization; everyone else sees public
/// documents and their own uploads.
fn can_view(actor: &Actor, document: &Document) -> bool {
    actor.is_staff()
        || document.visibility == DocumentVisibility::Public
        || document.uploader_user_id == actor.user_id()
}

pub async fn upload_document(
    pool: &SqlitePool,
    blobs: &dyn BlobStore,
    actor: &Actor,
    upload: DocumentUpload,
) -> AppResult<Document> {
    ensure_same_org(actor, upload.org_id)?;

    let org_id = actor.org_id();
    let mut tx = db::begin_write(pool).await?;
    ensure_in_org(&mut *tx, "pets", org_id, upload.pet_id, "pet").await?;
    ensure_in_org(&mut *tx, "medical_records", org_id, upload.medical_record_id, "medical record").await?;
    ensure_in_org(&mut *tx, "events", org_id, upload.event_id, "event").await?;
    ensure_in_org(&mut *tx, "tasks", org_id, upload.task_id, "task").await?;

    let file_name = sanitize_file_name(upload.file_name.as_deref().unwrap_or_default());
    let file_path = blobs.put(org_id, &file_name, &upload.bytes).await?;

    let document_id = Uuid::new_v4();
    let inserted = sqlx::query(
        "INSERT INTO documents (id, org_id, uploader_user_id, pet_id, medical_record_id, event_id, task_id, file_name, file_path, file_type, visibility, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(document_id)
    .bind(org_id)
    .bind(actor.user_id())
    .bind(upload.pet_id)
    .bind(upload.medical_record_id)
    .bind(upload.event_id)
    .bind(upload.task_id)
    .bind(&file_name)
    .bind(&file_path)
    .bind(&upload.content_type)
    .bind(upload.visibility)
    .bind(utc_now())
    .execute(&mut *tx)
    .await;

    let committed = match inserted {
        Ok(_) => tx.commit().await,
        Err(err) => Err(err),
    };
    if let Err(err) = committed {
        if let Err(cleanup) = blobs.delete(&file_path).await {
            tracing::warn!(error = %cleanup, file_path = %file_path, "orphaned blob left behind");
        }
        return Err(err.into());
    }

    let document = fetch_in_org::<Document, _>(pool, org_id, document_id).await?;
    tracing::info!(
        document_id = %document.id,
        visibility = ?document.visibility,
        size = upload.bytes.len(),
        "document uploaded"
    );
    Ok(document)
}

pub async fn list_documents(pool: &SqlitePool, actor: &Actor, query: DocumentListQuery) -> AppResult<Vec<Document>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE org_id = ? AND (? IS NULL OR pet_id = ?) ORDER BY {}",
        Document::COLUMNS,
        Document::TABLE,
        Document::ORDER_BY
    );

    let documents = sqlx::query_as::<_, Document>(&sql)
        .bind(actor.org_id())
        .bind(query.pet_id)
        .bind(query.pet_id)
        .fetch_all(pool)
        .await?;

    Ok(documents.into_iter().filter(|doc| can_view(actor, doc)).collect())
}

pub async fn get_document(pool: &SqlitePool, actor: &Actor, document_id: Uuid) -> AppResult<Document> {
    let document = fetch_in_org::<Document, _>(pool, actor.org_id(), document_id).await?;

    if !can_view(actor, &document) {
        return Err(AppError::not_found(Document::NOT_FOUND));
    }

    Ok(document)
}

pub async fn update_document(
    pool: &SqlitePool,
    actor: &Actor,
    document_id: Uuid,
    input: DocumentUpdateRequest,
) -> AppResult<Document> {
    actor.require(&requirements::DOCUMENT_MANAGE)?;

    let org_id = actor.org_id();
    let mut tx = db::begin_write(pool).await?;
    let mut document = fetch_in_org::<Document, _>(&mut *tx, org_id, document_id).await?;

    if let Some(pet_id) = input.pet_id {
        ensure_in_org(&mut *tx, "pets", org_id, pet_id, "pet").await?;
    }
    if let Some(record_id) = input.medical_record_id {
        ensure_in_org(&mut *tx, "medical_records", org_id, record_id, "medical record").await?;
    }
    if let Some(event_id) = input.event_id {
        ensure_in_org(&mut *tx, "events", org_id, event_id, "event").await?;
    }
    if let Some(task_id) = input.task_id {
        ensure_in_org(&mut *tx, "tasks", org_id, task_id, "task").await?;
    }

    if let Some(visibility) = input.visibility {
        document.visibility = visibility;
    }
    patch_nullable(&mut document.pet_id, input.pet_id);
    patch_nullable(&mut document.medical_record_id, input.medical_record_id);
    patch_nullable(&mut document.event_id, input.event_id);
    patch_nullable(&mut document.task_id, input.task_id);

    sqlx::query(
        "UPDATE documents SET visibility = ?, pet_id = ?, medical_record_id = ?, event_id = ?, task_id = ? \
         WHERE id = ? AND org_id = ?",
    )
    .bind(document.visibility)
    .bind(document.pet_id)
    .bind(document.medical_record_id)
    .bind(document.event_id)
    .bind(document.task_id)
    .bind(document.id)
    .bind(org_id)
    .execute(&mut *tx)
    .await?;

    let document = fetch_in_org::<Document, _>(&mut *tx, org_id, document_id).await?;
    tx.commit().await?;

    Ok(document)
}
