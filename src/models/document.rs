use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::OrgScoped;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DocumentVisibility {
    #[default]
    Internal,
    Public,
}

impl DocumentVisibility {
    /// Lenient parse used by uploads: anything unrecognised is internal.
    pub fn parse_or_internal(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("public") => DocumentVisibility::Public,
            _ => DocumentVisibility::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: Uuid,
    pub org_id: Uuid,
    pub uploader_user_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub medical_record_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub file_name: String,
    /// Path relative to the blob store root.
    pub file_path: String,
    pub file_type: Option<String>,
    pub visibility: DocumentVisibility,
    pub created_at: DateTime<Utc>,
}

impl OrgScoped for Document {
    const TABLE: &'static str = "documents";
    const COLUMNS: &'static str = "id, org_id, uploader_user_id, pet_id, medical_record_id, event_id, \
         task_id, file_name, file_path, file_type, visibility, created_at";
    const NOT_FOUND: &'static str = "document not found";
}

/// Validated upload: the multipart fields after extraction.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub org_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub medical_record_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub visibility: DocumentVisibility,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DocumentUpdateRequest {
    pub visibility: Option<DocumentVisibility>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub pet_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub medical_record_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub event_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub task_id: Option<Option<Uuid>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentListQuery {
    pub pet_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_visibility_falls_back_to_internal() {
        assert_eq!(DocumentVisibility::parse_or_internal(Some("PUBLIC")), DocumentVisibility::Public);
        assert_eq!(DocumentVisibility::parse_or_internal(Some("secret")), DocumentVisibility::Internal);
        assert_eq!(DocumentVisibility::parse_or_internal(None), DocumentVisibility::Internal);
    }
}
