use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::OrgScoped;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub org_id: Uuid,
    pub pet_id: Uuid,
    #[schema(example = "vaccination")]
    pub record_type: String,
    pub description: Option<String>,
    pub performed_at: Option<DateTime<Utc>>,
    pub vet_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrgScoped for MedicalRecord {
    const TABLE: &'static str = "medical_records";
    const COLUMNS: &'static str =
        "id, org_id, pet_id, record_type, description, performed_at, vet_name, created_at";
    const NOT_FOUND: &'static str = "medical record not found";
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MedicalRecordCreateRequest {
    #[schema(example = "vaccination")]
    pub record_type: String,
    #[schema(example = "Rabies booster")]
    pub description: Option<String>,
    pub performed_at: Option<DateTime<Utc>>,
    #[schema(example = "Dr. Herriot")]
    pub vet_name: Option<String>,
}
