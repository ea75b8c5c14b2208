use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::OrgScoped;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ApplicationType {
    Adoption,
    Foster,
    Volunteer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Withdrawn,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Application {
    pub id: Uuid,
    pub org_id: Uuid,
    pub applicant_user_id: Uuid,
    pub pet_id: Option<Uuid>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: ApplicationType,
    pub status: ApplicationStatus,
    #[schema(value_type = Object)]
    pub answers_json: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrgScoped for Application {
    const TABLE: &'static str = "applications";
    const COLUMNS: &'static str =
        "id, org_id, applicant_user_id, pet_id, type, status, answers_json, created_at, updated_at";
    const NOT_FOUND: &'static str = "application not found";
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplicationCreateRequest {
    pub org_id: Uuid,
    pub pet_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: ApplicationType,
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"home_type": "house", "has_yard": true}))]
    pub answers_json: Value,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ApplicationUpdateRequest {
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub pet_id: Option<Option<Uuid>>,
    #[schema(value_type = Option<Object>)]
    pub answers_json: Option<Value>,
}
