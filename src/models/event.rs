use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::OrgScoped;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    pub capacity: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrgScoped for Event {
    const TABLE: &'static str = "events";
    const COLUMNS: &'static str = "id, org_id, name, description, start_datetime, end_datetime, \
         location_name, location_address, capacity, created_at, updated_at";
    const NOT_FOUND: &'static str = "event not found";
    const ORDER_BY: &'static str = "start_datetime ASC";
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EventCreateRequest {
    pub org_id: Uuid,
    #[schema(example = "Saturday Adoption Fair")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "2025-10-04T10:00:00Z")]
    pub start_datetime: DateTime<Utc>,
    #[schema(example = "2025-10-04T15:00:00Z")]
    pub end_datetime: Option<DateTime<Utc>>,
    #[schema(example = "Central Park Pavilion")]
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    #[schema(example = 40)]
    pub capacity: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EventUpdateRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub end_datetime: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub location_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub location_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<i64>)]
    pub capacity: Option<Option<i64>>,
}
