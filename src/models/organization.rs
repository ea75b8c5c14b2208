use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::user::{NewUser, User};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Onboards a rescue together with its first administrator.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OnboardRequest {
    #[schema(example = "Happy Tails Rescue")]
    pub name: String,
    #[schema(example = "https://happytails.example/logo.png")]
    pub logo_url: Option<String>,
    #[schema(example = "hello@happytails.example")]
    pub primary_contact_email: Option<String>,
    pub admin: NewUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OnboardResponse {
    pub organization: Organization,
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrganizationUpdateRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub primary_contact_email: Option<Option<String>>,
}
