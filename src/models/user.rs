use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::OrgScoped;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub org_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub org_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrgScoped for DbUser {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str =
        "id, org_id, email, full_name, phone, password_hash, is_active, created_at, updated_at";
    const NOT_FOUND: &'static str = "user not found";
    const ORDER_BY: &'static str = "full_name ASC";
}

impl From<DbUser> for User {
    fn from(value: DbUser) -> Self {
        User {
            id: value.id,
            org_id: value.org_id,
            email: value.email,
            full_name: value.full_name,
            phone: value.phone,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// One role held by one user inside the user's own organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoleAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub org_id: Uuid,
    #[schema(example = "pet_coordinator")]
    pub role_name: String,
    pub created_at: DateTime<Utc>,
}

/// A user together with the role names held in their organization.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserWithRoles {
    pub user: User,
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewUser {
    #[schema(example = "ada@happytails.example")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = "555-0100")]
    pub phone: Option<String>,
    #[schema(example = "S3cureP@ssw0rd")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub org_id: Uuid,
    #[schema(example = "adopter@example.com")]
    pub email: String,
    #[schema(example = "Grace Hopper")]
    pub full_name: String,
    pub phone: Option<String>,
    #[schema(example = "S3cureP@ssw0rd")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@happytails.example")]
    pub email: String,
    #[schema(example = "S3cureP@ssw0rd")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    pub user: User,
}

impl AuthResponse {
    pub fn bearer(access_token: String, user: User) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserCreateRequest {
    #[schema(example = "foster@happytails.example")]
    pub email: String,
    #[schema(example = "Katherine Johnson")]
    pub full_name: String,
    pub phone: Option<String>,
    pub password: String,
    #[serde(default)]
    #[schema(example = json!(["foster"]))]
    pub roles: Vec<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserUpdateRequest {
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRoleRequest {
    #[schema(example = "foster_coordinator")]
    pub role_name: String,
}
