use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::OrgScoped;

/// Lifecycle of an animal in the rescue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PetStatus {
    Intake,
    NeedsFoster,
    InFoster,
    Available,
    Pending,
    Adopted,
    MedicalHold,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Intake => "intake",
            PetStatus::NeedsFoster => "needs_foster",
            PetStatus::InFoster => "in_foster",
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Adopted => "adopted",
            PetStatus::MedicalHold => "medical_hold",
        }
    }

    /// Status after a foster is assigned. Only intake and needs_foster move.
    pub fn after_foster_assigned(self) -> Self {
        match self {
            PetStatus::Intake | PetStatus::NeedsFoster => PetStatus::InFoster,
            other => other,
        }
    }

    /// Status after the foster is removed.
    pub fn after_foster_unassigned(self) -> Self {
        match self {
            PetStatus::InFoster => PetStatus::NeedsFoster,
            other => other,
        }
    }
}

impl Default for PetStatus {
    fn default() -> Self {
        PetStatus::Intake
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Pet {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub sex: Option<String>,
    pub status: PetStatus,
    pub description_public: Option<String>,
    pub description_internal: Option<String>,
    pub foster_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrgScoped for Pet {
    const TABLE: &'static str = "pets";
    const COLUMNS: &'static str = "id, org_id, name, species, breed, sex, status, description_public, \
         description_internal, foster_user_id, created_at, updated_at";
    const NOT_FOUND: &'static str = "pet not found";
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PetCreateRequest {
    pub org_id: Uuid,
    #[schema(example = "Buddy")]
    pub name: String,
    #[schema(example = "Dog")]
    pub species: String,
    #[schema(example = "Golden Retriever")]
    pub breed: Option<String>,
    #[schema(example = "Male")]
    pub sex: Option<String>,
    #[serde(default)]
    pub status: PetStatus,
    pub description_public: Option<String>,
    pub description_internal: Option<String>,
}

/// Merge-patch body. The foster link is not patchable; use the foster endpoints.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PetUpdateRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub breed: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub sex: Option<Option<String>>,
    pub status: Option<PetStatus>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub description_public: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub description_internal: Option<Option<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignFosterRequest {
    pub foster_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_moves_only_waiting_pets_into_foster() {
        assert_eq!(PetStatus::Intake.after_foster_assigned(), PetStatus::InFoster);
        assert_eq!(PetStatus::NeedsFoster.after_foster_assigned(), PetStatus::InFoster);
        assert_eq!(PetStatus::Adopted.after_foster_assigned(), PetStatus::Adopted);
        assert_eq!(PetStatus::MedicalHold.after_foster_assigned(), PetStatus::MedicalHold);
    }

    #[test]
    fn unassignment_returns_fostered_pets_to_needs_foster() {
        assert_eq!(PetStatus::InFoster.after_foster_unassigned(), PetStatus::NeedsFoster);
        assert_eq!(PetStatus::Available.after_foster_unassigned(), PetStatus::Available);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(serde_json::to_value(PetStatus::NeedsFoster).unwrap(), "needs_foster");
        assert_eq!(PetStatus::InFoster.as_str(), "in_foster");
    }
}
