//! Authorization layer.
//!
//! Every request resolves an [`Actor`] (identity), checks a [`Requirement`]
//! against the actor's roles (role policy) and then confines every read and
//! write to the actor's organization (scope guard, see `crate::db::scoped`).

mod actor;
mod policy;
mod scope;

pub use actor::{resolve_actor, Actor};
pub use policy::{satisfies, Requirement, RoleSet};
pub use scope::{ensure_organization_exists, ensure_same_org};

/// Well-known role names
pub mod roles {
    pub const SUPER_ADMIN: &str = "super_admin";
    pub const ADMIN: &str = "admin";
    pub const PET_COORDINATOR: &str = "pet_coordinator";
    pub const APPLICATION_SCREENER: &str = "application_screener";
    pub const EVENT_COORDINATOR: &str = "event_coordinator";
    pub const FOSTER_COORDINATOR: &str = "foster_coordinator";
    pub const VOLUNTEER_COORDINATOR: &str = "volunteer_coordinator";
    pub const VET: &str = "vet";
    pub const FOSTER: &str = "foster";
    pub const VOLUNTEER: &str = "volunteer";
    pub const ADOPTER: &str = "adopter";

    /// Roles that pass every resource-specific check.
    pub const PRIVILEGED: &[&str] = &[SUPER_ADMIN, ADMIN];

    /// Organization staff; community roles (foster, volunteer, adopter) are not staff.
    pub const STAFF: &[&str] = &[
        SUPER_ADMIN,
        ADMIN,
        PET_COORDINATOR,
        APPLICATION_SCREENER,
        EVENT_COORDINATOR,
        FOSTER_COORDINATOR,
        VOLUNTEER_COORDINATOR,
        VET,
    ];

    pub const ALL: &[&str] = &[
        SUPER_ADMIN,
        ADMIN,
        PET_COORDINATOR,
        APPLICATION_SCREENER,
        EVENT_COORDINATOR,
        FOSTER_COORDINATOR,
        VOLUNTEER_COORDINATOR,
        VET,
        FOSTER,
        VOLUNTEER,
        ADOPTER,
    ];

    pub fn is_known(role: &str) -> bool {
        ALL.contains(&role)
    }
}

/// Per-operation role requirements. Each list carries the privileged roles
/// next to the resource-specific ones.
pub mod requirements {
    use super::roles::*;
    use super::Requirement;

    pub const PET_MANAGE: Requirement =
        Requirement::new("pet.manage", &[PET_COORDINATOR, ADMIN, SUPER_ADMIN]);
    pub const APPLICATION_REVIEW: Requirement =
        Requirement::new("application.review", &[APPLICATION_SCREENER, ADMIN, SUPER_ADMIN]);
    pub const EVENT_MANAGE: Requirement =
        Requirement::new("event.manage", &[EVENT_COORDINATOR, ADMIN, SUPER_ADMIN]);
    pub const TASK_MANAGE: Requirement =
        Requirement::new("task.manage", &[VOLUNTEER_COORDINATOR, ADMIN, SUPER_ADMIN]);
    pub const FOSTER_MANAGE: Requirement = Requirement::new(
        "foster.manage",
        &[FOSTER_COORDINATOR, PET_COORDINATOR, ADMIN, SUPER_ADMIN],
    );
    pub const MEDICAL_MANAGE: Requirement =
        Requirement::new("medical.manage", &[VET, PET_COORDINATOR, ADMIN, SUPER_ADMIN]);
    pub const DOCUMENT_MANAGE: Requirement =
        Requirement::new("document.manage", &[PET_COORDINATOR, ADMIN, SUPER_ADMIN]);
    pub const USER_MANAGE: Requirement = Requirement::new("user.manage", &[ADMIN, SUPER_ADMIN]);
    pub const ORG_MANAGE: Requirement = Requirement::new("org.manage", &[ADMIN, SUPER_ADMIN]);
}

#[cfg(test)]
mod tests {
    use super::requirements::*;
    use super::roles;

    #[test]
    fn privileged_roles_appear_in_every_requirement() {
        let all = [
            PET_MANAGE,
            APPLICATION_REVIEW,
            EVENT_MANAGE,
            TASK_MANAGE,
            FOSTER_MANAGE,
            MEDICAL_MANAGE,
            DOCUMENT_MANAGE,
            USER_MANAGE,
            ORG_MANAGE,
        ];
        for req in all {
            for privileged in roles::PRIVILEGED {
                assert!(req.roles.contains(privileged), "{} lacks {}", req.action, privileged);
            }
        }
    }

    #[test]
    fn role_catalogue_is_closed() {
        assert!(roles::is_known("foster_coordinator"));
        assert!(!roles::is_known("root"));
    }
}
