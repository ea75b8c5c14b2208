use std::collections::HashSet;

/// The role names an actor holds inside their organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(HashSet<String>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Role names in a stable order.
    pub fn sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.iter().cloned().collect();
        names.sort();
        names
    }

    pub fn satisfies(&self, required: &[&str]) -> bool {
        required.iter().any(|role| self.0.contains(*role))
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Any-of check: true iff the actor holds at least one required role.
pub fn satisfies(actor_roles: &RoleSet, required: &[&str]) -> bool {
    actor_roles.satisfies(required)
}

/// A named role requirement for one kind of operation.
#[derive(Debug, Clone, Copy)]
pub struct Requirement {
    pub action: &'static str,
    pub roles: &'static [&'static str],
}

impl Requirement {
    pub const fn new(action: &'static str, roles: &'static [&'static str]) -> Self {
        Self { action, roles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_of_semantics() {
        let roles: RoleSet = ["foster", "pet_coordinator"].into_iter().collect();
        assert!(satisfies(&roles, &["pet_coordinator", "admin"]));
        assert!(satisfies(&roles, &["foster"]));
        assert!(!satisfies(&roles, &["admin", "super_admin"]));
    }

    #[test]
    fn empty_sets_never_satisfy() {
        let none = RoleSet::new();
        assert!(!satisfies(&none, &["admin"]));
        let admin: RoleSet = ["admin"].into_iter().collect();
        assert!(!satisfies(&admin, &[]));
    }

    #[test]
    fn sorted_is_stable() {
        let roles: RoleSet = ["vet", "admin"].into_iter().collect();
        assert_eq!(roles.sorted(), vec!["admin".to_string(), "vet".to_string()]);
    }
}
