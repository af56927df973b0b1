//! Role tiers.

use serde::{Deserialize, Serialize};

/// Capability tier assigned to a user.
///
/// Tiers are ordered: `Ordinary < Elevated < Privileged < Administrator`.
/// Compare them through [`RoleRequirement`] rather than by position.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Ordinary,
    Elevated,
    Privileged,
    Administrator,
}

impl Role {
    /// Tier allowed to create communities beyond the first one.
    pub const QUOTA_TIER: RoleRequirement = RoleRequirement::AtLeast(Self::Privileged);

    /// Tier that bypasses creator checks and hard-deletes.
    pub const ADMIN_TIER: RoleRequirement = RoleRequirement::Is(Self::Administrator);

    /// Convert to string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::Elevated => "elevated",
            Self::Privileged => "privileged",
            Self::Administrator => "administrator",
        }
    }

    /// Parse from database string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ordinary" => Some(Self::Ordinary),
            "elevated" => Some(Self::Elevated),
            "privileged" => Some(Self::Privileged),
            "administrator" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Returns true for the administrator tier.
    pub fn is_administrator(self) -> bool {
        Self::ADMIN_TIER.is_satisfied_by(self)
    }
}

/// A named condition on a [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// The role is this tier or any tier above it.
    AtLeast(Role),
    /// The role is exactly this tier.
    Is(Role),
}

impl RoleRequirement {
    /// Check `role` against this requirement.
    pub fn is_satisfied_by(self, role: Role) -> bool {
        match self {
            Self::AtLeast(min) => role >= min,
            Self::Is(expected) => role == expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_are_ordered() {
        assert!(Role::Ordinary < Role::Elevated);
        assert!(Role::Elevated < Role::Privileged);
        assert!(Role::Privileged < Role::Administrator);
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [
            Role::Ordinary,
            Role::Elevated,
            Role::Privileged,
            Role::Administrator,
        ] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("superuser"), None);
    }

    #[test]
    fn test_quota_tier_starts_above_second_level() {
        assert!(!Role::QUOTA_TIER.is_satisfied_by(Role::Ordinary));
        assert!(!Role::QUOTA_TIER.is_satisfied_by(Role::Elevated));
        assert!(Role::QUOTA_TIER.is_satisfied_by(Role::Privileged));
        assert!(Role::QUOTA_TIER.is_satisfied_by(Role::Administrator));
    }

    #[test]
    fn test_admin_tier_is_exact() {
        assert!(Role::Administrator.is_administrator());
        assert!(!Role::Privileged.is_administrator());
    }
}
