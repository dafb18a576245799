//! Status and role enums.

use serde::{Deserialize, Serialize};

/// Order status.
///
/// Orders are created as `completed` and never transition afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Completed,
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Store administrator (catalog, replies, dashboard).
    Admin,
    /// Regular shopper.
    #[default]
    User,
}

impl Role {
    /// Whether this role may use the admin console.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_value() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Completed).ok().as_deref(),
            Some("\"completed\"")
        );
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::Admin, Role::User] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        assert!("super_admin".parse::<Role>().is_err());
    }
}
