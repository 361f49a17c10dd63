//! User entity and the three actor roles.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;

/// The three actor roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    Client,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            "client" => Ok(Self::Client),
            _ => Err(ParseEnumError {
                raw: s.to_string(),
                expected: "admin, employee, client",
            }),
        }
    }
}

/// A user account. Authentication is handled by the surrounding system; the
/// core only needs identity, role, and ownership attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Unique, stored lowercased.
    pub email: String,
    pub full_name: String,
    pub role: Role,
    /// For employees: the area they belong to.
    pub area_id: Option<i64>,
    /// For clients: the company they represent.
    pub company_name: Option<String>,
    pub is_active: bool,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

impl User {
    /// Display name used when denormalizing actors into the timeline:
    /// the full name when set, otherwise the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(full_name: &str) -> User {
        User {
            id: 7,
            email: "ana@example.com".into(),
            full_name: full_name.into(),
            role: Role::Employee,
            area_id: None,
            company_name: None,
            is_active: true,
            created_at_us: 0,
            updated_at_us: 0,
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        assert_eq!(user("Ana Pérez").display_name(), "Ana Pérez");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(user("").display_name(), "ana@example.com");
    }

    #[test]
    fn role_roundtrip() {
        for role in [Role::Admin, Role::Employee, Role::Client] {
            let reparsed: Role = role.as_str().parse().expect("should roundtrip");
            assert_eq!(role, reparsed);
        }
    }
}
