//! User-related models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role on the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Student,
    /// Any role this client does not know, kept as sent
    Other(String),
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "admin" => Self::Admin,
            "student" => Self::Student,
            _ => Self::Other(role),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Student => f.write_str("student"),
            Self::Other(role) => f.write_str(role),
        }
    }
}

/// Authenticated user, as returned by `/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_role_keeps_server_value() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "ada@example.com",
            "role": "proctor"
        }))
        .unwrap();

        assert_eq!(user.role, Some(Role::Other("proctor".to_string())));
        assert_eq!(user.role.as_ref().unwrap().to_string(), "proctor");
        assert_eq!(user.name, None);
    }

    #[test]
    fn test_known_roles() {
        let admin: Role = serde_json::from_value(json!("admin")).unwrap();
        assert_eq!(admin, Role::Admin);
        assert_eq!(serde_json::to_value(Role::Student).unwrap(), json!("student"));
    }
}
