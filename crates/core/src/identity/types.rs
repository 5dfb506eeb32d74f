use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{Audit, Entity, Result, TypeTagged, Validate};
use crate::serde::deserialize_optional_string;

use super::error::ValidationError;
use super::merge::{merge_roles, merge_users};

fn user_tag() -> String {
    User::ENTITY_TYPE.to_string()
}

fn role_tag() -> String {
    Role::ENTITY_TYPE.to_string()
}

/// A person or service principal known to the directory.
///
/// Business fields are optional so a partial update can leave them unset;
/// merge then keeps the stored values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity URI, assigned at creation and immutable thereafter.
    pub id: String,
    /// Wire type tag. Must equal `"User"`; validation rejects anything else.
    #[serde(rename = "type", default = "user_tag")]
    pub type_tag: String,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    /// Identity URIs of the roles granted to this user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl User {
    /// Creates a new user with a generated identity URI.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            id: format!("urn:user:{}", Uuid::new_v4()),
            type_tag: user_tag(),
            audit: Audit::default(),
            user_name: Some(user_name.into()),
            email: None,
            roles: None,
            active: None,
        }
    }

    /// Sets a specific identity URI (useful for updates and testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = Some(roles);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }
}

impl TypeTagged for User {
    const ENTITY_TYPE: &'static str = "User";

    fn type_tag(&self) -> &str {
        &self.type_tag
    }
}

impl Validate for User {
    fn validation_error(&self) -> Option<ValidationError> {
        if let Err(error) = self.verify_type_tag() {
            return Some(error);
        }
        if let Some(name) = &self.user_name {
            if name.trim().is_empty() {
                return Some(ValidationError::EmptyUserName);
            }
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Some(ValidationError::InvalidEmail(email.clone()));
            }
        }
        None
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn merge(&self, incoming: &Self) -> Result<Self> {
        merge_users(self, incoming)
    }
}

/// A named set of permissions that can be granted to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Identity URI, assigned at creation and immutable thereafter.
    pub id: String,
    /// Wire type tag. Must equal `"Role"`; validation rejects anything else.
    #[serde(rename = "type", default = "role_tag")]
    pub type_tag: String,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Role {
    /// Creates a new role with a generated identity URI.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: format!("urn:role:{}", Uuid::new_v4()),
            type_tag: role_tag(),
            audit: Audit::default(),
            name: Some(name.into()),
            description: None,
            permissions: None,
        }
    }

    /// Sets a specific identity URI (useful for updates and testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = Some(permissions);
        self
    }
}

impl TypeTagged for Role {
    const ENTITY_TYPE: &'static str = "Role";

    fn type_tag(&self) -> &str {
        &self.type_tag
    }
}

impl Validate for Role {
    fn validation_error(&self) -> Option<ValidationError> {
        if let Err(error) = self.verify_type_tag() {
            return Some(error);
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Some(ValidationError::EmptyRoleName);
            }
        }
        if let Some(permissions) = &self.permissions {
            if permissions.iter().any(|p| p.trim().is_empty()) {
                return Some(ValidationError::EmptyPermission);
            }
        }
        None
    }
}

impl Entity for Role {
    fn id(&self) -> &str {
        &self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn merge(&self, incoming: &Self) -> Result<Self> {
        merge_roles(self, incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_valid() {
        let user = User::new("alice").with_email("alice@example.com");
        assert!(user.is_valid());
        assert!(!user.is_invalid());
        assert_eq!(user.type_tag(), "User");
        assert!(user.id.starts_with("urn:user:"));
    }

    #[test]
    fn test_new_role_is_valid() {
        let role = Role::new("admins").with_permissions(vec!["users:write".to_string()]);
        assert!(role.is_valid());
        assert!(!role.is_invalid());
        assert_eq!(role.type_tag(), "Role");
        assert!(role.id.starts_with("urn:role:"));
    }

    #[test]
    fn test_is_invalid_mirrors_is_valid_for_every_kind() {
        let valid_user = User::new("alice");
        let mut invalid_user = User::new("bob");
        invalid_user.type_tag = "Role".to_string();
        assert_eq!(valid_user.is_invalid(), !valid_user.is_valid());
        assert_eq!(invalid_user.is_invalid(), !invalid_user.is_valid());

        let valid_role = Role::new("admins");
        let mut invalid_role = Role::new("ops");
        invalid_role.name = Some("  ".to_string());
        assert_eq!(valid_role.is_invalid(), !valid_role.is_valid());
        assert_eq!(invalid_role.is_invalid(), !invalid_role.is_valid());
    }

    #[test]
    fn test_user_with_foreign_type_tag_is_invalid() {
        let mut user = User::new("alice");
        user.type_tag = "Role".to_string();

        let error = user.validation_error().unwrap();
        assert_eq!(
            error.to_string(),
            "Unexpected type: Role. Expected type: User"
        );
    }

    #[test]
    fn test_user_with_malformed_email_is_invalid() {
        let user = User::new("alice").with_email("not-an-address");
        assert_eq!(
            user.validation_error(),
            Some(ValidationError::InvalidEmail("not-an-address".to_string()))
        );
    }

    #[test]
    fn test_role_with_blank_permission_is_invalid() {
        let role = Role::new("ops").with_permissions(vec!["users:read".to_string(), " ".to_string()]);
        assert_eq!(
            role.validation_error(),
            Some(ValidationError::EmptyPermission)
        );
    }

    #[test]
    fn test_user_wire_format_uses_reserved_type_field() {
        let user = User::new("alice")
            .with_id("urn:user:u1")
            .with_email("alice@example.com");
        let json = serde_json::to_string(&user).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "User");
        assert_eq!(value["id"], "urn:user:u1");
        assert_eq!(value["userName"], "alice");
        // Unset audit fields stay off the wire entirely.
        assert!(value.get("created").is_none());
        assert!(value.get("modifiedBy").is_none());
    }

    #[test]
    fn test_user_deserializes_without_type_field() {
        let user: User = serde_json::from_str(r#"{"id":"urn:user:u1"}"#).unwrap();
        assert_eq!(user.type_tag(), "User");
        assert!(user.is_valid());
    }

    #[test]
    fn test_user_deserializes_empty_strings_as_unset() {
        let user: User =
            serde_json::from_str(r#"{"id":"urn:user:u1","userName":"","email":""}"#).unwrap();
        assert_eq!(user.user_name, None);
        assert_eq!(user.email, None);
    }

    #[test]
    fn test_role_round_trips_through_json() {
        let role = Role::new("admins")
            .with_id("urn:role:r1")
            .with_description("Administrators")
            .with_permissions(vec!["users:write".to_string()]);
        let json = serde_json::to_string(&role).unwrap();
        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, role);
    }
}
