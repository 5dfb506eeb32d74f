//! Field-level merge of stored and incoming entity revisions.
//!
//! Pure functions with no side effects: no clock reads, no randomness, so
//! the same two revisions always merge to the same result. Merge is applied
//! pairwise (stored, then incoming) by the access service before a write.

use crate::access::{AccessError, Audit, Entity, Result};

use super::types::{Role, User};

/// Combines audit trails. Creation is pinned to the stored revision; the
/// mutation pair follows the incoming revision when present.
fn merge_audit(stored: &Audit, incoming: &Audit) -> Audit {
    Audit {
        created: stored.created,
        modified: incoming.modified.or(stored.modified),
        modified_by: incoming
            .modified_by
            .clone()
            .or_else(|| stored.modified_by.clone()),
    }
}

fn check_same_identity<T: Entity>(stored: &T, incoming: &T) -> Result<()> {
    if stored.id() != incoming.id() {
        return Err(AccessError::IdentityMismatch {
            ours: stored.id().to_string(),
            theirs: incoming.id().to_string(),
        });
    }
    Ok(())
}

/// Merges two revisions of the same user. Fields unset in `incoming` retain
/// the stored values.
pub fn merge_users(stored: &User, incoming: &User) -> Result<User> {
    check_same_identity(stored, incoming)?;
    Ok(User {
        id: stored.id.clone(),
        type_tag: stored.type_tag.clone(),
        audit: merge_audit(&stored.audit, &incoming.audit),
        user_name: incoming
            .user_name
            .clone()
            .or_else(|| stored.user_name.clone()),
        email: incoming.email.clone().or_else(|| stored.email.clone()),
        roles: incoming.roles.clone().or_else(|| stored.roles.clone()),
        active: incoming.active.or(stored.active),
    })
}

/// Merges two revisions of the same role. Fields unset in `incoming` retain
/// the stored values.
pub fn merge_roles(stored: &Role, incoming: &Role) -> Result<Role> {
    check_same_identity(stored, incoming)?;
    Ok(Role {
        id: stored.id.clone(),
        type_tag: stored.type_tag.clone(),
        audit: merge_audit(&stored.audit, &incoming.audit),
        name: incoming.name.clone().or_else(|| stored.name.clone()),
        description: incoming
            .description
            .clone()
            .or_else(|| stored.description.clone()),
        permissions: incoming
            .permissions
            .clone()
            .or_else(|| stored.permissions.clone()),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn stored_user() -> User {
        let mut user = User::new("alice")
            .with_id("urn:user:u1")
            .with_email("alice@example.com")
            .with_roles(vec!["urn:role:readers".to_string()]);
        user.audit = Audit {
            created: Some(timestamp("2024-01-15T10:30:00Z")),
            modified: Some(timestamp("2024-01-15T10:30:00Z")),
            modified_by: Some("urn:user:admin".to_string()),
        };
        user
    }

    #[test]
    fn test_merge_preserves_stored_created() {
        let stored = stored_user();
        let mut incoming = User::new("alice").with_id("urn:user:u1");
        incoming.audit.created = Some(timestamp("2025-06-01T00:00:00Z"));
        incoming.audit.modified = Some(timestamp("2025-06-01T00:00:00Z"));
        incoming.audit.modified_by = Some("urn:user:operator".to_string());

        let merged = merge_users(&stored, &incoming).unwrap();

        assert_eq!(merged.audit.created, stored.audit.created);
        assert_eq!(merged.audit.modified, incoming.audit.modified);
        assert_eq!(merged.audit.modified_by, incoming.audit.modified_by);
    }

    #[test]
    fn test_merge_retains_stored_values_for_unset_fields() {
        let stored = stored_user();
        let mut incoming = User::new("renamed").with_id("urn:user:u1");
        incoming.email = None;
        incoming.roles = None;

        let merged = merge_users(&stored, &incoming).unwrap();

        assert_eq!(merged.user_name.as_deref(), Some("renamed"));
        assert_eq!(merged.email.as_deref(), Some("alice@example.com"));
        assert_eq!(merged.roles, stored.roles);
    }

    #[test]
    fn test_merge_takes_incoming_values_when_set() {
        let stored = stored_user();
        let incoming = User::new("alice")
            .with_id("urn:user:u1")
            .with_email("alice@corp.example.com")
            .with_active(false);

        let merged = merge_users(&stored, &incoming).unwrap();

        assert_eq!(merged.email.as_deref(), Some("alice@corp.example.com"));
        assert_eq!(merged.active, Some(false));
    }

    #[test]
    fn test_merge_is_deterministic() {
        let stored = stored_user();
        let incoming = User::new("renamed").with_id("urn:user:u1");

        let first = merge_users(&stored, &incoming).unwrap();
        let second = merge_users(&stored, &incoming).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_rejects_differing_identities() {
        let stored = stored_user();
        let incoming = User::new("mallory").with_id("urn:user:u2");

        let error = merge_users(&stored, &incoming).unwrap_err();
        assert_eq!(
            error,
            AccessError::IdentityMismatch {
                ours: "urn:user:u1".to_string(),
                theirs: "urn:user:u2".to_string(),
            }
        );
    }

    #[test]
    fn test_merge_roles_keeps_stored_permissions_when_unset() {
        let mut stored = Role::new("admins")
            .with_id("urn:role:r1")
            .with_permissions(vec!["users:write".to_string()]);
        stored.audit.created = Some(timestamp("2024-01-15T10:30:00Z"));

        let incoming = Role::new("admins")
            .with_id("urn:role:r1")
            .with_description("Administrators");

        let merged = merge_roles(&stored, &incoming).unwrap();

        assert_eq!(merged.audit.created, stored.audit.created);
        assert_eq!(merged.description.as_deref(), Some("Administrators"));
        assert_eq!(merged.permissions, stored.permissions);
    }
}
