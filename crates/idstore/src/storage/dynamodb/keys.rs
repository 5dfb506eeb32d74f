//! DynamoDB key generation functions.
//!
//! Pure functions for the single-table layout. All functions are sync and
//! have no side effects.

/// Generate the partition key for an entity.
///
/// Pattern: `{TAG}#{id}`, e.g. `USER#urn:user:1234`.
pub fn entity_pk(entity_type: &str, id: &str) -> String {
    format!("{}#{id}", entity_type.to_uppercase())
}

/// Generate the sort key for an entity.
///
/// Pattern: same as the partition key (items are single-row).
pub fn entity_sk(entity_type: &str, id: &str) -> String {
    entity_pk(entity_type, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_pk_uppercases_the_tag() {
        assert_eq!(
            entity_pk("User", "urn:user:u1"),
            "USER#urn:user:u1"
        );
        assert_eq!(
            entity_pk("Role", "urn:role:r1"),
            "ROLE#urn:role:r1"
        );
    }

    #[test]
    fn test_entity_sk_matches_pk() {
        assert_eq!(
            entity_sk("User", "urn:user:u1"),
            entity_pk("User", "urn:user:u1")
        );
    }
}
