//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! entities, plus the continuation-marker codec. These are testable in
//! isolation without DynamoDB access.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

use idstore_core::access::{expect_type_tag, AccessError, Entity, ScanMarker};

use super::keys;

// ============================================================================
// Attribute names
// ============================================================================

pub const ATTR_PK: &str = "PK";
pub const ATTR_SK: &str = "SK";
pub const ATTR_ENTITY_TYPE: &str = "entityType";
pub const ATTR_ID: &str = "id";
pub const ATTR_DOCUMENT: &str = "document";

// ============================================================================
// Entity conversions
// ============================================================================

/// Convert an entity to a DynamoDB item.
///
/// The full entity JSON is carried in the `document` attribute; key
/// attributes and the type tag are duplicated alongside it for lookups and
/// filtered scans.
pub fn entity_to_item<T>(entity: &T) -> Result<HashMap<String, AttributeValue>, AccessError>
where
    T: Entity + Serialize,
{
    let document =
        serde_json::to_string(entity).map_err(|e| AccessError::Serialization(e.to_string()))?;

    let mut item = HashMap::new();
    item.insert(
        ATTR_PK.to_string(),
        AttributeValue::S(keys::entity_pk(T::ENTITY_TYPE, entity.id())),
    );
    item.insert(
        ATTR_SK.to_string(),
        AttributeValue::S(keys::entity_sk(T::ENTITY_TYPE, entity.id())),
    );
    item.insert(
        ATTR_ENTITY_TYPE.to_string(),
        AttributeValue::S(T::ENTITY_TYPE.to_string()),
    );
    item.insert(
        ATTR_ID.to_string(),
        AttributeValue::S(entity.id().to_string()),
    );
    item.insert(ATTR_DOCUMENT.to_string(), AttributeValue::S(document));

    Ok(item)
}

/// Convert a DynamoDB item to an entity.
///
/// Verifies the stored `entityType` attribute against the expected kind
/// before decoding, so a mistagged item fails fast instead of producing a
/// mistyped entity.
pub fn item_to_entity<T>(item: &HashMap<String, AttributeValue>) -> Result<T, AccessError>
where
    T: Entity + DeserializeOwned,
{
    let tag = get_string(item, ATTR_ENTITY_TYPE)?;
    expect_type_tag(T::ENTITY_TYPE, &tag)?;

    let document = get_string(item, ATTR_DOCUMENT)?;
    serde_json::from_str(&document).map_err(|e| AccessError::Serialization(e.to_string()))
}

/// Get a required string attribute.
fn get_string(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, AccessError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| AccessError::Serialization(format!("Missing or invalid attribute: {key}")))
}

// ============================================================================
// Continuation-marker codec
// ============================================================================

/// Encode a DynamoDB `LastEvaluatedKey` as an opaque continuation marker.
///
/// Key attributes in this table are all strings; they are carried as a
/// sorted JSON object and base64-encoded, so a marker round-trips
/// byte-for-byte between a scan response and the next request.
pub fn encode_start_key(
    key: &HashMap<String, AttributeValue>,
) -> Result<ScanMarker, AccessError> {
    let mut attrs = BTreeMap::new();
    for (name, value) in key {
        let s = value.as_s().map_err(|_| {
            AccessError::Serialization(format!("Non-string key attribute: {name}"))
        })?;
        attrs.insert(name.clone(), s.clone());
    }
    let json =
        serde_json::to_string(&attrs).map_err(|e| AccessError::Serialization(e.to_string()))?;
    Ok(ScanMarker::new(URL_SAFE_NO_PAD.encode(json)))
}

/// Decode a continuation marker back into a DynamoDB `ExclusiveStartKey`.
pub fn decode_start_key(
    marker: &ScanMarker,
) -> Result<HashMap<String, AttributeValue>, AccessError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(marker.as_str())
        .map_err(|_| AccessError::Serialization("Malformed continuation marker".to_string()))?;
    let attrs: BTreeMap<String, String> = serde_json::from_slice(&bytes)
        .map_err(|_| AccessError::Serialization("Malformed continuation marker".to_string()))?;
    Ok(attrs
        .into_iter()
        .map(|(name, value)| (name, AttributeValue::S(value)))
        .collect())
}

#[cfg(test)]
mod tests {
    use idstore_core::identity::{Role, User};

    use super::*;

    fn sample_user() -> User {
        User::new("alice")
            .with_id("urn:user:550e8400-e29b-41d4-a716-446655440001")
            .with_email("alice@example.com")
            .with_roles(vec!["urn:role:readers".to_string()])
    }

    #[test]
    fn test_user_item_has_correct_keys() {
        let user = sample_user();
        let item = entity_to_item(&user).unwrap();

        assert_eq!(
            item.get(ATTR_PK).unwrap().as_s().unwrap(),
            "USER#urn:user:550e8400-e29b-41d4-a716-446655440001"
        );
        assert_eq!(
            item.get(ATTR_SK).unwrap().as_s().unwrap(),
            "USER#urn:user:550e8400-e29b-41d4-a716-446655440001"
        );
        assert_eq!(item.get(ATTR_ENTITY_TYPE).unwrap().as_s().unwrap(), "User");
        assert_eq!(
            item.get(ATTR_ID).unwrap().as_s().unwrap(),
            "urn:user:550e8400-e29b-41d4-a716-446655440001"
        );
    }

    #[test]
    fn test_user_round_trip() {
        let user = sample_user();
        let item = entity_to_item(&user).unwrap();
        let parsed: User = item_to_entity(&item).unwrap();
        assert_eq!(parsed, user);
    }

    #[test]
    fn test_role_round_trip() {
        let role = Role::new("admins")
            .with_id("urn:role:r1")
            .with_permissions(vec!["users:write".to_string()]);
        let item = entity_to_item(&role).unwrap();
        let parsed: Role = item_to_entity(&item).unwrap();
        assert_eq!(parsed, role);
    }

    #[test]
    fn test_item_with_foreign_tag_is_rejected() {
        let role = Role::new("admins").with_id("urn:role:r1");
        let item = entity_to_item(&role).unwrap();

        let error = item_to_entity::<User>(&item).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unexpected type: Role. Expected type: User"
        );
    }

    #[test]
    fn test_item_without_document_is_rejected() {
        let user = sample_user();
        let mut item = entity_to_item(&user).unwrap();
        item.remove(ATTR_DOCUMENT);

        let error = item_to_entity::<User>(&item).unwrap_err();
        assert!(matches!(error, AccessError::Serialization(_)));
    }

    #[test]
    fn test_marker_round_trips_byte_for_byte() {
        let mut key = HashMap::new();
        key.insert(
            ATTR_PK.to_string(),
            AttributeValue::S("USER#urn:user:u9".to_string()),
        );
        key.insert(
            ATTR_SK.to_string(),
            AttributeValue::S("USER#urn:user:u9".to_string()),
        );

        let marker = encode_start_key(&key).unwrap();
        let decoded = decode_start_key(&marker).unwrap();
        let reencoded = encode_start_key(&decoded).unwrap();

        assert_eq!(reencoded.as_str(), marker.as_str());
        assert_eq!(
            decoded.get(ATTR_PK).unwrap().as_s().unwrap(),
            "USER#urn:user:u9"
        );
    }

    #[test]
    fn test_malformed_marker_is_rejected() {
        let error = decode_start_key(&ScanMarker::new("not-base64!!")).unwrap_err();
        assert_eq!(
            error,
            AccessError::Serialization("Malformed continuation marker".to_string())
        );
    }

    #[test]
    fn test_non_string_key_attribute_is_rejected() {
        let mut key = HashMap::new();
        key.insert("version".to_string(), AttributeValue::N("3".to_string()));

        let error = encode_start_key(&key).unwrap_err();
        assert!(matches!(error, AccessError::Serialization(_)));
    }
}
