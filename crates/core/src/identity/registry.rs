//! Tag-based dispatch for polymorphic JSON payloads.
//!
//! Stored entities share one wire envelope whose reserved `"type"` field
//! names the concrete kind. Decoding consults an explicit registry of
//! tag-to-decoder mappings; payloads with an unregistered tag are rejected
//! rather than guessed at.

use std::collections::HashMap;

use serde_json::Value;

use crate::access::{AccessError, Result, TypeTagged};

use super::types::{Role, User};

/// A stored entity of any registered kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyEntity {
    User(User),
    Role(Role),
}

impl AnyEntity {
    /// The identity URI of the wrapped entity.
    pub fn id(&self) -> &str {
        match self {
            AnyEntity::User(user) => &user.id,
            AnyEntity::Role(role) => &role.id,
        }
    }

    /// The type tag of the wrapped entity.
    pub fn type_tag(&self) -> &str {
        match self {
            AnyEntity::User(user) => user.type_tag(),
            AnyEntity::Role(role) => role.type_tag(),
        }
    }
}

/// Decodes one JSON payload into its concrete entity kind.
type Decoder = fn(Value) -> Result<AnyEntity>;

/// Maps wire type tags to decoders.
pub struct TagRegistry {
    decoders: HashMap<&'static str, Decoder>,
}

impl TagRegistry {
    /// An empty registry. Use [`TagRegistry::default`] for one with the
    /// built-in kinds registered.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registers a decoder for a tag, replacing any previous one.
    pub fn register(&mut self, tag: &'static str, decoder: Decoder) {
        self.decoders.insert(tag, decoder);
    }

    /// Decodes a JSON string by its `"type"` field.
    pub fn decode_str(&self, json: &str) -> Result<AnyEntity> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| AccessError::Serialization(e.to_string()))?;
        self.decode_value(value)
    }

    /// Decodes a JSON value by its `"type"` field.
    pub fn decode_value(&self, value: Value) -> Result<AnyEntity> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AccessError::Serialization("payload has no \"type\" field".to_string())
            })?;
        let decoder = self
            .decoders
            .get(tag)
            .ok_or_else(|| AccessError::UnknownType(tag.to_string()))?;
        decoder(value)
    }
}

impl Default for TagRegistry {
    /// A registry with the built-in kinds (`User`, `Role`) registered.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(User::ENTITY_TYPE, decode_user);
        registry.register(Role::ENTITY_TYPE, decode_role);
        registry
    }
}

fn decode_user(value: Value) -> Result<AnyEntity> {
    let user: User =
        serde_json::from_value(value).map_err(|e| AccessError::Serialization(e.to_string()))?;
    user.verify_type_tag()?;
    Ok(AnyEntity::User(user))
}

fn decode_role(value: Value) -> Result<AnyEntity> {
    let role: Role =
        serde_json::from_value(value).map_err(|e| AccessError::Serialization(e.to_string()))?;
    role.verify_type_tag()?;
    Ok(AnyEntity::Role(role))
}
