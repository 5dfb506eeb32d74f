use async_trait::async_trait;

use crate::identity::ValidationError;

use super::types::{Audit, ScanMarker, ScanPage};
use super::Result;

/// Per-entity self-check.
pub trait Validate {
    /// Returns the rule violation, if any. `None` means the entity is valid.
    fn validation_error(&self) -> Option<ValidationError>;

    /// True when [`Validate::validation_error`] returns `None`.
    fn is_valid(&self) -> bool {
        self.validation_error().is_none()
    }

    /// Always the negation of [`Validate::is_valid`].
    fn is_invalid(&self) -> bool {
        !self.is_valid()
    }
}

/// Runtime type discriminator for polymorphic payloads.
pub trait TypeTagged {
    /// Canonical tag for this entity kind.
    const ENTITY_TYPE: &'static str;

    /// The tag as carried by this value (the wire `"type"` field).
    fn type_tag(&self) -> &str;

    /// Fails when the carried tag does not name this entity kind.
    ///
    /// Deserialization paths call this before a decoded value propagates,
    /// so a payload tagged `"Role"` can never masquerade as a `User`.
    fn verify_type_tag(&self) -> Result<(), ValidationError> {
        expect_type_tag(Self::ENTITY_TYPE, self.type_tag())
    }
}

/// Compares a candidate type tag against the expected one.
///
/// The single definition of the tag check; trait impls and store adapters
/// all route through here.
pub fn expect_type_tag(
    expected: &'static str,
    candidate: &str,
) -> Result<(), ValidationError> {
    if candidate == expected {
        Ok(())
    } else {
        Err(ValidationError::UnexpectedType {
            expected,
            candidate: candidate.to_string(),
        })
    }
}

/// The common shape of every storable entity.
///
/// Merge is monomorphic: a `User` merges with a `User`, a `Role` with a
/// `Role`. Merging across kinds is not representable.
pub trait Entity: Validate + TypeTagged + Clone + Send + Sync + Sized {
    /// Stable identity URI. Never recomputed after creation.
    fn id(&self) -> &str;

    /// Audit trail, stamped by the access service on persist.
    fn audit(&self) -> &Audit;

    fn audit_mut(&mut self) -> &mut Audit;

    /// Combines this stored revision with an incoming update into a new
    /// revision.
    ///
    /// Deterministic: no clock reads, no randomness. `created` is always
    /// preserved from `self`, and fields unset in `incoming` retain this
    /// revision's values. Fails only when the two identities differ, which
    /// is a caller error rather than a condition to recover from.
    fn merge(&self, incoming: &Self) -> Result<Self>;
}

/// Key-value store boundary consumed by the access service.
///
/// Implementations provide per-key atomicity only; the access layer adds no
/// locking, timeouts, or retries on top, and transient store failures
/// propagate as [`super::AccessError::StoreUnavailable`].
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Looks up an entity by identity.
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// Writes an entity revision, replacing any stored one.
    async fn put(&self, item: &T) -> Result<()>;

    /// Returns one bounded page of entities of this kind.
    ///
    /// `start` is the marker from the previous page, or `None` for the
    /// first call. The marker must round-trip unaltered between a page and
    /// the next call.
    async fn scan_page(&self, start: Option<&ScanMarker>) -> Result<ScanPage<T>>;
}
