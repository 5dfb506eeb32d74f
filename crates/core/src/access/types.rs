use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit trail shared by every stored entity.
///
/// All fields are unset until the entity is first persisted. The access
/// service stamps `created` once and `modified`/`modifiedBy` on every
/// successful write; merge never takes `created` from an incoming revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(
        rename = "modifiedBy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub modified_by: Option<String>,
}

/// Opaque continuation token for incremental scans.
///
/// Produced by a store adapter and consumed verbatim by the next scan call.
/// The encoded form is adapter-specific; callers never construct or inspect
/// one, they only hand it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanMarker(String);

impl ScanMarker {
    /// Wraps an adapter-encoded token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The encoded token, byte-for-byte as the store adapter produced it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One bounded page of a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPage<T> {
    /// Entities in store scan order. Order across pages is not stable when
    /// the data set mutates between calls.
    pub items: Vec<T>,
    /// Where the next page starts; `None` on the final page.
    pub next_marker: Option<ScanMarker>,
    /// Whether a subsequent scan would yield at least one more entity.
    pub has_more: bool,
}

impl<T> ScanPage<T> {
    /// A page with more results behind it.
    pub fn partial(items: Vec<T>, next_marker: ScanMarker) -> Self {
        Self {
            items,
            next_marker: Some(next_marker),
            has_more: true,
        }
    }

    /// The final page of a scan. Carries no marker.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_marker: None,
            has_more: false,
        }
    }
}
