//! DynamoDB storage backend implementation.
//!
//! Single-table layout: every entity is one item whose partition and sort
//! keys are derived from its type tag and identity, with the full entity
//! JSON carried in a document attribute. Scans are filtered by the
//! `entityType` attribute and paged with DynamoDB's native
//! `LastEvaluatedKey`, re-encoded as an opaque continuation marker.

mod conversions;
mod directory;
mod error;
mod keys;

pub use directory::{DynamoDbDirectory, DEFAULT_PAGE_SIZE};
