//! Storage backend implementations.
//!
//! This module provides concrete implementations of the
//! [`idstore_core::access::EntityStore`] trait. Backends are selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): ordered-map store for testing and local
//!   development
//! - `dynamodb`: AWS DynamoDB single-table store using `aws-sdk-dynamodb`
//!
//! Both backends page scans with opaque continuation markers, so callers
//! drive enumeration the same way against either.

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb'. \
    Example: cargo build -p idstore --features inmemory"
);

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryDirectory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbDirectory;
