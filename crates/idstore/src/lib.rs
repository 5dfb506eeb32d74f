//! Store backends for the idstore identity data layer.
//!
//! The contracts — entity shapes, validation, merge semantics, and the
//! generic [`idstore_core::access::AccessService`] — live in
//! [`idstore_core`]. This crate supplies the
//! [`idstore_core::access::EntityStore`] implementations behind feature
//! flags; see [`storage`] for the available backends.

pub mod storage;
