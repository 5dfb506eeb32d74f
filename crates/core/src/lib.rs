//! Core contracts for the idstore identity data layer.
//!
//! This crate is the pure contract layer: entity shapes, validation, merge
//! semantics, the generic access service, and the scan/pagination types.
//! Store backends implementing [`access::EntityStore`] live in the `idstore`
//! crate.

pub mod access;
pub mod identity;
pub mod serde;
