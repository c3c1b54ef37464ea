//! Kindred Storage - Storage backends for the ancestry graph
//!
//! This crate provides backends that serve the engine's read contract
//! ([`kindred_core::AncestryReader`]) and the write side used to populate
//! them.

#![allow(clippy::result_large_err)]

pub mod dataset;
pub mod error;
pub mod traits;

#[cfg(feature = "redb")]
pub mod redb;

pub mod memory;

pub use dataset::{Dataset, DATASET_VERSION};
pub use error::{StorageError, StorageResult};
pub use traits::StorageBackend;

#[cfg(feature = "redb")]
pub use redb::RedbStorage;

pub use memory::MemoryStorage;
