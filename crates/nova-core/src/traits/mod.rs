//! Core traits defined in `nova-core` and implemented by other crates.

pub mod storage;

pub use storage::{StorageObjectMeta, StorageProvider};
