//! # nova-core
//!
//! Core crate for Nova. Contains the unified error system, typed
//! identifiers, configuration schemas, and the storage provider trait.
//!
//! This crate has **no** internal dependencies on other Nova crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
