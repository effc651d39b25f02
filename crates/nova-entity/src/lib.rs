//! # nova-entity
//!
//! Domain entity models for Nova. Every struct in this crate represents a
//! persisted row (or an aggregate of rows) or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`; row-shaped
//! entities additionally derive `sqlx::FromRow`.

pub mod event;
pub mod notification;
pub mod project;
pub mod release;
