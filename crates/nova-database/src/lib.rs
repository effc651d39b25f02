//! # nova-database
//!
//! Persistence ports for releases, notifications, and project membership,
//! with PostgreSQL implementations on `sqlx` and in-memory implementations
//! selected by `database.provider`.

pub mod backend;
pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use backend::Stores;
pub use connection::DatabasePool;
pub use store::{NotificationStore, ProjectDirectory, ReleaseStore, TransitionCommit, UploadReview};
