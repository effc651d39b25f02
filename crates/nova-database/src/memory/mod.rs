//! Process-local implementations of the persistence ports.
//!
//! State lives behind a `tokio::sync::Mutex`, so each call observes and
//! mutates a consistent snapshot. Nothing is durable.

pub mod notification;
pub mod project;
pub mod release;

pub use notification::MemoryNotificationStore;
pub use project::MemoryProjectDirectory;
pub use release::MemoryReleaseStore;
