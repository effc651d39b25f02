//! PostgreSQL implementations of the persistence ports.

pub mod notification;
pub mod project;
pub mod release;

pub use notification::NotificationRepository;
pub use project::ProjectRepository;
pub use release::ReleaseRepository;
