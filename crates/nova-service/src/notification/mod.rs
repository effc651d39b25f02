//! Notification fan-out and the per-user notification inbox.

pub mod fanout;
pub mod service;

pub use fanout::NotificationFanout;
pub use service::NotificationService;
