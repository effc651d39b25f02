//! Release report generation.

pub mod generator;
pub mod messages;
pub mod naming;
pub mod render;

pub use generator::{ReportHandle, ReportService, delete_version_reports};
pub use messages::Messages;
