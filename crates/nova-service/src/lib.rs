//! # nova-service
//!
//! Release lifecycle services for Nova. The [`ReleaseService`] drives the
//! status state machine, [`NotificationFanout`] informs project
//! participants, and [`ReportService`] renders release reports.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod lock;
pub mod notification;
pub mod release;
pub mod report;

pub use context::RequestContext;
pub use lock::LockRegistry;
pub use notification::{NotificationFanout, NotificationService};
pub use release::ReleaseService;
pub use report::ReportService;
