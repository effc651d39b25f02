//! Workflow tests running the full service stack on in-memory stores.

mod authorization_test;
mod concurrency_test;
mod helpers;
mod lifecycle_test;
mod notification_test;
mod promotion_test;
mod report_test;
