//! # nova-cli
//!
//! Administration commands for Nova. Every release operation of the core
//! is reachable from here against the configured backend.

pub mod app;
pub mod commands;
pub mod output;

pub use app::App;
pub use commands::{Cli, Commands};
