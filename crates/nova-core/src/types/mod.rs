//! Core type definitions used across the Nova workspace.

pub mod id;

pub use id::*;
