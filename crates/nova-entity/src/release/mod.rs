//! Release domain entities.

pub mod model;
pub mod status;
pub mod version;

pub use model::Release;
pub use status::ReleaseStatus;
pub use version::{normalize_version, version_key};
