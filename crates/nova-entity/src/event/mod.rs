//! Release event log entities.

pub mod asset;
pub mod model;
pub mod tag;

pub use asset::{AssetUploaded, AssetUploading};
pub use model::{ReleaseEvent, ReleaseEventKind};
pub use tag::{RejectedTag, Rejection, ReleaseTag};
