//! # nova-storage
//!
//! Byte storage for release assets and rendered reports. A single
//! [`StorageProvider`](nova_core::traits::StorageProvider) backs both; the
//! [`AssetStore`] and [`ReportStore`] scope it to their own directories.

pub mod assets;
pub mod manager;
pub mod naming;
pub mod providers;
pub mod reports;

pub use assets::AssetStore;
pub use manager::StorageManager;
pub use reports::ReportStore;
