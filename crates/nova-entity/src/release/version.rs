//! Release version display form.
//!
//! Versions are stored as `"v. <number>"`. The part after the prefix is the
//! version key, used to name files derived from the release.

/// Display prefix carried by every stored version.
pub const VERSION_PREFIX: &str = "v. ";

/// Normalize a raw version to its display form.
///
/// A leading `v.` is dropped before the prefix is applied, so `"1.0"`,
/// `"v.1.0"` and `"v. 1.0"` all become `"v. 1.0"`.
pub fn normalize_version(raw: &str) -> String {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix("v.").unwrap_or(trimmed).trim_start();
    format!("{VERSION_PREFIX}{bare}")
}

/// Strip the display prefix from a stored version.
pub fn version_key(version: &str) -> &str {
    version.strip_prefix(VERSION_PREFIX).unwrap_or(version)
}
