//! Report file naming.
//!
//! A report is named
//! `{project}_{version key}_{release id}_{status}_{last event millis}.html`.
//! The name changes whenever the status or the log does, which is what
//! makes a stored report detectably stale. Sanitizing can map two version
//! keys to the same text, so the release id keeps names of different
//! releases apart.

use nova_core::types::id::ReleaseId;
use nova_entity::release::{Release, ReleaseStatus};
use nova_storage::naming::sanitize_file_name;

/// Extension of rendered reports.
pub const REPORT_EXTENSION: &str = ".html";

/// Name prefix shared by every report of one release version.
pub fn report_prefix(project_name: &str, version_key: &str, release_id: ReleaseId) -> String {
    format!(
        "{}_{}_{release_id}_",
        sanitize_file_name(project_name),
        sanitize_file_name(version_key)
    )
}

/// Canonical report name for the release's current state.
pub fn report_name(project_name: &str, release: &Release) -> String {
    format!(
        "{}{}_{}{REPORT_EXTENSION}",
        report_prefix(project_name, release.version_key(), release.id),
        release.status,
        release.last_event_millis()
    )
}

/// Whether `name` is a report of the version identified by `prefix`.
pub fn is_report_of(name: &str, prefix: &str) -> bool {
    let Some(rest) = name
        .strip_prefix(prefix)
        .and_then(|r| r.strip_suffix(REPORT_EXTENSION))
    else {
        return false;
    };
    let Some((status, millis)) = rest.split_once('_') else {
        return false;
    };
    status.parse::<ReleaseStatus>().is_ok() && millis.parse::<i64>().is_ok()
}
