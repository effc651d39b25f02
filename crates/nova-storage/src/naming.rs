//! File name sanitisation shared by asset and report paths.

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// Leading dots are replaced too, so the result never names a hidden file
/// or a parent directory.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let dots = out.len() - out.trim_start_matches('.').len();
    out.replace_range(..dots, &"_".repeat(dots));
    if out.is_empty() {
        out.push('_');
    }
    out
}
