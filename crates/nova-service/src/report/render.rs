//! HTML rendering of a release report.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use nova_core::types::id::AssetId;
use nova_entity::event::{ReleaseEvent, ReleaseEventKind};
use nova_entity::project::Project;
use nova_entity::release::{Release, ReleaseStatus};

use super::messages::Messages;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Size in megabytes, two decimals.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}

fn status_badge(status: ReleaseStatus) -> String {
    format!(
        "<span class=\"badge\" style=\"color:{}\">{}</span>",
        status.color(),
        status
    )
}

fn format_date(at: DateTime<Utc>, messages: &Messages) -> String {
    at.format(messages.date_format).to_string()
}

/// Render the full report document.
///
/// `asset_sizes` holds the measured size of stored assets; assets missing
/// from it are shown with their recorded upload size.
pub fn render_report(
    project: &Project,
    release: &Release,
    asset_sizes: &HashMap<AssetId, u64>,
    messages: &Messages,
) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{name} {version}</title>\n<style>\n\
         body {{ font-family: sans-serif; margin: 2em; }}\n\
         .badge {{ font-weight: bold; font-size: 20px; }}\n\
         .event {{ border-bottom: 1px solid #ddd; padding: 0.5em 0; }}\n\
         .logo {{ max-height: 64px; }}\n\
         </style>\n</head>\n<body>\n",
        lang = messages.locale,
        name = escape_html(&project.name),
        version = escape_html(&release.version),
    );

    let _ = write!(
        html,
        "<header>\n<img class=\"logo\" src=\"{logo}\" alt=\"\">\n<h1>{name}</h1>\n<h2>{version}</h2>\n\
         <p>{created_label}: {created}</p>\n<p>{badge}</p>\n<h3>{notes_label}</h3>\n<p>{notes}</p>\n</header>\n",
        logo = escape_html(&project.logo_url),
        name = escape_html(&project.name),
        version = escape_html(&release.version),
        created_label = messages.creation_date,
        created = format_date(release.created_at, messages),
        badge = status_badge(release.status),
        notes_label = messages.notes,
        notes = escape_html(&release.notes),
    );

    let _ = writeln!(html, "<section>\n<h3>{}</h3>", messages.history);
    if release.events.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", messages.no_events);
    }
    for event in &release.events {
        render_event(&mut html, event, asset_sizes, messages);
    }
    html.push_str("</section>\n</body>\n</html>\n");
    html
}

fn render_event(
    html: &mut String,
    event: &ReleaseEvent,
    asset_sizes: &HashMap<AssetId, u64>,
    messages: &Messages,
) {
    let status = event.status();
    let _ = write!(
        html,
        "<div class=\"event\">\n{}<br>\n{}<br>\n",
        status_badge(status),
        format_date(event.occurred_at, messages)
    );

    match &event.kind {
        ReleaseEventKind::AssetUploading(upload) => {
            if let Some(comment) = messages.status_comment(status) {
                let _ = writeln!(html, "{comment}<br>");
            }
            for (index, asset) in upload.assets.iter().enumerate() {
                let size = asset_sizes
                    .get(&asset.id)
                    .copied()
                    .unwrap_or_else(|| asset.size_bytes.max(0) as u64);
                let _ = writeln!(html, "- Asset #{} {}<br>", index + 1, format_megabytes(size));
            }
            if let Some(comment) = &upload.comment {
                let _ = writeln!(html, "<em>{}</em><br>", escape_html(comment));
            }
        }
        ReleaseEventKind::Rejected(rejection) => {
            let _ = writeln!(html, "{}<br>", escape_html(&rejection.reasons));
            for tag in &rejection.tags {
                let _ = writeln!(
                    html,
                    "<span style=\"color:{}\">{}</span><br>",
                    tag.tag.color(),
                    tag.tag
                );
                if let Some(comment) = &tag.comment {
                    let _ = writeln!(html, "{}<br>", escape_html(comment));
                }
            }
        }
        ReleaseEventKind::Standard { .. } => {
            if let Some(comment) = messages.status_comment(status) {
                let _ = writeln!(html, "{comment}<br>");
            }
        }
    }
    html.push_str("</div>\n");
}
