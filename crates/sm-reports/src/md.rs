//! Small Markdown building blocks shared by both report renderers.

use sm_core::{EvidenceKind, ReferenceWarning, Snapshot};
use uuid::Uuid;

/// Makes arbitrary text safe inside a table cell: newlines collapse to
/// spaces and pipes are escaped so a title cannot break the row.
fn cell(text: &str) -> String {
    text.replace(['\r', '\n'], " ").replace('|', "\\|")
}

/// Renders a Markdown table from headers and rows.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str("| ");
    out.push_str(&headers.join(" | "));
    out.push_str(" |\n| ");
    out.push_str(&vec!["---"; headers.len()].join(" | "));
    out.push_str(" |\n");
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");
    }
    out
}

/// Renders one evidence reference inline.
///
/// Link evidence becomes a Markdown link; notes and logs show their title
/// with the kind in parentheses. A reference that no longer resolves
/// renders as a `[missing: <id>]` marker instead of failing the report.
pub fn evidence_inline(snapshot: &Snapshot, id: Uuid) -> String {
    match snapshot.evidence(id) {
        Some(ev) => match ev.kind {
            EvidenceKind::Link => format!("[{}]({})", ev.title, ev.content),
            EvidenceKind::Note | EvidenceKind::Log => format!("{} ({})", ev.title, ev.kind),
        },
        None => ReferenceWarning::missing_marker(id),
    }
}

/// Renders a component reference as its name, or a missing marker.
pub fn component_inline(snapshot: &Snapshot, id: Uuid) -> String {
    match snapshot.component(id) {
        Some(c) => c.name.clone(),
        None => ReferenceWarning::missing_marker(id),
    }
}

/// Renders a backlog item reference as its title, or a missing marker.
pub fn backlog_inline(snapshot: &Snapshot, id: Uuid) -> String {
    match snapshot.backlog_item(id) {
        Some(b) => b.title.clone(),
        None => ReferenceWarning::missing_marker(id),
    }
}

/// Renders a risk reference as its description, or a missing marker.
pub fn risk_inline(snapshot: &Snapshot, id: Uuid) -> String {
    match snapshot.risk(id) {
        Some(r) => r.description.clone(),
        None => ReferenceWarning::missing_marker(id),
    }
}

/// Joins inline renderings with commas, or a placeholder when empty.
pub fn join_or_dash(parts: Vec<String>) -> String {
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}
