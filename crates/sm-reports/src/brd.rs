//! Business Requirements Document renderer.
//!
//! Section order is fixed: Executive Summary, Component Inventory, Risk
//! Register, Backlog Priorities, Open Questions. Rendering is a pure
//! function of the snapshot, so an unchanged snapshot produces
//! byte-identical output.

use sm_core::{rank_backlog, rank_risks, Category, ComponentStatus, Snapshot};

use crate::md;
use crate::ReportOptions;

/// Renders the BRD for the given snapshot.
pub fn render(snapshot: &Snapshot, options: &ReportOptions) -> String {
    let mut out = String::new();
    out.push_str("# Business Requirements Document\n\n");
    out.push_str(&format!("Generated: {}\n\n", snapshot.taken_at.to_rfc3339()));

    executive_summary(snapshot, &mut out);
    component_inventory(snapshot, &mut out);
    risk_register(snapshot, &mut out);
    backlog_priorities(snapshot, options, &mut out);
    open_questions(snapshot, &mut out);

    out
}

fn executive_summary(snapshot: &Snapshot, out: &mut String) {
    out.push_str("## Executive Summary\n\n");
    let rows: Vec<Vec<String>> = ComponentStatus::all()
        .iter()
        .map(|status| {
            let count = snapshot
                .components
                .iter()
                .filter(|c| c.status() == *status)
                .count();
            vec![status.to_string(), count.to_string()]
        })
        .collect();
    out.push_str(&md::table(&["Status", "Components"], &rows));
    out.push('\n');
}

fn component_inventory(snapshot: &Snapshot, out: &mut String) {
    out.push_str("## Component Inventory\n\n");
    for category in Category::all() {
        out.push_str(&format!("### {}\n\n", category.heading()));
        let mut members: Vec<_> = snapshot
            .components
            .iter()
            .filter(|c| c.category == *category)
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        if members.is_empty() {
            out.push_str("None recorded.\n\n");
            continue;
        }
        let rows: Vec<Vec<String>> = members
            .iter()
            .map(|c| {
                let links = c
                    .evidence
                    .iter()
                    .map(|id| md::evidence_inline(snapshot, *id))
                    .collect();
                vec![
                    c.name.clone(),
                    c.status().to_string(),
                    c.owner.clone(),
                    md::join_or_dash(links),
                ]
            })
            .collect();
        out.push_str(&md::table(&["Component", "Status", "Owner", "Evidence"], &rows));
        out.push('\n');
    }
}

fn risk_register(snapshot: &Snapshot, out: &mut String) {
    out.push_str("## Risk Register\n\n");
    if snapshot.risks.is_empty() {
        out.push_str("None recorded.\n\n");
        return;
    }
    let rows: Vec<Vec<String>> = rank_risks(&snapshot.risks)
        .iter()
        .map(|r| {
            vec![
                r.description.clone(),
                r.probability.to_string(),
                r.impact.to_string(),
                r.severity.to_string(),
                r.status.to_string(),
                r.owner.clone(),
            ]
        })
        .collect();
    out.push_str(&md::table(
        &["Risk", "Probability", "Impact", "Severity", "Status", "Owner"],
        &rows,
    ));
    out.push('\n');
}

fn backlog_priorities(snapshot: &Snapshot, options: &ReportOptions, out: &mut String) {
    out.push_str("## Backlog Priorities\n\n");
    if snapshot.backlog.is_empty() {
        out.push_str("None recorded.\n\n");
        return;
    }
    let ranked = rank_backlog(&snapshot.backlog);
    let shown = match options.backlog_top_n {
        Some(n) => &ranked[..n.min(ranked.len())],
        None => &ranked[..],
    };
    let rows: Vec<Vec<String>> = shown
        .iter()
        .enumerate()
        .map(|(rank, item)| {
            vec![
                (rank + 1).to_string(),
                item.title.clone(),
                format!("{:.2}", item.wsjf),
                item.status.to_string(),
            ]
        })
        .collect();
    out.push_str(&md::table(&["Rank", "Title", "WSJF", "Status"], &rows));
    out.push('\n');
}

fn open_questions(snapshot: &Snapshot, out: &mut String) {
    out.push_str("## Open Questions\n\n");
    let mut unknown: Vec<_> = snapshot
        .components
        .iter()
        .filter(|c| c.status() == ComponentStatus::Unknown)
        .collect();
    unknown.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    if unknown.is_empty() {
        out.push_str("No components are awaiting classification.\n");
        return;
    }
    for c in unknown {
        out.push_str(&format!(
            "- {} ({}): status unknown, evidence needed\n",
            c.name, c.category
        ));
    }
}
