//! Developer Specification renderer.
//!
//! Implementation-facing detail: per-component evidence trails with
//! timestamps and reverse-resolved backlog/risk links, full WSJF sub-score
//! breakdowns, and per-risk mitigation detail. Deterministic for a given
//! snapshot.

use sm_core::{rank_backlog, rank_risks, Snapshot};

use crate::md;

/// Renders the Developer Specification for the given snapshot.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    out.push_str("# Developer Specification\n\n");
    out.push_str(&format!("Generated: {}\n\n", snapshot.taken_at.to_rfc3339()));

    component_details(snapshot, &mut out);
    backlog_detail(snapshot, &mut out);
    risk_detail(snapshot, &mut out);

    out
}

fn component_details(snapshot: &Snapshot, out: &mut String) {
    out.push_str("## Component Details\n\n");
    if snapshot.components.is_empty() {
        out.push_str("None recorded.\n\n");
        return;
    }

    let mut components: Vec<_> = snapshot.components.iter().collect();
    components.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    for c in components {
        out.push_str(&format!("### {}\n\n", c.name));
        out.push_str(&format!("- Category: {}\n", c.category));
        out.push_str(&format!("- Status: {}\n", c.status()));
        out.push_str(&format!("- Owner: {}\n", c.owner));
        if !c.description.is_empty() {
            out.push_str(&format!("- Description: {}\n", c.description));
        }

        out.push_str("- Evidence:\n");
        if c.evidence.is_empty() {
            out.push_str("  - none\n");
        }
        for ev_id in &c.evidence {
            match snapshot.evidence(*ev_id) {
                Some(ev) => out.push_str(&format!(
                    "  - {} ({}, {} by {})\n",
                    md::evidence_inline(snapshot, *ev_id),
                    ev.kind,
                    ev.created_at.to_rfc3339(),
                    ev.created_by,
                )),
                None => out.push_str(&format!(
                    "  - {}\n",
                    sm_core::ReferenceWarning::missing_marker(*ev_id)
                )),
            }
        }

        // Backlog and risk links point at components, so resolve in reverse.
        let backlog_links: Vec<String> = snapshot
            .backlog
            .iter()
            .filter(|b| b.component_ids.contains(&c.id))
            .map(|b| format!("{} (`{}`)", b.title, b.id))
            .collect();
        out.push_str(&format!("- Linked backlog: {}\n", md::join_or_dash(backlog_links)));

        let risk_links: Vec<String> = snapshot
            .risks
            .iter()
            .filter(|r| r.component_ids.contains(&c.id))
            .map(|r| format!("{} (`{}`)", r.description, r.id))
            .collect();
        out.push_str(&format!("- Linked risks: {}\n\n", md::join_or_dash(risk_links)));
    }
}

fn backlog_detail(snapshot: &Snapshot, out: &mut String) {
    out.push_str("## Backlog Detail\n\n");
    if snapshot.backlog.is_empty() {
        out.push_str("None recorded.\n\n");
        return;
    }

    for item in rank_backlog(&snapshot.backlog) {
        out.push_str(&format!("### {}\n\n", item.title));
        if !item.description.is_empty() {
            out.push_str(&format!("{}\n\n", item.description));
        }
        out.push_str(&format!("- Status: {}\n", item.status));
        out.push_str(&format!("- Business value: {}\n", item.business_value));
        out.push_str(&format!("- Time criticality: {}\n", item.time_criticality));
        out.push_str(&format!("- Risk reduction: {}\n", item.risk_reduction));
        out.push_str(&format!("- Job size: {}\n", item.job_size));
        out.push_str(&format!("- WSJF: {:.2}\n", item.wsjf));

        let components: Vec<String> = item
            .component_ids
            .iter()
            .map(|id| md::component_inline(snapshot, *id))
            .collect();
        out.push_str(&format!("- Components: {}\n", md::join_or_dash(components)));

        let risks: Vec<String> = item
            .risk_ids
            .iter()
            .map(|id| md::risk_inline(snapshot, *id))
            .collect();
        out.push_str(&format!("- Risks: {}\n\n", md::join_or_dash(risks)));
    }
}

fn risk_detail(snapshot: &Snapshot, out: &mut String) {
    out.push_str("## Risk Detail\n\n");
    if snapshot.risks.is_empty() {
        out.push_str("None recorded.\n");
        return;
    }

    for risk in rank_risks(&snapshot.risks) {
        out.push_str(&format!("### {}\n\n", risk.description));
        out.push_str(&format!(
            "- Assessment: {} probability, {} impact, severity {}\n",
            risk.probability, risk.impact, risk.severity
        ));
        out.push_str(&format!("- Status: {}\n", risk.status));
        out.push_str(&format!("- Owner: {}\n", risk.owner));
        let mitigation = if risk.mitigation.is_empty() {
            "none recorded"
        } else {
            &risk.mitigation
        };
        out.push_str(&format!("- Mitigation: {}\n", mitigation));

        let components: Vec<String> = risk
            .component_ids
            .iter()
            .map(|id| md::component_inline(snapshot, *id))
            .collect();
        out.push_str(&format!("- Components: {}\n", md::join_or_dash(components)));

        let backlog: Vec<String> = risk
            .backlog_ids
            .iter()
            .map(|id| md::backlog_inline(snapshot, *id))
            .collect();
        out.push_str(&format!("- Backlog: {}\n\n", md::join_or_dash(backlog)));
    }
}
