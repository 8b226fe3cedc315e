//! Command implementations for the statemap CLI.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use sm_core::{
    BacklogItem, BacklogStatus, Category, Component, ComponentStatus, EvidenceKind, FixedClock,
    Impact, MemoryStore, Probability, RiskEntry, Snapshot,
};
use sm_reports::{render, ReportKind, ReportOptions};
use tracing::info;

/// Loads a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    Ok(snapshot)
}

/// Renders a report and writes it to `out`, or stdout when `out` is `None`.
pub fn run_report(
    snapshot_path: &Path,
    kind: ReportKind,
    top_n: Option<usize>,
    out: Option<&Path>,
) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let options = ReportOptions {
        backlog_top_n: top_n,
    };
    let markdown = render(kind, &snapshot, &options);

    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, &markdown)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(kind = %kind, path = %path.display(), "report written");
            println!("{} {}", "Wrote:".green().bold(), path.display());
        }
        None => print!("{}", markdown),
    }
    Ok(())
}

/// Validates a snapshot file: invariant violations are hard failures,
/// dangling references are warnings. Returns `true` when the snapshot is
/// free of hard violations.
pub fn run_validate(snapshot_path: &Path) -> Result<bool> {
    let snapshot = load_snapshot(snapshot_path)?;

    let violations = snapshot.invariant_violations();
    let warnings = snapshot.dangling_references();

    for violation in &violations {
        println!("{} {}", "violation:".red().bold(), violation);
    }
    for warning in &warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    if violations.is_empty() && warnings.is_empty() {
        println!("{}", "Snapshot is consistent.".green());
    }
    Ok(violations.is_empty())
}

/// Writes a small seeded snapshot, or prints it when `out` is `None`.
pub fn run_demo(out: Option<&Path>) -> Result<()> {
    let snapshot = demo_snapshot()?;
    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;

    match out {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} {}", "Wrote:".green().bold(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Builds the demo inventory: a few classified components, a scored
/// backlog, and an open risk, all at a fixed instant so the output is
/// reproducible.
pub fn demo_snapshot() -> Result<Snapshot> {
    use chrono::TimeZone;
    let clock = FixedClock(
        chrono::Utc
            .with_ymd_and_hms(2026, 1, 15, 9, 0, 0)
            .single()
            .context("invalid demo timestamp")?,
    );
    let mut store = MemoryStore::new();

    let checkout = store.insert_component(Component::new(
        "checkout flow",
        Category::Feature,
        "payments team",
        clock.0,
    ))?;
    let checkout_ev = store.record_evidence(
        checkout,
        EvidenceKind::Link,
        "checkout SLO dashboard",
        "https://grafana.example.com/d/checkout",
        "alice",
        &clock,
    )?;
    store.classify(
        checkout,
        ComponentStatus::Working,
        &[checkout_ev],
        "alice",
        &clock,
    )?;

    let exports = store.insert_component(Component::new(
        "nightly exports",
        Category::Integration,
        "data platform",
        clock.0,
    ))?;
    let exports_ev = store.record_evidence(
        exports,
        EvidenceKind::Log,
        "export job failures",
        "3 of 7 runs failed with timeout in the last week",
        "bob",
        &clock,
    )?;
    store.classify(
        exports,
        ComponentStatus::Degraded,
        &[exports_ev],
        "bob",
        &clock,
    )?;

    store.insert_component(Component::new(
        "staging",
        Category::Environment,
        "platform",
        clock.0,
    ))?;

    let mut fix_exports = BacklogItem::new(
        "Mitigate export timeouts",
        "Raise job timeout and add retry with backoff",
        8,
        5,
        3,
        4,
        clock.0,
    )?;
    fix_exports.status = BacklogStatus::Accepted;
    fix_exports.component_ids.push(exports);
    let fix_exports = store.insert_backlog_item(fix_exports);

    store.insert_backlog_item(BacklogItem::new(
        "Document staging deploy method",
        "Staging deploy steps live in one engineer's head",
        3,
        2,
        2,
        1,
        clock.0,
    )?);

    let mut export_risk = RiskEntry::new(
        "exports silently stop feeding the warehouse",
        Probability::Medium,
        Impact::High,
        "alerting on export job completion",
        "data platform",
        clock.0,
    );
    export_risk.component_ids.push(exports);
    export_risk.backlog_ids.push(fix_exports);
    store.insert_risk(export_risk);

    Ok(store.snapshot(clock.0))
}
