//! # sm-reports
//!
//! Report synthesis for statemap: renders a read-only
//! [`Snapshot`](sm_core::Snapshot) into one of two Markdown deliverables,
//! the Business Requirements Document (BRD) or the Developer Specification
//! (DevSpec).
//!
//! Rendering is pure and deterministic: identical snapshot in, identical
//! bytes out. Dangling cross-references never fail a render; they surface
//! inline as `[missing: <id>]` markers.

use serde::{Deserialize, Serialize};
use sm_core::Snapshot;
use tracing::debug;

pub mod brd;
pub mod devspec;
mod md;

/// Which deliverable to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Business Requirements Document: stakeholder-facing summary.
    Brd,
    /// Developer Specification: implementation-facing detail.
    DevSpec,
}

impl ReportKind {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Brd => "brd",
            ReportKind::DevSpec => "devspec",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "brd" => Ok(ReportKind::Brd),
            "devspec" => Ok(ReportKind::DevSpec),
            _ => Err(format!("unknown report kind: {}", s)),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Truncate the BRD's Backlog Priorities section to the top N entries.
    /// `None` shows the full ranked backlog.
    pub backlog_top_n: Option<usize>,
}

/// Renders the requested report over the snapshot.
pub fn render(kind: ReportKind, snapshot: &Snapshot, options: &ReportOptions) -> String {
    debug!(%kind, components = snapshot.components.len(), "rendering report");
    match kind {
        ReportKind::Brd => brd::render(snapshot, options),
        ReportKind::DevSpec => devspec::render(snapshot),
    }
}
