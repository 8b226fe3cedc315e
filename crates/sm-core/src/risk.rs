//! Risk register: probability × impact severity and deterministic ranking.
//!
//! Severity is a fixed lookup over the 3×3 probability/impact grid. An
//! extreme on either axis dominates, so High paired with anything below
//! Medium still lands at High, and only High×High reaches Critical.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::backlog::BacklogItem;
use crate::error::ReferenceWarning;

/// Probability that a risk materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Probability {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Probability::Low => "Low",
            Probability::Medium => "Medium",
            Probability::High => "High",
        })
    }
}

/// Impact if the risk materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Impact::Low => "Low",
            Impact::Medium => "Medium",
            Impact::High => "High",
        })
    }
}

/// Derived risk severity. Ordering is ascending, so `Ord` sorts Critical
/// last; ranking reverses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        })
    }
}

/// Fixed severity lookup over the probability × impact grid.
pub fn severity(probability: Probability, impact: Impact) -> Severity {
    use Impact as I;
    use Probability as P;
    match (probability, impact) {
        (P::Low, I::Low) => Severity::Low,
        (P::Low, I::Medium) | (P::Medium, I::Low) | (P::Medium, I::Medium) => Severity::Medium,
        (P::High, I::High) => Severity::Critical,
        // Any remaining pair involves a High on one axis.
        _ => Severity::High,
    }
}

/// Lifecycle status of a risk entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    /// Identified, no mitigation applied yet.
    Open,
    /// Mitigation in place.
    Mitigated,
    /// Consciously accepted without mitigation.
    Accepted,
    /// No longer relevant.
    Closed,
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RiskStatus::Open => "Open",
            RiskStatus::Mitigated => "Mitigated",
            RiskStatus::Accepted => "Accepted",
            RiskStatus::Closed => "Closed",
        })
    }
}

/// An entry in the risk register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// What could go wrong.
    pub description: String,
    /// How likely it is.
    pub probability: Probability,
    /// How bad it would be.
    pub impact: Impact,
    /// Derived severity; always consistent with probability and impact.
    pub severity: Severity,
    /// Planned or applied mitigation.
    pub mitigation: String,
    /// Who owns this risk.
    pub owner: String,
    /// Lifecycle status.
    pub status: RiskStatus,
    /// Components this risk affects (by id; may dangle).
    pub component_ids: Vec<Uuid>,
    /// Backlog items mitigating this risk (by id; may dangle).
    pub backlog_ids: Vec<Uuid>,
    /// When the risk was identified. First tie-breaker for ranking.
    pub created_at: DateTime<Utc>,
}

impl RiskEntry {
    /// Creates a new open risk with derived severity.
    pub fn new(
        description: impl Into<String>,
        probability: Probability,
        impact: Impact,
        mitigation: impl Into<String>,
        owner: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            probability,
            impact,
            severity: severity(probability, impact),
            mitigation: mitigation.into(),
            owner: owner.into(),
            status: RiskStatus::Open,
            component_ids: Vec::new(),
            backlog_ids: Vec::new(),
            created_at: now,
        }
    }

    /// Updates probability and impact together, recomputing severity.
    pub fn reassess(&mut self, probability: Probability, impact: Impact) {
        self.probability = probability;
        self.impact = impact;
        self.severity = severity(probability, impact);
    }

    /// Closes the risk.
    ///
    /// If any linked backlog item in `linked_backlog` is still open and its
    /// title names pending mitigation work, a warning is returned for each
    /// offender. The close itself always goes through; the check is advisory.
    pub fn close(&mut self, linked_backlog: &[&BacklogItem]) -> Vec<ReferenceWarning> {
        let mut warnings = Vec::new();
        for item in linked_backlog {
            if self.backlog_ids.contains(&item.id)
                && item.status.is_open()
                && item.title.to_lowercase().contains("mitigat")
            {
                let warning = ReferenceWarning::OpenMitigation {
                    risk_id: self.id,
                    backlog_id: item.id,
                    title: item.title.clone(),
                };
                warn!(risk = %self.id, backlog = %item.id, title = %item.title,
                    "closing risk with open mitigation work");
                warnings.push(warning);
            }
        }
        self.status = RiskStatus::Closed;
        warnings
    }
}

/// Ranks risks by descending severity, then earliest creation timestamp,
/// then id. Total and deterministic.
pub fn rank_risks(risks: &[RiskEntry]) -> Vec<&RiskEntry> {
    let mut ranked: Vec<&RiskEntry> = risks.iter().collect();
    ranked.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backlog::BacklogStatus;
    use chrono::Duration;

    #[test]
    fn test_severity_grid_fixed_points() {
        assert_eq!(severity(Probability::High, Impact::High), Severity::Critical);
        assert_eq!(severity(Probability::Low, Impact::Low), Severity::Low);
        assert_eq!(severity(Probability::Medium, Impact::High), Severity::High);
        assert_eq!(severity(Probability::High, Impact::Medium), Severity::High);
    }

    #[test]
    fn test_severity_grid_remaining_cells() {
        assert_eq!(severity(Probability::Low, Impact::Medium), Severity::Medium);
        assert_eq!(severity(Probability::Medium, Impact::Low), Severity::Medium);
        assert_eq!(severity(Probability::Medium, Impact::Medium), Severity::Medium);
        assert_eq!(severity(Probability::Low, Impact::High), Severity::High);
        assert_eq!(severity(Probability::High, Impact::Low), Severity::High);
    }

    #[test]
    fn test_rank_by_severity_then_age() {
        let t0 = Utc::now();
        let low = RiskEntry::new("stale docs", Probability::Low, Impact::Low, "", "docs", t0);
        let high = RiskEntry::new(
            "primary db single point of failure",
            Probability::High,
            Impact::Medium,
            "add a replica",
            "dba",
            t0,
        );
        let critical_old = RiskEntry::new(
            "no backups",
            Probability::High,
            Impact::High,
            "nightly snapshots",
            "ops",
            t0,
        );
        let critical_new = RiskEntry::new(
            "secrets in repo",
            Probability::High,
            Impact::High,
            "rotate and vault",
            "security",
            t0 + Duration::minutes(5),
        );

        let risks = vec![
            low.clone(),
            critical_new.clone(),
            high.clone(),
            critical_old.clone(),
        ];
        let ids: Vec<Uuid> = rank_risks(&risks).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![critical_old.id, critical_new.id, high.id, low.id]);
    }

    #[test]
    fn test_reassess_recomputes_severity() {
        let mut r = RiskEntry::new("flaky ci", Probability::Low, Impact::Low, "", "ci", Utc::now());
        assert_eq!(r.severity, Severity::Low);
        r.reassess(Probability::High, Impact::High);
        assert_eq!(r.severity, Severity::Critical);
    }

    #[test]
    fn test_close_warns_on_open_mitigation_but_closes() {
        let now = Utc::now();
        let mut item =
            BacklogItem::new("Mitigate backup gap", "", 5, 5, 5, 2, now).unwrap();
        item.status = BacklogStatus::InProgress;

        let mut risk = RiskEntry::new(
            "no backups",
            Probability::High,
            Impact::High,
            "nightly snapshots",
            "ops",
            now,
        );
        risk.backlog_ids.push(item.id);

        let warnings = risk.close(&[&item]);

        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            ReferenceWarning::OpenMitigation { .. }
        ));
        assert_eq!(risk.status, RiskStatus::Closed);
    }

    #[test]
    fn test_close_silent_when_work_done() {
        let now = Utc::now();
        let mut item = BacklogItem::new("Mitigate backup gap", "", 5, 5, 5, 2, now).unwrap();
        item.status = BacklogStatus::Done;

        let mut risk = RiskEntry::new(
            "no backups",
            Probability::High,
            Impact::High,
            "nightly snapshots",
            "ops",
            now,
        );
        risk.backlog_ids.push(item.id);

        assert!(risk.close(&[&item]).is_empty());
        assert_eq!(risk.status, RiskStatus::Closed);
    }
}
