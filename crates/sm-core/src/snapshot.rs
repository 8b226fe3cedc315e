//! Read-only snapshots of the full inventory state.
//!
//! A snapshot is what the report synthesizer consumes: a consistent view of
//! all four entity kinds taken at a known instant. Cross-references between
//! entities are resolved lazily against the snapshot's id lookups, so a
//! reference to a deleted entity simply fails to resolve instead of
//! breaking rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backlog::BacklogItem;
use crate::component::{Component, ComponentStatus};
use crate::error::{ReferenceWarning, ValidationError};
use crate::evidence::Evidence;
use crate::risk::RiskEntry;

/// A consistent, read-only view of the inventory at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was taken. Report output embeds this timestamp,
    /// never a live clock, so rendering stays deterministic.
    pub taken_at: DateTime<Utc>,
    /// All components.
    pub components: Vec<Component>,
    /// All evidence records.
    pub evidence: Vec<Evidence>,
    /// All backlog items.
    pub backlog: Vec<BacklogItem>,
    /// All risk entries.
    pub risks: Vec<RiskEntry>,
}

impl Snapshot {
    /// Looks up a component by id.
    pub fn component(&self, id: Uuid) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Looks up an evidence record by id.
    pub fn evidence(&self, id: Uuid) -> Option<&Evidence> {
        self.evidence.iter().find(|e| e.id == id)
    }

    /// Looks up a backlog item by id.
    pub fn backlog_item(&self, id: Uuid) -> Option<&BacklogItem> {
        self.backlog.iter().find(|b| b.id == id)
    }

    /// Looks up a risk entry by id.
    pub fn risk(&self, id: Uuid) -> Option<&RiskEntry> {
        self.risks.iter().find(|r| r.id == id)
    }

    /// Checks the snapshot's hard invariants.
    ///
    /// Returns one error per violation: a component classified away from
    /// `Unknown` with no evidence references, a stored WSJF score that
    /// disagrees with its sub-scores, or a stored risk severity that
    /// disagrees with its probability and impact. Stale derived values can
    /// only enter through an out-of-band edit of a persisted snapshot; the
    /// engine itself recomputes them inside every mutation.
    pub fn invariant_violations(&self) -> Vec<ValidationError> {
        let mut violations = Vec::new();
        for component in &self.components {
            if component.status() != ComponentStatus::Unknown && component.evidence.is_empty() {
                violations.push(ValidationError::MissingEvidence {
                    status: component.status().to_string(),
                });
            }
        }
        for item in &self.backlog {
            match crate::backlog::wsjf_score(
                item.business_value,
                item.time_criticality,
                item.risk_reduction,
                item.job_size,
            ) {
                Err(err) => violations.push(err),
                Ok(score) => {
                    if score.total_cmp(&item.wsjf) != std::cmp::Ordering::Equal {
                        violations.push(ValidationError::StaleDerived {
                            field: "WSJF score",
                            id: item.id,
                        });
                    }
                }
            }
        }
        for risk in &self.risks {
            if crate::risk::severity(risk.probability, risk.impact) != risk.severity {
                violations.push(ValidationError::StaleDerived {
                    field: "severity",
                    id: risk.id,
                });
            }
        }
        violations
    }

    /// Scans every cross-reference and reports the ones that no longer
    /// resolve. Never fails; dangling ids are warnings by design.
    pub fn dangling_references(&self) -> Vec<ReferenceWarning> {
        let mut warnings = Vec::new();
        for component in &self.components {
            for ev_id in &component.evidence {
                if self.evidence(*ev_id).is_none() {
                    warnings.push(ReferenceWarning::DanglingReference {
                        from: component.id,
                        kind: "evidence",
                        missing: *ev_id,
                    });
                }
            }
        }
        for item in &self.backlog {
            for comp_id in &item.component_ids {
                if self.component(*comp_id).is_none() {
                    warnings.push(ReferenceWarning::DanglingReference {
                        from: item.id,
                        kind: "component",
                        missing: *comp_id,
                    });
                }
            }
            for risk_id in &item.risk_ids {
                if self.risk(*risk_id).is_none() {
                    warnings.push(ReferenceWarning::DanglingReference {
                        from: item.id,
                        kind: "risk",
                        missing: *risk_id,
                    });
                }
            }
        }
        for risk in &self.risks {
            for comp_id in &risk.component_ids {
                if self.component(*comp_id).is_none() {
                    warnings.push(ReferenceWarning::DanglingReference {
                        from: risk.id,
                        kind: "component",
                        missing: *comp_id,
                    });
                }
            }
            for backlog_id in &risk.backlog_ids {
                if self.backlog_item(*backlog_id).is_none() {
                    warnings.push(ReferenceWarning::DanglingReference {
                        from: risk.id,
                        kind: "backlog item",
                        missing: *backlog_id,
                    });
                }
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Category;
    use crate::evidence::EvidenceKind;
    use crate::risk::{Impact, Probability};

    fn empty_snapshot() -> Snapshot {
        Snapshot {
            taken_at: Utc::now(),
            components: Vec::new(),
            evidence: Vec::new(),
            backlog: Vec::new(),
            risks: Vec::new(),
        }
    }

    #[test]
    fn test_lookups_resolve() {
        let now = Utc::now();
        let component = Component::new("checkout", Category::Feature, "payments", now);
        let ev = Evidence::new(
            component.id,
            EvidenceKind::Link,
            "dashboard",
            "https://example.com",
            "alice",
            now,
        );
        let item = BacklogItem::new("fix flaky retries", "", 5, 3, 2, 2, now).unwrap();
        let risk = RiskEntry::new("no backups", Probability::High, Impact::High, "", "ops", now);

        let snapshot = Snapshot {
            taken_at: now,
            components: vec![component.clone()],
            evidence: vec![ev.clone()],
            backlog: vec![item.clone()],
            risks: vec![risk.clone()],
        };

        assert!(snapshot.component(component.id).is_some());
        assert!(snapshot.evidence(ev.id).is_some());
        assert!(snapshot.backlog_item(item.id).is_some());
        assert!(snapshot.risk(risk.id).is_some());
        assert!(snapshot.component(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_dangling_evidence_reported() {
        let now = Utc::now();
        let mut component = Component::new("checkout", Category::Feature, "payments", now);
        let ghost = Uuid::new_v4();
        component.evidence.push(ghost);

        let mut snapshot = empty_snapshot();
        snapshot.components.push(component);

        let warnings = snapshot.dangling_references();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            ReferenceWarning::DanglingReference {
                kind: "evidence",
                missing,
                ..
            } if missing == ghost
        ));
    }

    #[test]
    fn test_invariant_violation_detected() {
        let now = Utc::now();
        let mut component = Component::new("checkout", Category::Feature, "payments", now);
        // Force an inconsistent state the engine itself would reject: a
        // history entry without evidence backing.
        component.history.push(crate::component::StatusChange {
            from: ComponentStatus::Unknown,
            to: ComponentStatus::Working,
            at: now,
            actor: "alice".to_string(),
        });

        let mut snapshot = empty_snapshot();
        snapshot.components.push(component);

        let violations = snapshot.invariant_violations();
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0],
            ValidationError::MissingEvidence { .. }
        ));
    }

    #[test]
    fn test_stale_stored_wsjf_detected() {
        let now = Utc::now();
        let mut item = BacklogItem::new("fix exports", "", 8, 5, 3, 4, now).unwrap();
        // An out-of-band edit of a persisted snapshot: sub-scores say 4.0.
        item.wsjf = 999.0;
        let item_id = item.id;

        let mut snapshot = empty_snapshot();
        snapshot.backlog.push(item);

        let violations = snapshot.invariant_violations();
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0],
            ValidationError::StaleDerived {
                field: "WSJF score",
                id,
            } if id == item_id
        ));
    }

    #[test]
    fn test_stale_stored_severity_detected() {
        let now = Utc::now();
        let mut risk =
            RiskEntry::new("no backups", Probability::High, Impact::High, "", "ops", now);
        risk.severity = crate::risk::Severity::Low;
        let risk_id = risk.id;

        let mut snapshot = empty_snapshot();
        snapshot.risks.push(risk);

        let violations = snapshot.invariant_violations();
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0],
            ValidationError::StaleDerived {
                field: "severity",
                id,
            } if id == risk_id
        ));
    }

    #[test]
    fn test_consistent_derived_values_pass() {
        let now = Utc::now();
        let mut snapshot = empty_snapshot();
        snapshot
            .backlog
            .push(BacklogItem::new("fix exports", "", 8, 5, 3, 4, now).unwrap());
        snapshot.risks.push(RiskEntry::new(
            "no backups",
            Probability::Medium,
            Impact::High,
            "",
            "ops",
            now,
        ));

        assert!(snapshot.invariant_violations().is_empty());
    }

    #[test]
    fn test_clean_snapshot_has_no_findings() {
        let snapshot = empty_snapshot();
        assert!(snapshot.invariant_violations().is_empty());
        assert!(snapshot.dangling_references().is_empty());
    }
}
