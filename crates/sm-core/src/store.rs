//! Collaborator seams: timestamp source and an in-memory entity store.
//!
//! The engine itself is stateless and pure; persistence and clocks are
//! collaborator concerns. [`MemoryStore`] is a HashMap-backed stand-in for
//! the real persistence layer, used by the CLI, demos, and tests. It
//! enforces the same single-writer-per-entity discipline trivially by
//! taking `&mut self` on every mutation.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::backlog::BacklogItem;
use crate::component::{Component, ComponentStatus};
use crate::error::{ReferenceWarning, ValidationError};
use crate::evidence::{Evidence, EvidenceKind};
use crate::risk::RiskEntry;
use crate::snapshot::Snapshot;

/// Timestamp source handed to the engine by the caller.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, for deterministic tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// An in-memory entity store over the four top-level entity kinds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    components: HashMap<Uuid, Component>,
    evidence: HashMap<Uuid, Evidence>,
    backlog: HashMap<Uuid, BacklogItem>,
    risks: HashMap<Uuid, RiskEntry>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a component, rejecting duplicate names.
    pub fn insert_component(&mut self, component: Component) -> Result<Uuid, ValidationError> {
        if self.components.values().any(|c| c.name == component.name) {
            return Err(ValidationError::DuplicateName {
                name: component.name,
            });
        }
        let id = component.id;
        self.components.insert(id, component);
        Ok(id)
    }

    /// Inserts a backlog item.
    pub fn insert_backlog_item(&mut self, item: BacklogItem) -> Uuid {
        let id = item.id;
        self.backlog.insert(id, item);
        id
    }

    /// Inserts a risk entry.
    pub fn insert_risk(&mut self, risk: RiskEntry) -> Uuid {
        let id = risk.id;
        self.risks.insert(id, risk);
        id
    }

    /// Fetches a component by id.
    pub fn component(&self, id: Uuid) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Fetches a backlog item by id.
    pub fn backlog_item(&self, id: Uuid) -> Option<&BacklogItem> {
        self.backlog.get(&id)
    }

    /// Fetches a risk entry by id.
    pub fn risk(&self, id: Uuid) -> Option<&RiskEntry> {
        self.risks.get(&id)
    }

    /// Fetches an evidence record by id.
    pub fn evidence(&self, id: Uuid) -> Option<&Evidence> {
        self.evidence.get(&id)
    }

    /// Lists components matching a filter.
    pub fn components_where(&self, filter: impl Fn(&Component) -> bool) -> Vec<&Component> {
        let mut matched: Vec<&Component> = self.components.values().filter(|c| filter(c)).collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        matched
    }

    /// Records a new immutable evidence record against an existing entity
    /// (component or risk) and returns its id.
    pub fn record_evidence(
        &mut self,
        entity_id: Uuid,
        kind: EvidenceKind,
        title: impl Into<String>,
        content: impl Into<String>,
        created_by: &str,
        clock: &dyn Clock,
    ) -> Result<Uuid, ValidationError> {
        if !self.components.contains_key(&entity_id) && !self.risks.contains_key(&entity_id) {
            return Err(ValidationError::EntityNotFound {
                kind: "entity",
                id: entity_id,
            });
        }
        let ev = Evidence::new(entity_id, kind, title, content, created_by, clock.now());
        let id = ev.id;
        self.evidence.insert(id, ev);
        Ok(id)
    }

    /// Classifies a component, resolving cited evidence ids through the
    /// store. Validation (including ownership of every cited record) runs
    /// before the component is touched.
    pub fn classify(
        &mut self,
        component_id: Uuid,
        to: ComponentStatus,
        evidence_ids: &[Uuid],
        actor: &str,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        let mut refs = Vec::with_capacity(evidence_ids.len());
        for ev_id in evidence_ids {
            let ev = self
                .evidence
                .get(ev_id)
                .ok_or(ValidationError::EntityNotFound {
                    kind: "evidence",
                    id: *ev_id,
                })?;
            refs.push(ev.clone());
        }
        let component =
            self.components
                .get_mut(&component_id)
                .ok_or(ValidationError::EntityNotFound {
                    kind: "component",
                    id: component_id,
                })?;
        let borrowed: Vec<&Evidence> = refs.iter().collect();
        component.classify(to, &borrowed, actor, clock.now())
    }

    /// Replaces a backlog item's sub-scores in one validated update.
    pub fn set_backlog_scores(
        &mut self,
        item_id: Uuid,
        business_value: u32,
        time_criticality: u32,
        risk_reduction: u32,
        job_size: u32,
    ) -> Result<(), ValidationError> {
        let item = self
            .backlog
            .get_mut(&item_id)
            .ok_or(ValidationError::EntityNotFound {
                kind: "backlog item",
                id: item_id,
            })?;
        item.set_scores(business_value, time_criticality, risk_reduction, job_size)
    }

    /// Closes a risk, running the advisory open-mitigation check against
    /// the items it links.
    pub fn close_risk(&mut self, risk_id: Uuid) -> Result<Vec<ReferenceWarning>, ValidationError> {
        let linked: Vec<BacklogItem> = {
            let risk = self
                .risks
                .get(&risk_id)
                .ok_or(ValidationError::EntityNotFound {
                    kind: "risk",
                    id: risk_id,
                })?;
            risk.backlog_ids
                .iter()
                .filter_map(|id| self.backlog.get(id).cloned())
                .collect()
        };
        let risk = self
            .risks
            .get_mut(&risk_id)
            .ok_or(ValidationError::EntityNotFound {
                kind: "risk",
                id: risk_id,
            })?;
        let borrowed: Vec<&BacklogItem> = linked.iter().collect();
        Ok(risk.close(&borrowed))
    }

    /// Deletes a component along with the evidence it owns. References
    /// from backlog items and risks are left in place; the synthesizer
    /// flags them as missing.
    pub fn remove_component(&mut self, id: Uuid) -> Option<Component> {
        let removed = self.components.remove(&id);
        if removed.is_some() {
            self.evidence.retain(|_, ev| ev.entity_id != id);
        }
        removed
    }

    /// Deletes an evidence record, leaving any references to it dangling.
    pub fn remove_evidence(&mut self, id: Uuid) -> Option<Evidence> {
        self.evidence.remove(&id)
    }

    /// Takes a read-only snapshot with deterministic entity ordering
    /// (components by category then name, everything else by creation
    /// timestamp then id).
    pub fn snapshot(&self, taken_at: DateTime<Utc>) -> Snapshot {
        let mut components: Vec<Component> = self.components.values().cloned().collect();
        components.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut evidence: Vec<Evidence> = self.evidence.values().cloned().collect();
        evidence.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut backlog: Vec<BacklogItem> = self.backlog.values().cloned().collect();
        backlog.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut risks: Vec<RiskEntry> = self.risks.values().cloned().collect();
        risks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Snapshot {
            taken_at,
            components,
            evidence,
            backlog,
            risks,
        }
    }
}
