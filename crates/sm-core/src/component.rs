//! Component inventory and the evidence-gated classification engine.
//!
//! A component's status is never stored on its own: it is derived from the
//! last entry of an append-only status history, and every transition away
//! from `Unknown` must cite at least one evidence record owned by the
//! component. A failed classification leaves the component untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::evidence::Evidence;

/// What kind of inventory entry a component is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A user-facing feature or capability.
    Feature,
    /// An integration with an external system.
    Integration,
    /// A deployment environment.
    Environment,
    /// An operational role or responsibility.
    Role,
}

impl Category {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Feature => "feature",
            Category::Integration => "integration",
            Category::Environment => "environment",
            Category::Role => "role",
        }
    }

    /// Display heading used in reports.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Feature => "Features",
            Category::Integration => "Integrations",
            Category::Environment => "Environments",
            Category::Role => "Roles",
        }
    }

    /// All categories in report order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Feature,
            Category::Integration,
            Category::Environment,
            Category::Role,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    /// Meets its service thresholds with no critical failures.
    Working,
    /// Partially working: sustained breaches or intermittent failures.
    Degraded,
    /// Reliably breaks a critical journey.
    Failing,
    /// Insufficient evidence to classify. The only status that requires
    /// no evidence.
    Unknown,
}

impl ComponentStatus {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Working => "Working",
            ComponentStatus::Degraded => "Degraded",
            ComponentStatus::Failing => "Failing",
            ComponentStatus::Unknown => "Unknown",
        }
    }

    /// All statuses in summary order.
    pub fn all() -> &'static [ComponentStatus] {
        &[
            ComponentStatus::Working,
            ComponentStatus::Degraded,
            ComponentStatus::Failing,
            ComponentStatus::Unknown,
        ]
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a component's append-only status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    /// Status before the transition.
    pub from: ComponentStatus,
    /// Status after the transition.
    pub to: ComponentStatus,
    /// When the transition happened.
    pub at: DateTime<Utc>,
    /// Who made the transition.
    pub actor: String,
}

/// A classifiable entry in the current-state inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier.
    pub id: Uuid,
    /// Human-readable name, unique within the inventory.
    pub name: String,
    /// Inventory category.
    pub category: Category,
    /// Owning team or person.
    pub owner: String,
    /// Free-form description.
    pub description: String,
    /// Ordered evidence references (ids of [`Evidence`] records owned by
    /// this component). Append-only, no duplicates.
    pub evidence: Vec<Uuid>,
    /// Append-only status history; the last entry defines the current
    /// status. Never rewritten.
    pub history: Vec<StatusChange>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Component {
    /// Creates a new component with no evidence and no history, which
    /// makes its derived status `Unknown`.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        owner: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            owner: owner.into(),
            description: String::new(),
            evidence: Vec::new(),
            history: Vec::new(),
            updated_at: now,
        }
    }

    /// Current status, derived from the latest history entry.
    pub fn status(&self) -> ComponentStatus {
        self.history
            .last()
            .map(|entry| entry.to)
            .unwrap_or(ComponentStatus::Unknown)
    }

    /// Classifies the component into `to`, citing `evidence_refs`.
    ///
    /// Fails with [`ValidationError::MissingEvidence`] when `to` is not
    /// `Unknown` and no evidence is cited, and with
    /// [`ValidationError::ForeignEvidence`] when any cited record belongs
    /// to a different entity. Validation completes before any mutation.
    ///
    /// On success, cited evidence ids not already attached are appended in
    /// the order given, and a [`StatusChange`] is recorded.
    pub fn classify(
        &mut self,
        to: ComponentStatus,
        evidence_refs: &[&Evidence],
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if to != ComponentStatus::Unknown && evidence_refs.is_empty() {
            return Err(ValidationError::MissingEvidence {
                status: to.to_string(),
            });
        }
        for ev in evidence_refs {
            if ev.entity_id != self.id {
                return Err(ValidationError::ForeignEvidence {
                    evidence_id: ev.id,
                    entity_id: self.id,
                });
            }
        }

        let from = self.status();
        for ev in evidence_refs {
            if !self.evidence.contains(&ev.id) {
                self.evidence.push(ev.id);
            }
        }
        self.history.push(StatusChange {
            from,
            to,
            at: now,
            actor: actor.to_string(),
        });
        self.updated_at = now;
        debug!(component = %self.name, %from, %to, actor, "component classified");
        Ok(())
    }
}
