//! Immutable evidence records.
//!
//! Evidence backs every status claim in the inventory. Records are
//! append-only: a correction is a new record, never an edit, so the trail
//! behind a classification can always be replayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What form a piece of evidence takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    /// A URL to a dashboard, runbook, ticket, or similar artifact.
    Link,
    /// Free-form analyst note.
    Note,
    /// An excerpt from a log or monitoring output.
    Log,
}

impl EvidenceKind {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceKind::Link => "link",
            EvidenceKind::Note => "note",
            EvidenceKind::Log => "log",
        }
    }
}

impl std::fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable evidence record attached to an inventory entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// The entity (component or risk) this evidence belongs to.
    pub entity_id: Uuid,
    /// What form the evidence takes.
    pub kind: EvidenceKind,
    /// Short display label.
    pub title: String,
    /// The payload: a URL for links, body text for notes and logs.
    pub content: String,
    /// Who recorded this evidence.
    pub created_by: String,
    /// When it was recorded.
    pub created_at: DateTime<Utc>,
}

impl Evidence {
    /// Creates a new evidence record owned by `entity_id`.
    ///
    /// There are deliberately no mutating methods on this type.
    pub fn new(
        entity_id: Uuid,
        kind: EvidenceKind,
        title: impl Into<String>,
        content: impl Into<String>,
        created_by: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_id,
            kind,
            title: title.into(),
            content: content.into(),
            created_by: created_by.into(),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_belongs_to_entity() {
        let owner = Uuid::new_v4();
        let ev = Evidence::new(
            owner,
            EvidenceKind::Link,
            "Grafana dashboard",
            "https://grafana.example.com/d/abc",
            "alice",
            Utc::now(),
        );
        assert_eq!(ev.entity_id, owner);
        assert_eq!(ev.kind.as_str(), "link");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(EvidenceKind::Note.to_string(), "note");
        assert_eq!(EvidenceKind::Log.to_string(), "log");
    }
}
