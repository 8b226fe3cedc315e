//! Error taxonomy for the statemap core.
//!
//! Two severities exist: [`ValidationError`] rejects an operation before any
//! state is touched, and [`ReferenceWarning`] reports a cross-reference
//! problem that the caller may surface but must not treat as fatal.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised when an operation fails validation.
///
/// Validation always runs to completion before any field is mutated, so a
/// returned error means the target entity is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("status '{status}' requires at least one evidence reference")]
    MissingEvidence {
        /// The status that was requested without supporting evidence.
        status: String,
    },

    #[error("evidence {evidence_id} does not belong to entity {entity_id}")]
    ForeignEvidence {
        /// The evidence record that was offered.
        evidence_id: Uuid,
        /// The entity the caller tried to attach it to.
        entity_id: Uuid,
    },

    #[error("{field} must be a positive integer")]
    ZeroSubScore {
        /// Which WSJF sub-score was zero.
        field: &'static str,
    },

    #[error("job size must be a positive integer")]
    ZeroJobSize,

    #[error("stored {field} disagrees with its inputs for entity {id}")]
    StaleDerived {
        /// The derived field that went stale, e.g. "WSJF score" or "severity".
        field: &'static str,
        /// The entity carrying the stale value.
        id: Uuid,
    },

    #[error("{kind} not found: {id}")]
    EntityNotFound {
        /// Entity kind, e.g. "component" or "evidence".
        kind: &'static str,
        /// The id that failed to resolve.
        id: Uuid,
    },

    #[error("component with name '{name}' already exists")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },
}

/// Non-fatal findings about cross-references between entities.
///
/// Dangling references are rendered inline as `[missing: <id>]` markers by
/// the report synthesizer; risk-close checks warn and proceed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceWarning {
    #[error("entity {from} references missing {kind} {missing}")]
    DanglingReference {
        /// The entity holding the stale reference.
        from: Uuid,
        /// Kind of the missing entity.
        kind: &'static str,
        /// The id that no longer resolves.
        missing: Uuid,
    },

    #[error("risk {risk_id} closed while backlog item {backlog_id} ('{title}') is still open")]
    OpenMitigation {
        /// The risk being closed.
        risk_id: Uuid,
        /// The linked backlog item that still looks like pending mitigation work.
        backlog_id: Uuid,
        /// Title of that backlog item.
        title: String,
    },
}

impl ReferenceWarning {
    /// Inline marker used by the report synthesizer for a dangling id.
    pub fn missing_marker(id: Uuid) -> String {
        format!("[missing: {}]", id)
    }
}
