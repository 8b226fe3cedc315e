//! # sm-core
//!
//! Core engine for statemap: inventory data models, the evidence-gated
//! classification engine, the WSJF backlog scorer, and the risk register.
//!
//! Everything here is pure computation over in-memory values. Persistence,
//! transport, and authentication are collaborator concerns; the caller
//! supplies an actor identity and a [`store::Clock`] on every mutating
//! operation, and hands the report synthesizer a read-only
//! [`snapshot::Snapshot`].

pub mod backlog;
pub mod component;
pub mod error;
pub mod evidence;
pub mod risk;
pub mod snapshot;
pub mod store;

pub use backlog::{rank_backlog, wsjf_score, BacklogItem, BacklogStatus};
pub use component::{Category, Component, ComponentStatus, StatusChange};
pub use error::{ReferenceWarning, ValidationError};
pub use evidence::{Evidence, EvidenceKind};
pub use risk::{rank_risks, severity, Impact, Probability, RiskEntry, RiskStatus, Severity};
pub use snapshot::Snapshot;
pub use store::{Clock, FixedClock, MemoryStore, SystemClock};
