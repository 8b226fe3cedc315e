//! Backlog items and WSJF (Weighted Shortest Job First) scoring.
//!
//! WSJF balances value and urgency against effort:
//! `(business_value + time_criticality + risk_reduction) / job_size`.
//! All four sub-scores are positive integers; the derived score is stored
//! alongside them and recomputed inside every mutation, so it can never go
//! stale relative to its inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Lifecycle status of a backlog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklogStatus {
    /// Proposed, not yet accepted into the plan.
    Proposed,
    /// Accepted, waiting to start.
    Accepted,
    /// Work in progress.
    InProgress,
    /// Completed.
    Done,
}

impl BacklogStatus {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BacklogStatus::Proposed => "Proposed",
            BacklogStatus::Accepted => "Accepted",
            BacklogStatus::InProgress => "InProgress",
            BacklogStatus::Done => "Done",
        }
    }

    /// True for any status other than `Done`.
    pub fn is_open(&self) -> bool {
        !matches!(self, BacklogStatus::Done)
    }
}

impl std::fmt::Display for BacklogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the WSJF score from raw sub-scores.
///
/// Every sub-score must be positive; zero is rejected with
/// [`ValidationError`] rather than silently clamped.
pub fn wsjf_score(
    business_value: u32,
    time_criticality: u32,
    risk_reduction: u32,
    job_size: u32,
) -> Result<f64, ValidationError> {
    if business_value == 0 {
        return Err(ValidationError::ZeroSubScore {
            field: "business value",
        });
    }
    if time_criticality == 0 {
        return Err(ValidationError::ZeroSubScore {
            field: "time criticality",
        });
    }
    if risk_reduction == 0 {
        return Err(ValidationError::ZeroSubScore {
            field: "risk reduction",
        });
    }
    if job_size == 0 {
        return Err(ValidationError::ZeroJobSize);
    }
    // Convert before adding: the numerator can exceed u32::MAX.
    let numerator =
        f64::from(business_value) + f64::from(time_criticality) + f64::from(risk_reduction);
    Ok(numerator / f64::from(job_size))
}

/// A prioritized unit of work in the backlog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklogItem {
    /// Unique identifier.
    pub id: Uuid,
    /// Short title.
    pub title: String,
    /// Longer description of the work.
    pub description: String,
    /// Relative business value delivered (positive).
    pub business_value: u32,
    /// How much the value decays with delay (positive).
    pub time_criticality: u32,
    /// Risk reduction / opportunity enablement (positive).
    pub risk_reduction: u32,
    /// Relative effort (positive).
    pub job_size: u32,
    /// Derived WSJF score; always consistent with the sub-scores above.
    pub wsjf: f64,
    /// Lifecycle status.
    pub status: BacklogStatus,
    /// Components this item touches (by id; may dangle).
    pub component_ids: Vec<Uuid>,
    /// Risks this item mitigates (by id; may dangle).
    pub risk_ids: Vec<Uuid>,
    /// When the item was created. First tie-breaker for ranking.
    pub created_at: DateTime<Utc>,
}

impl BacklogItem {
    /// Creates a new backlog item, validating its sub-scores.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        business_value: u32,
        time_criticality: u32,
        risk_reduction: u32,
        job_size: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let wsjf = wsjf_score(business_value, time_criticality, risk_reduction, job_size)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            business_value,
            time_criticality,
            risk_reduction,
            job_size,
            wsjf,
            status: BacklogStatus::Proposed,
            component_ids: Vec::new(),
            risk_ids: Vec::new(),
            created_at: now,
        })
    }

    /// Replaces all four sub-scores in one validated update and recomputes
    /// the stored score. Last writer wins at the entity level; the
    /// collaborator's per-entity transaction boundary serializes callers.
    pub fn set_scores(
        &mut self,
        business_value: u32,
        time_criticality: u32,
        risk_reduction: u32,
        job_size: u32,
    ) -> Result<(), ValidationError> {
        let wsjf = wsjf_score(business_value, time_criticality, risk_reduction, job_size)?;
        self.business_value = business_value;
        self.time_criticality = time_criticality;
        self.risk_reduction = risk_reduction;
        self.job_size = job_size;
        self.wsjf = wsjf;
        Ok(())
    }
}

/// Ranks backlog items by descending WSJF score.
///
/// Ties break by earliest creation timestamp, then by id, so the ordering
/// is total and identical across runs.
pub fn rank_backlog(items: &[BacklogItem]) -> Vec<&BacklogItem> {
    let mut ranked: Vec<&BacklogItem> = items.iter().collect();
    ranked.sort_by(|a, b| {
        b.wsjf
            .total_cmp(&a.wsjf)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(bv: u32, tc: u32, rr: u32, js: u32, created_at: DateTime<Utc>) -> BacklogItem {
        BacklogItem::new("item", "", bv, tc, rr, js, created_at).unwrap()
    }

    #[test]
    fn test_wsjf_example_from_scoring_guide() {
        // (8 + 5 + 3) / 4 = 4.0
        assert_eq!(wsjf_score(8, 5, 3, 4).unwrap(), 4.0);
    }

    #[test]
    fn test_zero_sub_scores_rejected() {
        assert!(matches!(
            wsjf_score(0, 5, 3, 4),
            Err(ValidationError::ZeroSubScore {
                field: "business value"
            })
        ));
        assert!(matches!(
            wsjf_score(8, 0, 3, 4),
            Err(ValidationError::ZeroSubScore { .. })
        ));
        assert!(matches!(
            wsjf_score(8, 5, 0, 4),
            Err(ValidationError::ZeroSubScore { .. })
        ));
        assert!(matches!(
            wsjf_score(8, 5, 3, 0),
            Err(ValidationError::ZeroJobSize)
        ));
    }

    #[test]
    fn test_maximal_sub_scores_stay_finite() {
        let score = wsjf_score(u32::MAX, u32::MAX, u32::MAX, 1).unwrap();
        assert!(score.is_finite());
        assert_eq!(score, 3.0 * f64::from(u32::MAX));

        let score = wsjf_score(u32::MAX, 1, 1, 1).unwrap();
        assert_eq!(score, f64::from(u32::MAX) + 2.0);
    }

    #[test]
    fn test_score_monotonicity() {
        let base = wsjf_score(5, 5, 5, 5).unwrap();
        assert!(wsjf_score(6, 5, 5, 5).unwrap() > base);
        assert!(wsjf_score(5, 6, 5, 5).unwrap() > base);
        assert!(wsjf_score(5, 5, 6, 5).unwrap() > base);
        assert!(wsjf_score(5, 5, 5, 6).unwrap() < base);
    }

    #[test]
    fn test_set_scores_rejects_without_mutating() {
        let mut it = item(8, 5, 3, 4, Utc::now());
        let before = it.wsjf;

        let result = it.set_scores(10, 10, 10, 0);

        assert!(matches!(result, Err(ValidationError::ZeroJobSize)));
        assert_eq!(it.business_value, 8);
        assert_eq!(it.wsjf, before);
    }

    #[test]
    fn test_set_scores_recomputes() {
        let mut it = item(8, 5, 3, 4, Utc::now());
        it.set_scores(1, 1, 1, 3).unwrap();
        assert_eq!(it.wsjf, 1.0);
    }

    #[test]
    fn test_rank_descending_with_deterministic_ties() {
        let t0 = Utc::now();
        let high = item(9, 9, 9, 1, t0);
        let low = item(1, 1, 1, 9, t0);
        // Same score, different creation time: earlier wins.
        let tie_early = item(4, 4, 4, 4, t0);
        let tie_late = item(4, 4, 4, 4, t0 + Duration::seconds(10));

        let items = vec![low.clone(), tie_late.clone(), high.clone(), tie_early.clone()];
        let ranked = rank_backlog(&items);

        let ids: Vec<Uuid> = ranked.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![high.id, tie_early.id, tie_late.id, low.id]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let t0 = Utc::now();
        let items = vec![
            item(8, 5, 3, 4, t0),
            item(2, 2, 2, 1, t0),
            item(3, 3, 3, 3, t0),
        ];
        let once: Vec<Uuid> = rank_backlog(&items).iter().map(|i| i.id).collect();
        let reordered: Vec<BacklogItem> = rank_backlog(&items).into_iter().cloned().collect();
        let twice: Vec<Uuid> = rank_backlog(&reordered).iter().map(|i| i.id).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_swapping_scores_swaps_order() {
        let t0 = Utc::now();
        let mut a = item(9, 9, 9, 1, t0);
        let mut b = item(1, 1, 1, 9, t0);

        let ranked: Vec<Uuid> = rank_backlog(&[a.clone(), b.clone()])
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ranked, vec![a.id, b.id]);

        a.set_scores(1, 1, 1, 9).unwrap();
        b.set_scores(9, 9, 9, 1).unwrap();
        let ranked: Vec<Uuid> = rank_backlog(&[a.clone(), b.clone()])
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ranked, vec![b.id, a.id]);
    }
}
