//! Metrics Aggregate
//!
//! The root snapshot tracked per user/venture context. One `Metrics` value
//! holds the V-Score, its derived phase, milestone and cliff state, knowledge
//! depth, retention bookkeeping, transfer eligibility, and unlocked
//! achievements. Every mutation goes through a pure transition function and
//! finishes with [`Metrics::refresh_derived`], which re-establishes the
//! aggregate invariants:
//!
//! - `current_score >= 0` at all times
//! - `max_score = max(max_score, current_score)`
//! - `total_growth = current_score - initial_score`
//! - `phase` is recomputed from the score, never stored authoritatively

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievement::Achievement;
use crate::catalog::Catalogs;
use crate::knowledge::KnowledgeDepth;
use crate::milestone::CliffState;
use crate::phase::{self, Phase};
use crate::retention::RetentionMetrics;
use crate::transfer::TransferEligibility;
use crate::vesting::{Persona, VestingSchedule};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Seed score for a freshly initialized snapshot
pub const INITIAL_SCORE: f64 = 1.0;

// ============================================================================
// METRICS
// ============================================================================

/// The root vested-interest aggregate, one per user/venture context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Persona the schedule was seeded from
    pub persona: Persona,
    /// The V-Score itself, floored at zero
    pub current_score: f64,
    /// Score at initialization, basis for total growth
    pub initial_score: f64,
    /// High-water mark of the score
    pub max_score: f64,
    /// Derived: `current_score - initial_score`
    pub total_growth: f64,
    /// Derived from the score via the phase classifier
    pub phase: Phase,
    /// Count of completed milestones
    pub milestones_completed: u32,
    /// Minutes of active engagement
    pub time_invested_minutes: u64,
    /// Consecutive-day engagement counter
    pub streak_days: u32,
    /// Rolling-average performance in [0, 1]
    pub performance_score: f64,
    /// Per-cliff achieved flags, in catalog order
    pub cliff_milestones: Vec<CliffState>,
    /// Persona-derived growth constants
    pub vesting_schedule: VestingSchedule,
    /// Session/engagement bookkeeping
    pub retention_metrics: RetentionMetrics,
    /// Six-dimension knowledge accumulation
    pub knowledge_depth: KnowledgeDepth,
    /// Transfer gating state and history
    pub transfer_eligibility: TransferEligibility,
    /// Unlocked achievements, unique by id
    pub achievements: Vec<Achievement>,
    /// Timestamp of the last committed mutation
    pub last_updated: DateTime<Utc>,
}

impl Metrics {
    /// Seed a fresh snapshot from persona defaults and the active catalogs.
    pub fn new(persona: Persona, catalogs: &Catalogs, now: DateTime<Utc>) -> Self {
        let mut metrics = Self {
            persona,
            current_score: INITIAL_SCORE,
            initial_score: INITIAL_SCORE,
            max_score: INITIAL_SCORE,
            total_growth: 0.0,
            phase: Phase::Observer,
            milestones_completed: 0,
            time_invested_minutes: 0,
            streak_days: 0,
            performance_score: 0.8,
            cliff_milestones: catalogs
                .cliff_milestones
                .iter()
                .map(|c| CliffState::new(c.id))
                .collect(),
            vesting_schedule: VestingSchedule::for_persona(persona),
            retention_metrics: RetentionMetrics::default(),
            knowledge_depth: KnowledgeDepth::new(&catalogs.knowledge_milestones),
            transfer_eligibility: TransferEligibility::default(),
            achievements: Vec::new(),
            last_updated: now,
        };
        metrics.refresh_derived(now);
        metrics
    }

    /// Floor the score, advance the high-water mark, and recompute every
    /// derived field. Called at the end of every transition function.
    pub fn refresh_derived(&mut self, now: DateTime<Utc>) {
        self.current_score = self.current_score.max(0.0);
        self.max_score = self.max_score.max(self.current_score);
        self.total_growth = self.current_score - self.initial_score;
        self.phase = phase::classify(self.current_score);
        self.last_updated = now;
    }

    /// Whole days elapsed between the last committed mutation and `now`.
    pub fn days_since_last_update(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.last_updated).num_days()
    }

    /// Whether any cliff has fired.
    pub fn any_cliff_achieved(&self) -> bool {
        self.cliff_milestones.iter().any(|c| c.achieved)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_snapshot_invariants() {
        let catalogs = Catalogs::default();
        let m = Metrics::new(Persona::Founder, &catalogs, Utc::now());
        assert_eq!(m.current_score, INITIAL_SCORE);
        assert_eq!(m.max_score, INITIAL_SCORE);
        assert_eq!(m.total_growth, 0.0);
        assert_eq!(m.phase, Phase::Observer);
        assert!(m.cliff_milestones.iter().all(|c| !c.achieved));
        assert!(m.achievements.is_empty());
    }

    #[test]
    fn test_refresh_floors_score_and_tracks_max() {
        let catalogs = Catalogs::default();
        let now = Utc::now();
        let mut m = Metrics::new(Persona::Founder, &catalogs, now);

        m.current_score = 12.0;
        m.refresh_derived(now);
        assert_eq!(m.max_score, 12.0);
        assert_eq!(m.phase, Phase::Partner);
        assert!((m.total_growth - 11.0).abs() < 1e-9);

        m.current_score = -4.0;
        m.refresh_derived(now);
        assert_eq!(m.current_score, 0.0);
        assert_eq!(m.max_score, 12.0);
        assert_eq!(m.phase, Phase::Observer);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let catalogs = Catalogs::default();
        let mut m = Metrics::new(Persona::Visionary, &catalogs, Utc::now());
        m.current_score = 7.5;
        m.refresh_derived(Utc::now());

        let json = serde_json::to_string(&m).unwrap();
        let back: Metrics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.current_score, m.current_score);
        assert_eq!(back.phase, m.phase);
        assert_eq!(back.persona, m.persona);
        assert_eq!(back.last_updated, m.last_updated);
    }
}
