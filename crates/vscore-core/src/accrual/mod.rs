//! Passive Accrual
//!
//! The per-tick passive growth transition. Each tick composes the persona
//! base rate, the rolling performance score, the knowledge multiplier, and
//! the engagement-driven retention bonus into one additive score delta, then
//! carries the bookkeeping that rides along with it: invested time, the
//! consecutive-day streak, retention metrics, the transfer cooldown, and the
//! post-mutation cliff and achievement checks.
//!
//! Ticks only happen while the subject is active — an inactive subject is
//! simply not scheduled, which is not an error condition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::achievement::check_achievements;
use crate::catalog::Catalogs;
use crate::metrics::Metrics;
use crate::milestone::apply_first_cliff;
use crate::transfer::check_eligibility;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minutes of invested time credited per tick
pub const TICK_MINUTES: u64 = 1;

// ============================================================================
// TICK OUTCOME
// ============================================================================

/// What one accrual tick did to the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    /// Additive score delta applied by this tick
    pub delta: f64,
    /// Streak after the tick's day comparison
    pub streak_days: u32,
    /// Cliff id if the passive growth crossed a cliff threshold
    pub cliff_fired: Option<String>,
    /// Achievement ids unlocked as a post-condition of the tick
    pub achievements_unlocked: Vec<String>,
    /// Score after the tick (post-cliff, if any)
    pub new_score: f64,
}

// ============================================================================
// TICK TRANSITION
// ============================================================================

/// Apply one accrual tick to the snapshot.
///
/// `delta = base_rate * performance * knowledge_multiplier + retention_bonus`
///
/// Streak update compares elapsed whole days since the last committed
/// mutation: same day leaves the streak alone, exactly one day extends it,
/// a longer gap resets it to zero.
pub fn accrue_tick(metrics: &mut Metrics, catalogs: &Catalogs, now: DateTime<Utc>) -> TickOutcome {
    let knowledge_mult = metrics
        .knowledge_depth
        .knowledge_multiplier(&catalogs.knowledge_milestones);
    let retention_bonus = metrics
        .retention_metrics
        .retention_bonus(metrics.vesting_schedule.retention_bonus);
    let delta = metrics.vesting_schedule.base_rate * metrics.performance_score * knowledge_mult
        + retention_bonus;

    metrics.current_score += delta;
    metrics.time_invested_minutes += TICK_MINUTES;

    // Streak: whole days elapsed since the last committed mutation.
    let elapsed_days = metrics.days_since_last_update(now);
    metrics.streak_days = match elapsed_days {
        d if d <= 0 => metrics.streak_days,
        1 => metrics.streak_days + 1,
        _ => 0,
    };

    metrics.retention_metrics.days_since_last_activity = elapsed_days.max(0);
    metrics.retention_metrics.record_session(metrics.streak_days);

    // Cooldown counts up every tick; eligibility is re-derived afterwards.
    metrics.transfer_eligibility.transfer_cooldown_days = metrics
        .transfer_eligibility
        .transfer_cooldown_days
        .saturating_add(1);

    metrics.refresh_derived(now);

    let cliff_fired = apply_first_cliff(metrics, catalogs, now);
    if cliff_fired.is_some() {
        metrics.refresh_derived(now);
    }

    let eligible = check_eligibility(metrics).is_none();
    metrics.transfer_eligibility.can_transfer = eligible;

    let achievements_unlocked = check_achievements(metrics, &catalogs.achievement_rules, now);

    debug!(
        delta,
        score = metrics.current_score,
        streak = metrics.streak_days,
        knowledge_mult,
        "accrual tick applied"
    );

    TickOutcome {
        delta,
        streak_days: metrics.streak_days,
        cliff_fired,
        achievements_unlocked,
        new_score: metrics.current_score,
    }
}

// ============================================================================
// TESTS
// ============================================================================
