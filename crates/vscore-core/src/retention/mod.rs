//! Retention Risk Modeling
//!
//! Session and streak bookkeeping that produces an engagement score in
//! [0, 1] and a coarse churn-risk bucket. The engagement score nudges upward
//! on every active tick and feeds the retention bonus term of passive
//! accrual; the risk bucket is derived purely from the current streak.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Engagement score gain per active session tick
pub const ENGAGEMENT_STEP: f64 = 0.01;

/// Streak below which retention risk is high
pub const HIGH_RISK_STREAK: u32 = 3;

/// Streak below which retention risk is medium
pub const MEDIUM_RISK_STREAK: u32 = 7;

// ============================================================================
// RETENTION RISK
// ============================================================================

/// Coarse churn-risk bucket derived from the engagement streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetentionRisk {
    Low,
    Medium,
    #[default]
    High,
}

impl RetentionRisk {
    /// Bucket a streak: `< 3` days is high risk, `< 7` medium, else low.
    pub fn from_streak(streak: u32) -> Self {
        if streak < HIGH_RISK_STREAK {
            RetentionRisk::High
        } else if streak < MEDIUM_RISK_STREAK {
            RetentionRisk::Medium
        } else {
            RetentionRisk::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionRisk::Low => "low",
            RetentionRisk::Medium => "medium",
            RetentionRisk::High => "high",
        }
    }
}

impl std::fmt::Display for RetentionRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RETENTION METRICS
// ============================================================================

/// Session/engagement bookkeeping carried in the metrics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionMetrics {
    /// Total ticks counted as sessions
    pub total_sessions: u64,
    /// EMA-smoothed session length in minutes
    pub average_session_length: f64,
    /// Whole days of gap observed at the latest tick, written by the accrual
    /// transition before the session is recorded
    pub days_since_last_activity: i64,
    /// Engagement score in [0, 1]
    pub engagement_score: f64,
    /// Derived churn-risk bucket
    pub retention_risk: RetentionRisk,
}

impl Default for RetentionMetrics {
    fn default() -> Self {
        Self {
            total_sessions: 0,
            average_session_length: 0.0,
            days_since_last_activity: 0,
            engagement_score: 0.0,
            retention_risk: RetentionRisk::High,
        }
    }
}

impl RetentionMetrics {
    /// Record one active tick as a session.
    ///
    /// Session length smoothing is the `(avg + 1) / 2` exponential-moving
    /// average form; engagement climbs by a fixed step, capped at 1.0; the
    /// risk bucket is re-derived from the post-update streak.
    pub fn record_session(&mut self, streak: u32) {
        self.total_sessions += 1;
        self.average_session_length = (self.average_session_length + 1.0) / 2.0;
        self.engagement_score = (self.engagement_score + ENGAGEMENT_STEP).min(1.0);
        self.retention_risk = RetentionRisk::from_streak(streak);
    }

    /// The retention bonus contribution, given the persona's bonus constant.
    pub fn retention_bonus(&self, bonus_rate: f64) -> f64 {
        self.engagement_score * bonus_rate
    }
}

// ============================================================================
// TESTS
// ============================================================================
