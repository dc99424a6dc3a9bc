//! Achievement Engine
//!
//! Rule-based badge unlocking over the full metrics snapshot. Each catalog
//! rule pairs an id with a boolean predicate; rules whose id is already
//! unlocked are skipped, so repeated evaluation of an unchanged snapshot is
//! idempotent and never appends duplicate ids. The engine runs the check as
//! a post-condition of score-bearing mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::metrics::Metrics;

// ============================================================================
// ACHIEVEMENT RECORD
// ============================================================================

/// An unlocked achievement carried in the snapshot, unique by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked_at: DateTime<Utc>,
}

// ============================================================================
// ACHIEVEMENT RULES
// ============================================================================

/// An immutable achievement catalog entry: id, display strings, and the
/// predicate deciding when it unlocks.
#[derive(Clone)]
pub struct AchievementRule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub predicate: fn(&Metrics) -> bool,
}

impl std::fmt::Debug for AchievementRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AchievementRule")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// Default achievement catalog.
pub fn default_rules() -> Vec<AchievementRule> {
    vec![
        AchievementRule {
            id: "first-milestone",
            name: "First Milestone",
            description: "Completed the first milestone together",
            predicate: |m| m.milestones_completed >= 1,
        },
        AchievementRule {
            id: "rising-stake",
            name: "Rising Stake",
            description: "V-Score reached 3.0",
            predicate: |m| m.current_score >= 3.0,
        },
        AchievementRule {
            id: "true-believer",
            name: "True Believer",
            description: "30-day engagement streak",
            predicate: |m| m.streak_days >= 30,
        },
        AchievementRule {
            id: "peak-performer",
            name: "Peak Performer",
            description: "Sustained 0.9 performance across a 30-day streak",
            predicate: |m| m.performance_score >= 0.9 && m.streak_days >= 30,
        },
        AchievementRule {
            id: "cliff-jumper",
            name: "Cliff Jumper",
            description: "Cleared a cliff milestone",
            predicate: |m| m.any_cliff_achieved(),
        },
        AchievementRule {
            id: "deep-roots",
            name: "Deep Roots",
            description: "Overall knowledge depth reached 0.8",
            predicate: |m| m.knowledge_depth.overall_knowledge_score >= 0.8,
        },
        AchievementRule {
            id: "marathon",
            name: "Marathon",
            description: "600 minutes of invested time",
            predicate: |m| m.time_invested_minutes >= 600,
        },
        AchievementRule {
            id: "well-traveled",
            name: "Well Traveled",
            description: "Carried standing into another venture",
            predicate: |m| !m.transfer_eligibility.transfer_history.is_empty(),
        },
    ]
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Evaluate every rule against the snapshot and unlock newly satisfied ones.
///
/// Idempotent: ids already present in `achievements` are skipped, so calling
/// twice on an unchanged snapshot appends nothing the second time.
///
/// Returns ids unlocked by this invocation.
pub fn check_achievements(
    metrics: &mut Metrics,
    rules: &[AchievementRule],
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut unlocked = Vec::new();
    for rule in rules {
        if metrics.achievements.iter().any(|a| a.id == rule.id) {
            continue;
        }
        if (rule.predicate)(metrics) {
            metrics.achievements.push(Achievement {
                id: rule.id.to_string(),
                name: rule.name.to_string(),
                description: rule.description.to_string(),
                unlocked_at: now,
            });
            info!(achievement = rule.id, "achievement unlocked");
            unlocked.push(rule.id.to_string());
        }
    }
    unlocked
}

// ============================================================================
// TESTS
// ============================================================================
