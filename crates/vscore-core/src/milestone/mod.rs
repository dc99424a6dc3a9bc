//! Milestone Processing
//!
//! Milestone completions are the multiplicative growth events of the engine:
//! a completion resolves a milestone type from the catalog, evaluates a
//! per-completion performance score, and scales the V-Score by the composed
//! multiplier. Crossing a cliff threshold on the way up fires that cliff's
//! one-time bonus multiplier — first unachieved match wins, at most one cliff
//! per event, and a fired cliff never fires again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::Catalogs;
use crate::metrics::Metrics;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Baseline per-completion performance before persona/category bonuses
pub const PERFORMANCE_BASELINE: f64 = 0.8;

// ============================================================================
// MILESTONE TYPES
// ============================================================================

/// Business category of a milestone type. Revenue-adjacent categories carry
/// a larger performance bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneCategory {
    Product,
    Revenue,
    Funding,
    Team,
    Learning,
}

impl MilestoneCategory {
    /// Category bonus added to milestone performance evaluation.
    pub fn performance_bonus(&self) -> f64 {
        match self {
            MilestoneCategory::Revenue => 0.10,
            MilestoneCategory::Funding => 0.08,
            MilestoneCategory::Product => 0.05,
            MilestoneCategory::Team => 0.03,
            MilestoneCategory::Learning => 0.00,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneCategory::Product => "product",
            MilestoneCategory::Revenue => "revenue",
            MilestoneCategory::Funding => "funding",
            MilestoneCategory::Team => "team",
            MilestoneCategory::Learning => "learning",
        }
    }
}

/// Immutable milestone type catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneType {
    pub id: &'static str,
    pub name: &'static str,
    pub category: MilestoneCategory,
    pub base_multiplier: f64,
    pub context_multiplier: f64,
}

/// Default milestone type catalog. The first entry doubles as the fallback
/// for unknown type ids.
pub const MILESTONE_TYPES: &[MilestoneType] = &[
    MilestoneType {
        id: "product-launch",
        name: "Product Launch",
        category: MilestoneCategory::Product,
        base_multiplier: 1.5,
        context_multiplier: 1.2,
    },
    MilestoneType {
        id: "first-revenue",
        name: "First Revenue",
        category: MilestoneCategory::Revenue,
        base_multiplier: 2.0,
        context_multiplier: 1.5,
    },
    MilestoneType {
        id: "funding-round",
        name: "Funding Round",
        category: MilestoneCategory::Funding,
        base_multiplier: 1.8,
        context_multiplier: 1.4,
    },
    MilestoneType {
        id: "key-hire",
        name: "Key Hire",
        category: MilestoneCategory::Team,
        base_multiplier: 1.3,
        context_multiplier: 1.1,
    },
    MilestoneType {
        id: "customer-win",
        name: "Customer Win",
        category: MilestoneCategory::Revenue,
        base_multiplier: 1.6,
        context_multiplier: 1.3,
    },
    MilestoneType {
        id: "learning-sprint",
        name: "Learning Sprint",
        category: MilestoneCategory::Learning,
        base_multiplier: 1.2,
        context_multiplier: 1.0,
    },
];

// ============================================================================
// CLIFF MILESTONES
// ============================================================================

/// Immutable cliff milestone catalog entry: a one-time, score-threshold
/// multiplicative bonus.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliffMilestone {
    pub id: &'static str,
    pub name: &'static str,
    /// Score at or above which the cliff fires
    pub min_score: f64,
    /// One-time multiplier applied when the cliff fires
    pub cliff_multiplier: f64,
}

/// Default cliff catalog, ascending by threshold.
pub const CLIFF_MILESTONES: &[CliffMilestone] = &[
    CliffMilestone {
        id: "traction-cliff",
        name: "Traction Cliff",
        min_score: 5.0,
        cliff_multiplier: 1.5,
    },
    CliffMilestone {
        id: "commitment-cliff",
        name: "Commitment Cliff",
        min_score: 15.0,
        cliff_multiplier: 1.75,
    },
    CliffMilestone {
        id: "partnership-cliff",
        name: "Partnership Cliff",
        min_score: 40.0,
        cliff_multiplier: 2.0,
    },
    CliffMilestone {
        id: "legacy-cliff",
        name: "Legacy Cliff",
        min_score: 100.0,
        cliff_multiplier: 2.5,
    },
];

/// Mutable achievement state for one cliff, paired with the catalog entry by
/// id. The achieved flag transitions false -> true exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliffState {
    pub id: String,
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
}

impl CliffState {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            achieved: false,
            achieved_at: None,
        }
    }
}

// ============================================================================
// MILESTONE INPUT
// ============================================================================

/// A milestone record handed in by a collaborator.
///
/// Arbitrary upstream fields are reduced to the two the engine consults: an
/// optional explicit multiplier override and an optional type id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Explicit base multiplier override; when present it replaces the
    /// resolved type's base multiplier (the context multiplier still applies)
    pub multiplier: Option<f64>,
    /// Milestone type id, resolved against the catalog
    pub milestone_type: Option<String>,
}

/// Outcome of one milestone completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneOutcome {
    /// Catalog type the completion resolved to
    pub milestone_type_id: String,
    /// Per-completion performance in [0, 1]
    pub performance: f64,
    /// Composed multiplier applied to the score (pre-cliff)
    pub final_multiplier: f64,
    /// Cliff id if one fired on this completion
    pub cliff_fired: Option<String>,
    /// Score after the completion (post-cliff, if any)
    pub new_score: f64,
}

// ============================================================================
// PROCESSING
// ============================================================================

/// Resolve a milestone type id against the catalog.
///
/// Unknown ids fall back to the first catalog entry. The fallback is silent
/// by design (configuration errors never throw) but logged for audit.
pub fn resolve_type<'a>(catalogs: &'a Catalogs, type_id: Option<&str>) -> &'a MilestoneType {
    match type_id {
        Some(id) => catalogs
            .milestone_types
            .iter()
            .find(|t| t.id == id)
            .unwrap_or_else(|| {
                warn!(type_id = id, "unknown milestone type, using default");
                &catalogs.milestone_types[0]
            }),
        None => &catalogs.milestone_types[0],
    }
}

/// Evaluate the performance score for one completion.
///
/// Starts at the 0.8 baseline, adds the persona bonus and the milestone
/// category bonus, clamped to [0, 1].
pub fn evaluate_performance(metrics: &Metrics, milestone_type: &MilestoneType) -> f64 {
    (PERFORMANCE_BASELINE
        + metrics.persona.performance_bonus()
        + milestone_type.category.performance_bonus())
    .clamp(0.0, 1.0)
}

/// Fire the first not-yet-achieved cliff whose threshold the current score
/// meets. At most one cliff fires per invocation; already-achieved cliffs
/// never fire again. Returns the fired cliff id, if any.
pub fn apply_first_cliff(metrics: &mut Metrics, catalogs: &Catalogs, now: DateTime<Utc>) -> Option<String> {
    for entry in catalogs.cliff_milestones.iter() {
        if metrics.current_score < entry.min_score {
            continue;
        }
        let Some(state) = metrics
            .cliff_milestones
            .iter_mut()
            .find(|s| s.id == entry.id)
        else {
            continue;
        };
        if state.achieved {
            continue;
        }
        state.achieved = true;
        state.achieved_at = Some(now);
        metrics.current_score *= entry.cliff_multiplier;
        info!(
            cliff = entry.id,
            multiplier = entry.cliff_multiplier,
            score = metrics.current_score,
            "cliff milestone fired"
        );
        return Some(entry.id.to_string());
    }
    None
}

/// Complete a milestone against the snapshot.
///
/// Composition order:
/// 1. resolve the type (explicit `type_id` wins over the record's own type)
/// 2. `base = base_multiplier * context_multiplier`
/// 3. evaluate per-completion performance
/// 4. `final = base * (1 + (performance * schedule.performance_multiplier - 1))`
/// 5. scale the score, then run the cliff check against the new score
/// 6. fold the performance into the rolling average and refresh derived state
pub fn complete_milestone(
    metrics: &mut Metrics,
    milestone: &Milestone,
    type_id: Option<&str>,
    catalogs: &Catalogs,
    now: DateTime<Utc>,
) -> MilestoneOutcome {
    let resolved_id = type_id.or(milestone.milestone_type.as_deref());
    let milestone_type = resolve_type(catalogs, resolved_id);

    let base = milestone.multiplier.unwrap_or(milestone_type.base_multiplier)
        * milestone_type.context_multiplier;
    let performance = evaluate_performance(metrics, milestone_type);
    let final_multiplier = base
        * (1.0 + (performance * metrics.vesting_schedule.performance_multiplier - 1.0));

    metrics.current_score *= final_multiplier;
    let cliff_fired = apply_first_cliff(metrics, catalogs, now);

    metrics.milestones_completed += 1;
    metrics.performance_score = (metrics.performance_score + performance) / 2.0;
    metrics.refresh_derived(now);

    info!(
        milestone_type = milestone_type.id,
        multiplier = final_multiplier,
        performance,
        score = metrics.current_score,
        "milestone completed"
    );

    MilestoneOutcome {
        milestone_type_id: milestone_type.id.to_string(),
        performance,
        final_multiplier,
        cliff_fired,
        new_score: metrics.current_score,
    }
}

// ============================================================================
// TESTS
// ============================================================================
