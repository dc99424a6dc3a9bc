//! Knowledge Depth Tracking
//!
//! Tracks how much contextual understanding a counterparty has accumulated
//! across six independent dimensions, each normalized to [0, 1]:
//!
//! - **User profile**: who the founder/user is
//! - **Venture context**: what the venture is and where it stands
//! - **Business plan**: the plan itself
//! - **Market**: competitive and market landscape
//! - **Financial model**: numbers and projections
//! - **Team dynamics**: the people and how they work together
//!
//! Interaction events bump exactly one dimension by a fixed step. The overall
//! knowledge score is always the arithmetic mean of the six dimensions,
//! recomputed on every mutation rather than stored independently. Crossing a
//! knowledge milestone threshold unlocks it exactly once and permanently
//! raises the knowledge multiplier that feeds passive accrual.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Number of tracked knowledge dimensions
pub const DIMENSION_COUNT: usize = 6;

/// Lower clamp of the knowledge multiplier
pub const MIN_KNOWLEDGE_MULTIPLIER: f64 = 1.0;

/// Upper clamp of the knowledge multiplier
pub const MAX_KNOWLEDGE_MULTIPLIER: f64 = 3.0;

/// Weight of the overall knowledge score in the multiplier
pub const OVERALL_SCORE_WEIGHT: f64 = 0.5;

/// Weight of each achieved milestone's excess impact in the multiplier
pub const MILESTONE_IMPACT_WEIGHT: f64 = 0.3;

// ============================================================================
// DIMENSIONS
// ============================================================================

/// One of the six knowledge dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KnowledgeDimension {
    UserProfile,
    VentureContext,
    BusinessPlan,
    Market,
    FinancialModel,
    TeamDynamics,
}

impl KnowledgeDimension {
    /// All dimensions, in canonical order.
    pub const ALL: [KnowledgeDimension; DIMENSION_COUNT] = [
        KnowledgeDimension::UserProfile,
        KnowledgeDimension::VentureContext,
        KnowledgeDimension::BusinessPlan,
        KnowledgeDimension::Market,
        KnowledgeDimension::FinancialModel,
        KnowledgeDimension::TeamDynamics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeDimension::UserProfile => "user-profile",
            KnowledgeDimension::VentureContext => "venture-context",
            KnowledgeDimension::BusinessPlan => "business-plan",
            KnowledgeDimension::Market => "market",
            KnowledgeDimension::FinancialModel => "financial-model",
            KnowledgeDimension::TeamDynamics => "team-dynamics",
        }
    }
}

impl std::fmt::Display for KnowledgeDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// INTERACTION TYPES
// ============================================================================

/// An interaction event tag, as received from collaborating business logic.
///
/// Each tag maps to exactly one dimension with a fixed increment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionType {
    ProfileUpdate,
    VentureDiscussion,
    BusinessPlanReview,
    MarketAnalysis,
    FinancialModeling,
    TeamSession,
}

impl InteractionType {
    /// The single dimension this interaction feeds.
    pub fn dimension(&self) -> KnowledgeDimension {
        match self {
            InteractionType::ProfileUpdate => KnowledgeDimension::UserProfile,
            InteractionType::VentureDiscussion => KnowledgeDimension::VentureContext,
            InteractionType::BusinessPlanReview => KnowledgeDimension::BusinessPlan,
            InteractionType::MarketAnalysis => KnowledgeDimension::Market,
            InteractionType::FinancialModeling => KnowledgeDimension::FinancialModel,
            InteractionType::TeamSession => KnowledgeDimension::TeamDynamics,
        }
    }

    /// Fixed increment applied to the dimension, pre-clamp.
    pub fn step(&self) -> f64 {
        match self {
            InteractionType::ProfileUpdate => 0.05,
            InteractionType::VentureDiscussion => 0.05,
            InteractionType::BusinessPlanReview => 0.08,
            InteractionType::MarketAnalysis => 0.08,
            InteractionType::FinancialModeling => 0.10,
            InteractionType::TeamSession => 0.06,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::ProfileUpdate => "profile-update",
            InteractionType::VentureDiscussion => "venture-discussion",
            InteractionType::BusinessPlanReview => "business-plan-review",
            InteractionType::MarketAnalysis => "market-analysis",
            InteractionType::FinancialModeling => "financial-modeling",
            InteractionType::TeamSession => "team-session",
        }
    }

    /// Parse from string tag. Unknown tags fall back to venture discussion
    /// (configuration fallback, never an error).
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "profile-update" => InteractionType::ProfileUpdate,
            "venture-discussion" => InteractionType::VentureDiscussion,
            "business-plan-review" => InteractionType::BusinessPlanReview,
            "market-analysis" => InteractionType::MarketAnalysis,
            "financial-modeling" => InteractionType::FinancialModeling,
            "team-session" => InteractionType::TeamSession,
            other => {
                warn!(tag = other, "unknown interaction tag, treating as venture-discussion");
                InteractionType::VentureDiscussion
            }
        }
    }
}

impl std::fmt::Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// KNOWLEDGE MILESTONE CATALOG
// ============================================================================

/// An immutable knowledge milestone catalog entry.
///
/// Catalog entries are process-wide constants; only the achieved flag on the
/// paired [`KnowledgeMilestoneState`] is instance state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeMilestone {
    pub id: &'static str,
    pub name: &'static str,
    /// Overall knowledge score required to unlock
    pub required_score: f64,
    /// Impact factor folded into the knowledge multiplier once achieved
    pub impact: f64,
}

/// Default knowledge milestone catalog, ascending by required score.
pub const KNOWLEDGE_MILESTONES: &[KnowledgeMilestone] = &[
    KnowledgeMilestone {
        id: "first-insights",
        name: "First Insights",
        required_score: 0.25,
        impact: 1.1,
    },
    KnowledgeMilestone {
        id: "working-knowledge",
        name: "Working Knowledge",
        required_score: 0.50,
        impact: 1.25,
    },
    KnowledgeMilestone {
        id: "deep-context",
        name: "Deep Context",
        required_score: 0.75,
        impact: 1.5,
    },
    KnowledgeMilestone {
        id: "domain-mastery",
        name: "Domain Mastery",
        required_score: 0.90,
        impact: 2.0,
    },
];

/// Mutable achievement state for one knowledge milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeMilestoneState {
    /// Catalog id this state tracks
    pub id: String,
    /// Transitions false -> true exactly once, never reverts
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
}

// ============================================================================
// KNOWLEDGE DEPTH
// ============================================================================

/// Per-dimension knowledge accumulation plus milestone unlock state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeDepth {
    pub user_profile: f64,
    pub venture_context: f64,
    pub business_plan: f64,
    pub market: f64,
    pub financial_model: f64,
    pub team_dynamics: f64,
    /// Always the arithmetic mean of the six dimensions, recomputed on every
    /// mutation (never authoritative on its own)
    pub overall_knowledge_score: f64,
    /// Unlock state per catalog entry, in catalog order
    pub milestones: Vec<KnowledgeMilestoneState>,
}

impl KnowledgeDepth {
    /// Create a fresh depth tracker seeded from a milestone catalog.
    pub fn new(catalog: &[KnowledgeMilestone]) -> Self {
        Self {
            user_profile: 0.0,
            venture_context: 0.0,
            business_plan: 0.0,
            market: 0.0,
            financial_model: 0.0,
            team_dynamics: 0.0,
            overall_knowledge_score: 0.0,
            milestones: catalog
                .iter()
                .map(|m| KnowledgeMilestoneState {
                    id: m.id.to_string(),
                    achieved: false,
                    achieved_at: None,
                })
                .collect(),
        }
    }

    /// Read one dimension.
    pub fn dimension(&self, dim: KnowledgeDimension) -> f64 {
        match dim {
            KnowledgeDimension::UserProfile => self.user_profile,
            KnowledgeDimension::VentureContext => self.venture_context,
            KnowledgeDimension::BusinessPlan => self.business_plan,
            KnowledgeDimension::Market => self.market,
            KnowledgeDimension::FinancialModel => self.financial_model,
            KnowledgeDimension::TeamDynamics => self.team_dynamics,
        }
    }

    fn dimension_mut(&mut self, dim: KnowledgeDimension) -> &mut f64 {
        match dim {
            KnowledgeDimension::UserProfile => &mut self.user_profile,
            KnowledgeDimension::VentureContext => &mut self.venture_context,
            KnowledgeDimension::BusinessPlan => &mut self.business_plan,
            KnowledgeDimension::Market => &mut self.market,
            KnowledgeDimension::FinancialModel => &mut self.financial_model,
            KnowledgeDimension::TeamDynamics => &mut self.team_dynamics,
        }
    }

    /// Recompute the overall score as the mean of the six dimensions.
    pub fn recompute_overall(&mut self) {
        let sum = self.user_profile
            + self.venture_context
            + self.business_plan
            + self.market
            + self.financial_model
            + self.team_dynamics;
        self.overall_knowledge_score = sum / DIMENSION_COUNT as f64;
    }

    /// Record one interaction event.
    ///
    /// Bumps the mapped dimension by the interaction's fixed step (clamped to
    /// 1.0), recomputes the overall score, then unlocks any not-yet-achieved
    /// milestones whose threshold is now met. Already-achieved milestones are
    /// untouched, so repeated calls are idempotent with respect to unlocks.
    ///
    /// Returns ids of milestones newly unlocked by this interaction.
    pub fn record_interaction(
        &mut self,
        interaction: InteractionType,
        catalog: &[KnowledgeMilestone],
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let dim = interaction.dimension();
        let slot = self.dimension_mut(dim);
        *slot = (*slot + interaction.step()).clamp(0.0, 1.0);
        self.recompute_overall();

        debug!(
            interaction = %interaction,
            dimension = %dim,
            overall = self.overall_knowledge_score,
            "knowledge interaction recorded"
        );

        self.unlock_milestones(catalog, now)
    }

    /// Mark every unachieved milestone whose threshold is met. Idempotent.
    pub fn unlock_milestones(
        &mut self,
        catalog: &[KnowledgeMilestone],
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let mut unlocked = Vec::new();
        for entry in catalog {
            if entry.required_score > self.overall_knowledge_score {
                continue;
            }
            if let Some(state) = self.milestones.iter_mut().find(|s| s.id == entry.id) {
                if !state.achieved {
                    state.achieved = true;
                    state.achieved_at = Some(now);
                    unlocked.push(state.id.clone());
                }
            }
        }
        unlocked
    }

    /// Apply a multiplicative retention rate to every dimension.
    ///
    /// Used by cross-venture transfer: knowledge decays, the score does not.
    /// The overall score is recomputed from the decayed dimensions (the mean
    /// scales by the same rate, so the invariant holds either way).
    pub fn apply_retention_rate(&mut self, rate: f64) {
        for dim in KnowledgeDimension::ALL {
            let slot = self.dimension_mut(dim);
            *slot = (*slot * rate).clamp(0.0, 1.0);
        }
        self.recompute_overall();
    }

    /// The knowledge multiplier fed into passive accrual.
    ///
    /// `1.0 + 0.5 * overall + sum(0.3 * (impact - 1))` over achieved
    /// milestones, clamped to [1.0, 3.0]. Feeds accrual only; it never
    /// retroactively changes past score.
    pub fn knowledge_multiplier(&self, catalog: &[KnowledgeMilestone]) -> f64 {
        let mut multiplier = 1.0 + OVERALL_SCORE_WEIGHT * self.overall_knowledge_score;
        for entry in catalog {
            let achieved = self
                .milestones
                .iter()
                .any(|s| s.achieved && s.id == entry.id);
            if achieved {
                multiplier += MILESTONE_IMPACT_WEIGHT * (entry.impact - 1.0);
            }
        }
        multiplier.clamp(MIN_KNOWLEDGE_MULTIPLIER, MAX_KNOWLEDGE_MULTIPLIER)
    }
}

// ============================================================================
// TESTS
// ============================================================================
