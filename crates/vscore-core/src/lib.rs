//! # VScore Core
//!
//! Vested-interest scoring engine: tracks how deeply a counterparty (an AI
//! collaborator, an advisor, a partner role) is invested in a venture as a
//! continuously-growing V-Score, a named engagement phase, per-dimension
//! knowledge depth, and eligibility to carry standing into another venture.
//!
//! - **Passive accrual**: a per-minute tick compounding base rate,
//!   performance, knowledge multiplier, and retention bonus
//! - **Milestone vesting**: multiplicative boosts on discrete completions,
//!   with one-time cliff bonuses at fixed score thresholds
//! - **Knowledge depth**: six normalized dimensions modulating accrual
//! - **Retention modeling**: streaks, engagement score, churn-risk buckets
//! - **Achievements**: idempotent rule-based badge unlocking
//! - **Transfer gate**: gated cross-venture moves with knowledge decay
//!
//! ## Quick Start
//!
//! ```rust
//! use vscore_core::{Milestone, Persona, VScoreEngine};
//!
//! let engine = VScoreEngine::new("venture-a", Persona::Founder)?;
//!
//! // Passive growth tick (normally driven by the AccrualTicker)
//! engine.tick();
//!
//! // A milestone completion multiplies the score
//! let milestone = Milestone {
//!     milestone_type: Some("first-revenue".to_string()),
//!     ..Default::default()
//! };
//! let outcome = engine.complete_milestone(&milestone, None);
//! assert!(outcome.final_multiplier > 1.0);
//!
//! // Knowledge interactions deepen context and speed up accrual
//! engine.record_interaction("market-analysis");
//! # Ok::<(), vscore_core::EngineError>(())
//! ```
//!
//! ## Concurrency model
//!
//! One engine owns one snapshot; commands are linearized behind a single
//! lock and persistence runs outside the critical section. There is no
//! cross-venture shared mutable state — transfers append a record locally
//! and only decay knowledge.

// ============================================================================
// MODULES
// ============================================================================

pub mod accrual;
pub mod achievement;
pub mod catalog;
pub mod engine;
pub mod knowledge;
pub mod metrics;
pub mod milestone;
pub mod phase;
pub mod retention;
pub mod storage;
pub mod transfer;
pub mod vesting;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Engine surface
pub use engine::{
    AccrualTicker, Clock, EngineBuilder, EngineError, ManualClock, Observer, Result, SystemClock,
    VScoreEngine, DEFAULT_TICK_PERIOD,
};

// Aggregate and catalogs
pub use catalog::Catalogs;
pub use metrics::{Metrics, INITIAL_SCORE};

// Phase classification
pub use phase::{classify, phase_info, progress_to_next, Phase, PhaseInfo, PhaseProgress};

// Knowledge depth
pub use knowledge::{
    InteractionType, KnowledgeDepth, KnowledgeDimension, KnowledgeMilestone,
    KnowledgeMilestoneState, KNOWLEDGE_MILESTONES,
};

// Retention
pub use retention::{RetentionMetrics, RetentionRisk};

// Milestones and cliffs
pub use milestone::{
    CliffMilestone, CliffState, Milestone, MilestoneCategory, MilestoneOutcome, MilestoneType,
    CLIFF_MILESTONES, MILESTONE_TYPES,
};

// Accrual
pub use accrual::{TickOutcome, TICK_MINUTES};

// Achievements
pub use achievement::{Achievement, AchievementRule};

// Transfer
pub use transfer::{
    TransferBlock, TransferEligibility, TransferOutcome, TransferRecord,
    KNOWLEDGE_RETENTION_RATE, TRANSFER_COOLDOWN_DAYS,
};

// Vesting
pub use vesting::{Persona, VestingSchedule, VestingScheduleUpdate};

// Storage layer
pub use storage::{JsonFileStore, MemoryStore, SnapshotStore, SqliteStore, StoreError};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Catalogs, EngineError, InteractionType, ManualClock, Metrics, Milestone,
        MilestoneOutcome, Persona, Phase, RetentionRisk, SnapshotStore, TickOutcome,
        TransferBlock, TransferOutcome, VScoreEngine, VestingScheduleUpdate,
    };
}
