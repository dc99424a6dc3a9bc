//! Cross-Venture Transfer Gate
//!
//! Gates moving accumulated standing to a different venture context and
//! applies knowledge decay when the move happens. Three checks gate a
//! transfer, evaluated in a fixed order: minimum V-Score, minimum overall
//! knowledge, cooldown days since the last transfer. An ineligible request
//! is a structured refusal naming the first failing check — never an error.
//!
//! On a successful transfer the six knowledge dimensions decay by the fixed
//! retention rate and a [`TransferRecord`] is appended; the numeric score is
//! deliberately untouched. Only knowledge decays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::metrics::Metrics;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Days that must elapse between transfers
pub const TRANSFER_COOLDOWN_DAYS: u32 = 30;

/// Default minimum V-Score required to transfer
pub const DEFAULT_MINIMUM_VSCORE: f64 = 5.0;

/// Default overall knowledge score required to transfer
pub const DEFAULT_KNOWLEDGE_REQUIREMENT: f64 = 0.7;

/// Fraction of each knowledge dimension retained across a transfer
pub const KNOWLEDGE_RETENTION_RATE: f64 = 0.8;

/// Retention rate when transfer protection is active
pub const PROTECTED_RETENTION_RATE: f64 = 0.9;

// ============================================================================
// TRANSFER RECORD
// ============================================================================

/// Immutable log entry for one completed transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub id: Uuid,
    pub from_venture: String,
    pub to_venture: String,
    pub transfer_date: DateTime<Utc>,
    /// V-Score at the moment of transfer (unchanged by the transfer itself)
    pub vscore_at_transfer: f64,
    /// Retention rate applied to the knowledge dimensions
    pub knowledge_retained: f64,
}

// ============================================================================
// ELIGIBILITY
// ============================================================================

/// Transfer gating state carried in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEligibility {
    /// Recomputed from the gating rule after every tick/transfer
    pub can_transfer: bool,
    /// Minimum V-Score required
    pub minimum_vscore: f64,
    /// Minimum overall knowledge score required
    pub knowledge_requirement: f64,
    /// Days since the last transfer (counts up one per tick day)
    pub transfer_cooldown_days: u32,
    /// When set, transfers retain knowledge at the protected rate
    pub transfer_protection: bool,
    /// Ordered transfer log, oldest first
    pub transfer_history: Vec<TransferRecord>,
}

impl Default for TransferEligibility {
    fn default() -> Self {
        Self {
            can_transfer: false,
            minimum_vscore: DEFAULT_MINIMUM_VSCORE,
            knowledge_requirement: DEFAULT_KNOWLEDGE_REQUIREMENT,
            // A context that has never transferred is not cooldown-gated.
            transfer_cooldown_days: TRANSFER_COOLDOWN_DAYS,
            transfer_protection: false,
            transfer_history: Vec::new(),
        }
    }
}

impl TransferEligibility {
    /// Retention rate in effect for the next transfer.
    pub fn retention_rate(&self) -> f64 {
        if self.transfer_protection {
            PROTECTED_RETENTION_RATE
        } else {
            KNOWLEDGE_RETENTION_RATE
        }
    }
}

/// The first failing eligibility condition, in check order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TransferBlock {
    /// V-Score below the minimum
    ScoreGap { required: f64, actual: f64 },
    /// Overall knowledge below the requirement
    KnowledgeGap { required: f64, actual: f64 },
    /// Cooldown not yet elapsed
    CooldownActive { days_remaining: u32 },
}

impl TransferBlock {
    /// Human-readable refusal reason.
    pub fn reason(&self) -> String {
        match self {
            TransferBlock::ScoreGap { required, actual } => {
                format!("V-Score {actual:.2} is below the required {required:.2}")
            }
            TransferBlock::KnowledgeGap { required, actual } => {
                format!("knowledge depth {actual:.2} is below the required {required:.2}")
            }
            TransferBlock::CooldownActive { days_remaining } => {
                format!("transfer cooldown has {days_remaining} day(s) remaining")
            }
        }
    }
}

/// Outcome of a transfer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    pub success: bool,
    /// Retention rate applied; 0.0 when the transfer was refused
    pub knowledge_retained: f64,
    /// Present when the transfer was refused
    pub blocked: Option<TransferBlock>,
    /// Present when the transfer succeeded
    pub record: Option<TransferRecord>,
}

// ============================================================================
// GATING AND TRANSFER
// ============================================================================

/// Evaluate the gating rule. Returns the first failing condition, checking
/// score, then knowledge, then cooldown.
pub fn check_eligibility(metrics: &Metrics) -> Option<TransferBlock> {
    let elig = &metrics.transfer_eligibility;
    if metrics.current_score < elig.minimum_vscore {
        return Some(TransferBlock::ScoreGap {
            required: elig.minimum_vscore,
            actual: metrics.current_score,
        });
    }
    if metrics.knowledge_depth.overall_knowledge_score < elig.knowledge_requirement {
        return Some(TransferBlock::KnowledgeGap {
            required: elig.knowledge_requirement,
            actual: metrics.knowledge_depth.overall_knowledge_score,
        });
    }
    if elig.transfer_cooldown_days < TRANSFER_COOLDOWN_DAYS {
        return Some(TransferBlock::CooldownActive {
            days_remaining: TRANSFER_COOLDOWN_DAYS - elig.transfer_cooldown_days,
        });
    }
    None
}

/// Execute a transfer to `to_venture`.
///
/// Ineligible requests return a refusal with zero knowledge retained and no
/// mutation of any kind. Eligible transfers decay every knowledge dimension
/// by the retention rate, append the log record, reset the cooldown, and
/// clear `can_transfer`; `current_score` is not touched.
pub fn transfer_to_venture(
    metrics: &mut Metrics,
    from_venture: &str,
    to_venture: &str,
    now: DateTime<Utc>,
) -> TransferOutcome {
    if let Some(blocked) = check_eligibility(metrics) {
        return TransferOutcome {
            success: false,
            knowledge_retained: 0.0,
            blocked: Some(blocked),
            record: None,
        };
    }

    let rate = metrics.transfer_eligibility.retention_rate();
    metrics.knowledge_depth.apply_retention_rate(rate);

    let record = TransferRecord {
        id: Uuid::new_v4(),
        from_venture: from_venture.to_string(),
        to_venture: to_venture.to_string(),
        transfer_date: now,
        vscore_at_transfer: metrics.current_score,
        knowledge_retained: rate,
    };
    metrics
        .transfer_eligibility
        .transfer_history
        .push(record.clone());
    metrics.transfer_eligibility.transfer_cooldown_days = 0;
    metrics.transfer_eligibility.can_transfer = false;
    metrics.refresh_derived(now);

    info!(
        from = from_venture,
        to = to_venture,
        retained = rate,
        score = metrics.current_score,
        "standing transferred to new venture"
    );

    TransferOutcome {
        success: true,
        knowledge_retained: rate,
        blocked: None,
        record: Some(record),
    }
}

// ============================================================================
// TESTS
// ============================================================================
