//! Phase Classification
//!
//! Maps a V-Score onto a fixed ladder of named engagement phases. The
//! classifier is a pure function over a descending threshold table: the first
//! phase whose minimum score is at or below the input wins. Two snapshots
//! with the same score always land in the same phase, so the phase is never
//! stored authoritatively — it is recomputed after every mutation.

use serde::{Deserialize, Serialize};

// ============================================================================
// PHASE ENUM
// ============================================================================

/// A named band of V-Score values.
///
/// Phases are ordered: `Observer < Contributor < Stakeholder < Partner <
/// Cofounder < Legend`. Consumers use the phase for tone and behavior
/// selection; the engine only ever derives it from the current score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Watching from the sidelines, minimal stake
    #[default]
    Observer,
    /// First real contributions landed
    Contributor,
    /// Meaningful standing in the venture
    Stakeholder,
    /// Trusted partner with deep involvement
    Partner,
    /// Effectively a co-founder level of investment
    Cofounder,
    /// Maximum vested standing
    Legend,
}

impl Phase {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Observer => "observer",
            Phase::Contributor => "contributor",
            Phase::Stakeholder => "stakeholder",
            Phase::Partner => "partner",
            Phase::Cofounder => "cofounder",
            Phase::Legend => "legend",
        }
    }

    /// Parse from string name.
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "observer" => Phase::Observer,
            "contributor" => Phase::Contributor,
            "stakeholder" => Phase::Stakeholder,
            "partner" => Phase::Partner,
            "cofounder" => Phase::Cofounder,
            "legend" => Phase::Legend,
            _ => Phase::Observer,
        }
    }

    /// Human-readable description for display surfaces.
    pub fn description(&self) -> &'static str {
        match self {
            Phase::Observer => "Watching the venture with minimal vested stake",
            Phase::Contributor => "Actively contributing, early stake forming",
            Phase::Stakeholder => "Meaningful standing and sustained involvement",
            Phase::Partner => "Trusted partner, deeply invested in outcomes",
            Phase::Cofounder => "Co-founder level commitment to the venture",
            Phase::Legend => "Maximum vested standing",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// THRESHOLD TABLE
// ============================================================================

/// Phase thresholds, sorted descending by minimum score.
///
/// The classifier scans top-down and returns the first entry whose minimum
/// is at or below the score. The last entry must be the zero-threshold floor
/// so classification is total for any non-negative score.
pub const PHASE_TABLE: &[(Phase, f64)] = &[
    (Phase::Legend, 50.0),
    (Phase::Cofounder, 25.0),
    (Phase::Partner, 10.0),
    (Phase::Stakeholder, 5.0),
    (Phase::Contributor, 2.0),
    (Phase::Observer, 0.0),
];

/// Classify a V-Score into its phase.
///
/// Pure and total: negative inputs (which the engine never produces, scores
/// are floored at zero) fall through to the lowest phase.
pub fn classify(score: f64) -> Phase {
    for &(phase, min) in PHASE_TABLE {
        if score >= min {
            return phase;
        }
    }
    Phase::Observer
}

// ============================================================================
// PHASE QUERIES
// ============================================================================

/// Resolved phase information for a given score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseInfo {
    /// The phase the score falls in
    pub phase: Phase,
    /// Minimum score of the current phase
    pub min_score: f64,
    /// The next phase up, if any
    pub next_phase: Option<Phase>,
    /// Minimum score required for the next phase, if any
    pub next_min_score: Option<f64>,
    /// Human-readable description of the current phase
    pub description: String,
}

/// Progress toward the next phase boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    /// Current phase
    pub phase: Phase,
    /// Fraction of the way from the current phase floor to the next
    /// threshold, in [0, 1]. 1.0 when already in the top phase.
    pub fraction: f64,
    /// Score points still needed to reach the next phase (0.0 at the top)
    pub points_remaining: f64,
}

/// Resolve full phase info for a score.
pub fn phase_info(score: f64) -> PhaseInfo {
    let phase = classify(score);
    let idx = PHASE_TABLE
        .iter()
        .position(|&(p, _)| p == phase)
        .unwrap_or(PHASE_TABLE.len() - 1);
    let min_score = PHASE_TABLE[idx].1;
    // Table is descending, so the next phase up sits at idx - 1.
    let next = idx.checked_sub(1).map(|i| PHASE_TABLE[i]);
    PhaseInfo {
        phase,
        min_score,
        next_phase: next.map(|(p, _)| p),
        next_min_score: next.map(|(_, m)| m),
        description: phase.description().to_string(),
    }
}

/// Compute progress from the current phase floor to the next threshold.
pub fn progress_to_next(score: f64) -> PhaseProgress {
    let info = phase_info(score);
    match info.next_min_score {
        Some(next_min) => {
            let span = (next_min - info.min_score).max(f64::EPSILON);
            let fraction = ((score - info.min_score) / span).clamp(0.0, 1.0);
            PhaseProgress {
                phase: info.phase,
                fraction,
                points_remaining: (next_min - score).max(0.0),
            }
        }
        None => PhaseProgress {
            phase: info.phase,
            fraction: 1.0,
            points_remaining: 0.0,
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================
