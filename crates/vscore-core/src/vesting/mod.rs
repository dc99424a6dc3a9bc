//! Vesting Schedules and Personas
//!
//! Persona-specific constants that shape how the V-Score grows: the passive
//! base rate, multiplier weights for milestones and cliffs, the performance
//! weighting, and the retention bonus rate. Schedules are seeded from a fixed
//! per-persona table and mutable only through explicit customization.

use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// PERSONA
// ============================================================================

/// A counterparty persona, selecting the initial vesting schedule.
///
/// Unknown persona strings fall back to [`Persona::Founder`] (configuration
/// fallback, never an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Founder,
    Hustler,
    Visionary,
    Operator,
    Analyst,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Founder => "founder",
            Persona::Hustler => "hustler",
            Persona::Visionary => "visionary",
            Persona::Operator => "operator",
            Persona::Analyst => "analyst",
        }
    }

    /// Parse from string name, falling back to the default persona.
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "founder" => Persona::Founder,
            "hustler" => Persona::Hustler,
            "visionary" => Persona::Visionary,
            "operator" => Persona::Operator,
            "analyst" => Persona::Analyst,
            other => {
                warn!(persona = other, "unknown persona, using founder schedule");
                Persona::Founder
            }
        }
    }

    /// Persona-specific bonus added to milestone performance evaluation.
    pub fn performance_bonus(&self) -> f64 {
        match self {
            Persona::Founder => 0.00,
            Persona::Hustler => 0.05,
            Persona::Visionary => 0.04,
            Persona::Operator => 0.03,
            Persona::Analyst => 0.02,
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VESTING SCHEDULE
// ============================================================================

/// Persona-derived constants controlling accrual and multiplier weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingSchedule {
    /// Passive growth per tick, before multipliers
    pub base_rate: f64,
    /// Persona milestone weighting (schedule metadata, carried and
    /// customizable; the milestone path uses catalog multipliers)
    pub milestone_multiplier: f64,
    /// Persona cliff weighting (schedule metadata, as above)
    pub cliff_multiplier: f64,
    /// Weight applied to per-completion performance in milestone boosts
    pub performance_multiplier: f64,
    /// Rate converting engagement score into the per-tick retention bonus
    pub retention_bonus: f64,
}

impl VestingSchedule {
    /// Look up the fixed schedule for a persona.
    pub fn for_persona(persona: Persona) -> Self {
        match persona {
            Persona::Founder => Self {
                base_rate: 0.010,
                milestone_multiplier: 1.5,
                cliff_multiplier: 2.0,
                performance_multiplier: 1.2,
                retention_bonus: 0.005,
            },
            Persona::Hustler => Self {
                base_rate: 0.012,
                milestone_multiplier: 1.6,
                cliff_multiplier: 2.0,
                performance_multiplier: 1.25,
                retention_bonus: 0.006,
            },
            Persona::Visionary => Self {
                base_rate: 0.011,
                milestone_multiplier: 1.7,
                cliff_multiplier: 2.2,
                performance_multiplier: 1.15,
                retention_bonus: 0.005,
            },
            Persona::Operator => Self {
                base_rate: 0.009,
                milestone_multiplier: 1.4,
                cliff_multiplier: 1.9,
                performance_multiplier: 1.3,
                retention_bonus: 0.007,
            },
            Persona::Analyst => Self {
                base_rate: 0.008,
                milestone_multiplier: 1.3,
                cliff_multiplier: 1.8,
                performance_multiplier: 1.35,
                retention_bonus: 0.004,
            },
        }
    }

    /// Apply a partial customization, leaving unset fields untouched.
    pub fn apply(&mut self, update: &VestingScheduleUpdate) {
        if let Some(v) = update.base_rate {
            self.base_rate = v.max(0.0);
        }
        if let Some(v) = update.milestone_multiplier {
            self.milestone_multiplier = v.max(0.0);
        }
        if let Some(v) = update.cliff_multiplier {
            self.cliff_multiplier = v.max(0.0);
        }
        if let Some(v) = update.performance_multiplier {
            self.performance_multiplier = v.max(0.0);
        }
        if let Some(v) = update.retention_bonus {
            self.retention_bonus = v.max(0.0);
        }
    }
}

impl Default for VestingSchedule {
    fn default() -> Self {
        Self::for_persona(Persona::Founder)
    }
}

/// Partial schedule customization. `None` fields are left as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingScheduleUpdate {
    pub base_rate: Option<f64>,
    pub milestone_multiplier: Option<f64>,
    pub cliff_multiplier: Option<f64>,
    pub performance_multiplier: Option<f64>,
    pub retention_bonus: Option<f64>,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_persona_falls_back_to_founder() {
        let persona = Persona::parse_name("wizard");
        assert_eq!(persona, Persona::Founder);
        assert_eq!(
            VestingSchedule::for_persona(persona),
            VestingSchedule::default()
        );
    }

    #[test]
    fn test_persona_schedules_differ() {
        let founder = VestingSchedule::for_persona(Persona::Founder);
        let hustler = VestingSchedule::for_persona(Persona::Hustler);
        assert!(hustler.base_rate > founder.base_rate);
    }

    #[test]
    fn test_partial_update_leaves_rest_untouched() {
        let mut schedule = VestingSchedule::default();
        schedule.apply(&VestingScheduleUpdate {
            base_rate: Some(0.02),
            ..Default::default()
        });
        assert_eq!(schedule.base_rate, 0.02);
        assert_eq!(schedule.performance_multiplier, 1.2);
        assert_eq!(schedule.retention_bonus, 0.005);
    }

    #[test]
    fn test_update_floors_negative_values() {
        let mut schedule = VestingSchedule::default();
        schedule.apply(&VestingScheduleUpdate {
            base_rate: Some(-1.0),
            ..Default::default()
        });
        assert_eq!(schedule.base_rate, 0.0);
    }
}
