//! Catalog Bundle
//!
//! Fixed rule catalogs, kept as plain data and handed to the engine at
//! construction time so alternate catalogs (per-tenant, tests) need no code
//! changes. Defaults mirror the process-wide constant tables; the achieved
//! flags live in the snapshot, never here.

use crate::achievement::{default_rules, AchievementRule};
use crate::knowledge::{KnowledgeMilestone, KNOWLEDGE_MILESTONES};
use crate::milestone::{CliffMilestone, MilestoneType, CLIFF_MILESTONES, MILESTONE_TYPES};

/// All rule catalogs consulted by the engine.
#[derive(Debug, Clone)]
pub struct Catalogs {
    /// Cliff bonuses, ascending by threshold
    pub cliff_milestones: Vec<CliffMilestone>,
    /// Knowledge milestones, ascending by required score
    pub knowledge_milestones: Vec<KnowledgeMilestone>,
    /// Milestone types; the first entry is the unknown-id fallback
    pub milestone_types: Vec<MilestoneType>,
    /// Achievement rules
    pub achievement_rules: Vec<AchievementRule>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            cliff_milestones: CLIFF_MILESTONES.to_vec(),
            knowledge_milestones: KNOWLEDGE_MILESTONES.to_vec(),
            milestone_types: MILESTONE_TYPES.to_vec(),
            achievement_rules: default_rules(),
        }
    }
}

impl Catalogs {
    /// Validate catalog preconditions the engine relies on.
    ///
    /// The milestone-type fallback requires a non-empty type table; an empty
    /// one is a corrupt-catalog condition, fatal at construction.
    pub fn validate(&self) -> Result<(), String> {
        if self.milestone_types.is_empty() {
            return Err("milestone type catalog must not be empty".to_string());
        }
        for pair in self.cliff_milestones.windows(2) {
            if pair[0].min_score > pair[1].min_score {
                return Err("cliff catalog must be ascending by min score".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogs_validate() {
        assert!(Catalogs::default().validate().is_ok());
    }

    #[test]
    fn test_empty_type_catalog_rejected() {
        let mut catalogs = Catalogs::default();
        catalogs.milestone_types.clear();
        assert!(catalogs.validate().is_err());
    }

    #[test]
    fn test_unordered_cliffs_rejected() {
        let mut catalogs = Catalogs::default();
        catalogs.cliff_milestones.reverse();
        assert!(catalogs.validate().is_err());
    }
}
