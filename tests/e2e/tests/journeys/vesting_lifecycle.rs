//! Journey: a counterparty vests into a venture over weeks of engagement.
//!
//! Drives the engine the way the surrounding product does — daily accrual
//! ticks, knowledge interactions, milestone completions — and checks the
//! emergent behavior: streaks, phase progression, cliff one-shots, and
//! idempotent achievements.

use chrono::Duration;
use vscore_core::{Milestone, Persona, Phase, RetentionRisk};
use vscore_e2e_tests::fixtures::{deepen_knowledge, manual_engine};

#[test]
fn daily_engagement_builds_streak_and_score() {
    let (clock, engine) = manual_engine("venture-daily", Persona::Founder);

    let start_score = engine.metrics().current_score;
    engine.tick();
    for _ in 0..9 {
        clock.advance(Duration::days(1));
        engine.tick();
    }

    let m = engine.metrics();
    assert_eq!(m.streak_days, 9);
    assert_eq!(m.time_invested_minutes, 10);
    assert_eq!(m.retention_metrics.total_sessions, 10);
    assert_eq!(m.retention_metrics.retention_risk, RetentionRisk::Low);
    assert!(m.current_score > start_score);
    assert!(m.max_score >= m.current_score);
}

#[test]
fn lapse_resets_streak_but_not_score() {
    let (clock, engine) = manual_engine("venture-lapse", Persona::Founder);

    engine.tick();
    for _ in 0..5 {
        clock.advance(Duration::days(1));
        engine.tick();
    }
    let before = engine.metrics();
    assert_eq!(before.streak_days, 5);

    clock.advance(Duration::days(4));
    engine.tick();
    let after = engine.metrics();
    assert_eq!(after.streak_days, 0);
    assert_eq!(after.retention_metrics.retention_risk, RetentionRisk::High);
    assert!(after.current_score > before.current_score);
}

#[test]
fn milestones_compound_and_phase_climbs() {
    let (clock, engine) = manual_engine("venture-milestones", Persona::Hustler);
    assert_eq!(engine.metrics().phase, Phase::Observer);

    let revenue = Milestone {
        milestone_type: Some("first-revenue".to_string()),
        ..Default::default()
    };

    let mut last_phase = Phase::Observer;
    for _ in 0..4 {
        clock.advance(Duration::days(1));
        engine.tick();
        engine.complete_milestone(&revenue, None);
        let phase = engine.metrics().phase;
        assert!(phase >= last_phase, "phase never moves backwards on growth");
        last_phase = phase;
    }

    let m = engine.metrics();
    assert!(m.current_score > 10.0);
    assert_eq!(m.milestones_completed, 4);
    assert!(m.phase >= Phase::Partner);
}

#[test]
fn cliffs_fire_exactly_once_on_the_way_up() {
    let (_clock, engine) = manual_engine("venture-cliffs", Persona::Founder);
    let funding = Milestone {
        milestone_type: Some("funding-round".to_string()),
        ..Default::default()
    };

    let mut fired = Vec::new();
    for _ in 0..6 {
        let outcome = engine.complete_milestone(&funding, None);
        if let Some(id) = outcome.cliff_fired {
            fired.push(id);
        }
    }

    // Every cliff id is unique: no cliff ever reapplies.
    let mut unique = fired.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), fired.len());
    assert!(fired.contains(&"traction-cliff".to_string()));

    let m = engine.metrics();
    let achieved: Vec<_> = m.cliff_milestones.iter().filter(|c| c.achieved).collect();
    assert_eq!(achieved.len(), fired.len());
}

#[test]
fn knowledge_depth_accelerates_accrual() {
    let (_clock, engine) = manual_engine("venture-knowledge", Persona::Founder);

    let shallow_delta = engine.tick().delta;
    deepen_knowledge(&engine, 0.5);
    let deep_delta = engine.tick().delta;

    assert!(
        deep_delta > shallow_delta,
        "knowledge multiplier must speed up passive growth"
    );

    let m = engine.metrics();
    let achieved: Vec<_> = m
        .knowledge_depth
        .milestones
        .iter()
        .filter(|s| s.achieved)
        .map(|s| s.id.clone())
        .collect();
    assert!(achieved.contains(&"first-insights".to_string()));
    assert!(achieved.contains(&"working-knowledge".to_string()));
}

#[test]
fn achievements_accumulate_without_duplicates() {
    let (clock, engine) = manual_engine("venture-badges", Persona::Operator);

    let product = Milestone {
        milestone_type: Some("product-launch".to_string()),
        ..Default::default()
    };
    engine.complete_milestone(&product, None);
    for _ in 0..35 {
        clock.advance(Duration::days(1));
        engine.tick();
    }

    let m = engine.metrics();
    let ids: Vec<&str> = m.achievements.iter().map(|a| a.id.as_str()).collect();
    assert!(ids.contains(&"first-milestone"));
    assert!(ids.contains(&"true-believer"));

    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len(), "no duplicate achievement ids");

    // Re-running the same commands on an unchanged day adds nothing new.
    let count = m.achievements.len();
    engine.tick();
    assert!(engine.metrics().achievements.len() >= count);
}

#[test]
fn unknown_inputs_fall_back_instead_of_failing() {
    let (_clock, engine) = manual_engine("venture-fallback", Persona::Founder);

    // Unknown milestone type resolves to the first catalog entry.
    let outcome = engine.complete_milestone(&Milestone::default(), Some("moon-landing"));
    assert_eq!(outcome.milestone_type_id, "product-launch");

    // Unknown interaction tag lands on the default dimension.
    engine.record_interaction("not-a-real-tag");
    assert!(engine.metrics().knowledge_depth.venture_context > 0.0);
}

#[test]
fn manual_adjustment_clamps_at_zero_and_skips_cascades() {
    let (_clock, engine) = manual_engine("venture-manual", Persona::Founder);

    let score = engine.update_score(-50.0, "correction test");
    assert_eq!(score, 0.0);

    engine.update_score(30.0, "manual grant");
    let m = engine.metrics();
    assert!(!m.cliff_milestones.iter().any(|c| c.achieved));
    assert!(m.achievements.is_empty());
}
