//! Test Fixtures
//!
//! Builders for deterministic engine setups: every engine runs on a
//! [`ManualClock`] so day boundaries, streaks, and cooldowns can be driven
//! explicitly without wall-clock waits.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use vscore_core::{ManualClock, Persona, SnapshotStore, VScoreEngine};

/// A fixed, readable starting instant for journeys.
pub fn start_of_journey() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
}

/// Engine on a manual clock, no persistence.
pub fn manual_engine(subject: &str, persona: Persona) -> (Arc<ManualClock>, VScoreEngine) {
    let clock = Arc::new(ManualClock::new(start_of_journey()));
    let engine = VScoreEngine::builder(subject)
        .persona(persona)
        .clock(clock.clone())
        .build()
        .expect("engine construction");
    (clock, engine)
}

/// Engine on a manual clock backed by the given store.
pub fn persistent_engine(
    subject: &str,
    persona: Persona,
    store: Arc<dyn SnapshotStore>,
) -> (Arc<ManualClock>, VScoreEngine) {
    let clock = Arc::new(ManualClock::new(start_of_journey()));
    let engine = VScoreEngine::builder(subject)
        .persona(persona)
        .clock(clock.clone())
        .store(store)
        .build()
        .expect("engine construction");
    (clock, engine)
}

/// Drive every knowledge dimension up with repeated interactions until the
/// overall score clears `target`.
pub fn deepen_knowledge(engine: &VScoreEngine, target: f64) {
    let tags = [
        "profile-update",
        "venture-discussion",
        "business-plan-review",
        "market-analysis",
        "financial-modeling",
        "team-session",
    ];
    for _ in 0..40 {
        for tag in tags {
            engine.record_interaction(tag);
        }
        if engine.metrics().knowledge_depth.overall_knowledge_score >= target {
            return;
        }
    }
    panic!("knowledge target {target} not reached");
}
