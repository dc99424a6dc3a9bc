//! V-Score Engine
//!
//! The service object owning one [`Metrics`] snapshot per subject/venture
//! context. All external events — accrual ticks, milestone completions,
//! interaction events, transfer requests, resets — enter through command
//! methods here. Commands are linearized behind a single mutex so two
//! near-simultaneous mutations never read-modify-write from a stale base;
//! every transition function is pure and O(catalog size), so the critical
//! section is effectively instantaneous. Persistence happens outside the
//! lock, after the mutation commits; commits carry a sequence number taken
//! under the state lock, and a commit that lost the race to a newer one is
//! dropped so the store's last write never regresses.
//!
//! Consumers observe snapshot changes through an explicit subscriber list
//! rather than any framework-specific reactivity.

mod clock;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ticker::{AccrualTicker, DEFAULT_TICK_PERIOD};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::accrual::{accrue_tick, TickOutcome};
use crate::achievement::check_achievements;
use crate::catalog::Catalogs;
use crate::metrics::Metrics;
use crate::milestone::{self, Milestone, MilestoneOutcome};
use crate::phase::{self, PhaseInfo, PhaseProgress};
use crate::storage::{SnapshotStore, StoreError};
use crate::transfer::{self, TransferBlock, TransferOutcome};
use crate::vesting::{Persona, VestingScheduleUpdate};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Engine error type. Business-rule refusals are structured results, not
/// errors; only persistence failures and corrupt catalogs surface here.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Persistence error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    /// Corrupt catalog at construction
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Engine result type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Snapshot observer callback.
pub type Observer = Box<dyn Fn(&Metrics) + Send + Sync>;

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`VScoreEngine`].
pub struct EngineBuilder {
    subject: String,
    persona: Persona,
    catalogs: Catalogs,
    clock: Arc<dyn Clock>,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl EngineBuilder {
    /// Select the persona seeding the vesting schedule. Unknown persona
    /// strings should be resolved with [`Persona::parse_name`] first.
    pub fn persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Replace the default rule catalogs.
    pub fn catalogs(mut self, catalogs: Catalogs) -> Self {
        self.catalogs = catalogs;
        self
    }

    /// Inject a clock (tests use [`ManualClock`]).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach a persistence store. The engine loads an existing snapshot at
    /// build time and saves after every committed mutation.
    pub fn store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate catalogs, load or seed the snapshot, and construct the
    /// engine. A corrupt catalog is the one fatal initialization failure.
    pub fn build(self) -> Result<VScoreEngine> {
        self.catalogs
            .validate()
            .map_err(EngineError::InvalidCatalog)?;

        let now = self.clock.now();
        let state = match &self.store {
            Some(store) => match store.load(&self.subject)? {
                Some(metrics) => metrics,
                None => Metrics::new(self.persona, &self.catalogs, now),
            },
            None => Metrics::new(self.persona, &self.catalogs, now),
        };

        let engine = VScoreEngine {
            subject: self.subject,
            state: Mutex::new(state),
            catalogs: self.catalogs,
            clock: self.clock,
            store: self.store,
            observers: Mutex::new(Vec::new()),
            mutation_seq: AtomicU64::new(0),
            committed_seq: Mutex::new(0),
        };
        engine.persist_current();
        Ok(engine)
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// The vested-interest scoring engine for one subject/venture context.
pub struct VScoreEngine {
    subject: String,
    state: Mutex<Metrics>,
    catalogs: Catalogs,
    clock: Arc<dyn Clock>,
    store: Option<Arc<dyn SnapshotStore>>,
    observers: Mutex<Vec<Observer>>,
    mutation_seq: AtomicU64,
    committed_seq: Mutex<u64>,
}

impl VScoreEngine {
    /// Start building an engine for a subject id.
    pub fn builder(subject: impl Into<String>) -> EngineBuilder {
        EngineBuilder {
            subject: subject.into(),
            persona: Persona::default(),
            catalogs: Catalogs::default(),
            clock: Arc::new(SystemClock),
            store: None,
        }
    }

    /// Convenience constructor with default catalogs and the system clock.
    pub fn new(subject: impl Into<String>, persona: Persona) -> Result<Self> {
        Self::builder(subject).persona(persona).build()
    }

    /// The subject/venture context this engine owns.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Current snapshot (cloned; the live state never escapes the lock).
    pub fn metrics(&self) -> Metrics {
        self.state.lock().expect("state lock poisoned").clone()
    }

    /// Register a snapshot observer, invoked after every committed mutation.
    pub fn subscribe(&self, observer: Observer) {
        self.observers
            .lock()
            .expect("observer lock poisoned")
            .push(observer);
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply one passive accrual tick. Scheduled by [`AccrualTicker`] while
    /// the subject is active; callable directly in tests.
    pub fn tick(&self) -> TickOutcome {
        let now = self.clock.now();
        let (outcome, seq, snapshot) = {
            let mut state = self.state.lock().expect("state lock poisoned");
            let outcome = accrue_tick(&mut state, &self.catalogs, now);
            (outcome, self.next_seq(), state.clone())
        };
        self.commit(seq, &snapshot);
        outcome
    }

    /// Complete a milestone, applying the multiplicative boost and running
    /// the cliff and achievement checks as post-conditions.
    pub fn complete_milestone(
        &self,
        milestone_record: &Milestone,
        type_id: Option<&str>,
    ) -> MilestoneOutcome {
        let now = self.clock.now();
        let (outcome, seq, snapshot) = {
            let mut state = self.state.lock().expect("state lock poisoned");
            let outcome =
                milestone::complete_milestone(&mut state, milestone_record, type_id, &self.catalogs, now);
            check_achievements(&mut state, &self.catalogs.achievement_rules, now);
            (outcome, self.next_seq(), state.clone())
        };
        self.commit(seq, &snapshot);
        outcome
    }

    /// Record an interaction event by tag, feeding knowledge depth.
    /// Unknown tags fall back to the default interaction type.
    pub fn record_interaction(&self, tag: &str) -> Vec<String> {
        let interaction = crate::knowledge::InteractionType::parse_name(tag);
        let now = self.clock.now();
        let (unlocked, seq, snapshot) = {
            let mut state = self.state.lock().expect("state lock poisoned");
            let unlocked = state.knowledge_depth.record_interaction(
                interaction,
                &self.catalogs.knowledge_milestones,
                now,
            );
            state.refresh_derived(now);
            check_achievements(&mut state, &self.catalogs.achievement_rules, now);
            (unlocked, self.next_seq(), state.clone())
        };
        self.commit(seq, &snapshot);
        unlocked
    }

    /// Direct additive score adjustment — the manual-correction escape
    /// hatch. Clamped at zero, bypasses the multiplicative rules, and by
    /// design does not cascade cliff or achievement checks.
    pub fn update_score(&self, delta: f64, reason: &str) -> f64 {
        let now = self.clock.now();
        let (score, seq, snapshot) = {
            let mut state = self.state.lock().expect("state lock poisoned");
            state.current_score += delta;
            state.refresh_derived(now);
            (state.current_score, self.next_seq(), state.clone())
        };
        info!(delta, reason, score, "manual score adjustment");
        self.commit(seq, &snapshot);
        score
    }

    /// Apply a partial vesting schedule customization.
    pub fn customize_vesting_schedule(&self, update: &VestingScheduleUpdate) {
        let now = self.clock.now();
        let (seq, snapshot) = {
            let mut state = self.state.lock().expect("state lock poisoned");
            state.vesting_schedule.apply(update);
            state.refresh_derived(now);
            (self.next_seq(), state.clone())
        };
        self.commit(seq, &snapshot);
    }

    /// Toggle transfer protection (raises the knowledge retention rate).
    pub fn set_transfer_protection(&self, protected: bool) {
        let now = self.clock.now();
        let (seq, snapshot) = {
            let mut state = self.state.lock().expect("state lock poisoned");
            state.transfer_eligibility.transfer_protection = protected;
            state.refresh_derived(now);
            (self.next_seq(), state.clone())
        };
        self.commit(seq, &snapshot);
    }

    /// Evaluate the transfer gate. `None` means eligible; otherwise the
    /// first failing condition in check order (score, knowledge, cooldown).
    pub fn can_transfer_to_venture(&self) -> Option<TransferBlock> {
        let state = self.state.lock().expect("state lock poisoned");
        transfer::check_eligibility(&state)
    }

    /// Transfer accumulated standing to another venture context. Refusals
    /// are structured results with zero knowledge retained and no mutation.
    pub fn transfer_to_venture(&self, target: &str) -> TransferOutcome {
        let now = self.clock.now();
        let (outcome, seq, snapshot) = {
            let mut state = self.state.lock().expect("state lock poisoned");
            let outcome = transfer::transfer_to_venture(&mut state, &self.subject, target, now);
            let seq = if outcome.success {
                check_achievements(&mut state, &self.catalogs.achievement_rules, now);
                self.next_seq()
            } else {
                0
            };
            (outcome, seq, state.clone())
        };
        if outcome.success {
            self.commit(seq, &snapshot);
        }
        outcome
    }

    /// Reset the snapshot to persona defaults and clear persisted state.
    pub fn reset(&self) -> Metrics {
        let now = self.clock.now();
        let (seq, snapshot) = {
            let mut state = self.state.lock().expect("state lock poisoned");
            let persona = state.persona;
            *state = Metrics::new(persona, &self.catalogs, now);
            (self.next_seq(), state.clone())
        };
        if let Some(store) = &self.store {
            if let Err(err) = store.delete(&self.subject) {
                warn!(subject = %self.subject, %err, "failed to clear persisted snapshot");
            }
        }
        info!(subject = %self.subject, "metrics reset to persona defaults");
        self.commit(seq, &snapshot);
        snapshot
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Serializable snapshot of the full aggregate.
    pub fn export_metrics(&self) -> Result<serde_json::Value> {
        let state = self.state.lock().expect("state lock poisoned");
        serde_json::to_value(&*state).map_err(|e| EngineError::Store(StoreError::Serialize(e)))
    }

    /// Phase information for an arbitrary score.
    pub fn phase_info(&self, score: f64) -> PhaseInfo {
        phase::phase_info(score)
    }

    /// Progress toward the next phase for an arbitrary score.
    pub fn progress_to_next_phase(&self, score: f64) -> PhaseProgress {
        phase::progress_to_next(score)
    }

    /// Explicitly persist the current snapshot.
    pub fn save(&self) -> Result<()> {
        if let Some(store) = &self.store {
            let snapshot = self.metrics();
            store.save(&self.subject, &snapshot)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Commit plumbing
    // ------------------------------------------------------------------

    /// Allocate the next mutation sequence number. Must be called while the
    /// state lock is held so sequence order matches mutation order.
    fn next_seq(&self) -> u64 {
        self.mutation_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Persist and notify after a committed mutation. Runs outside the
    /// state lock; save failures are logged, not raised, so a flaky store
    /// never poisons the in-memory state.
    ///
    /// Commits are serialized behind `committed_seq` in mutation order: a
    /// commit whose sequence is older than one already written is dropped,
    /// so neither the store's last write nor the observers ever see a
    /// snapshot regress.
    fn commit(&self, seq: u64, snapshot: &Metrics) {
        let mut committed = self.committed_seq.lock().expect("commit lock poisoned");
        if seq < *committed {
            debug!(seq, committed = *committed, "stale snapshot dropped");
            return;
        }
        *committed = seq;
        self.persist(snapshot);
        let observers = self.observers.lock().expect("observer lock poisoned");
        for observer in observers.iter() {
            observer(snapshot);
        }
    }

    fn persist(&self, snapshot: &Metrics) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.subject, snapshot) {
                warn!(subject = %self.subject, %err, "snapshot save failed");
            }
        }
    }

    fn persist_current(&self) {
        let snapshot = self.metrics();
        self.persist(&snapshot);
    }
}

// ============================================================================
// TESTS
// ============================================================================
