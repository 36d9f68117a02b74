//! Novelty Detection
//!
//! Partitions a fetched batch into new and known listings against the
//! seen-address set.
//!
//! The first successful batch after startup is the baseline: every address
//! is recorded as seen and nothing is reported as new, so a restart (or a
//! first run with no state) does not flood the log. Every later batch is
//! compared against a snapshot of the seen-set taken before the batch.
//! Two records with the same address in one batch are therefore both
//! reported new if the address was unseen.

use super::seen_set::SeenSet;
use super::token::{NewTokenEvent, TokenRecord};

/// Detector lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPhase {
    /// No batch processed yet
    Baseline,
    /// Baseline recorded, new listings are reported
    Steady,
}

/// Result of running detection over one batch
#[derive(Debug, Clone)]
pub struct NoveltyOutcome {
    /// Input records in order, with `is_new` set
    pub records: Vec<TokenRecord>,
    /// One event per new record, in batch order
    pub new_events: Vec<NewTokenEvent>,
    /// Seen-set after this batch
    pub updated_seen: SeenSet,
    /// Phase the batch was processed in
    pub phase: DetectionPhase,
}

impl NoveltyOutcome {
    /// Whether the seen-set must be written back: always after the
    /// baseline, otherwise only when something new was found
    pub fn should_persist_seen(&self) -> bool {
        self.phase == DetectionPhase::Baseline || !self.new_events.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct NoveltyDetector {
    phase: DetectionPhase,
}

impl Default for NoveltyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl NoveltyDetector {
    pub fn new() -> Self {
        Self {
            phase: DetectionPhase::Baseline,
        }
    }

    pub fn phase(&self) -> DetectionPhase {
        self.phase
    }

    /// Run detection over `batch`. `now_ms` stamps emitted events.
    /// Advances to `Steady` after the first call.
    pub fn detect(&mut self, batch: &[TokenRecord], seen: &SeenSet, now_ms: i64) -> NoveltyOutcome {
        let phase = self.phase;
        let mut updated_seen = seen.clone();
        let mut new_events = Vec::new();

        let records = batch
            .iter()
            .map(|token| {
                let Some(addr) = token.canonical_address() else {
                    return token.marked(false);
                };

                match phase {
                    DetectionPhase::Baseline => {
                        updated_seen.insert(&addr);
                        token.marked(false)
                    }
                    DetectionPhase::Steady => {
                        if seen.contains(&addr) {
                            token.marked(false)
                        } else {
                            updated_seen.insert(&addr);
                            let marked = token.marked(true);
                            new_events.push(NewTokenEvent::new(marked.clone(), now_ms));
                            marked
                        }
                    }
                }
            })
            .collect();

        if phase == DetectionPhase::Baseline {
            tracing::debug!("Baseline recorded: {} addresses seen", updated_seen.len());
        }
        self.phase = DetectionPhase::Steady;

        NoveltyOutcome {
            records,
            new_events,
            updated_seen,
            phase,
        }
    }
}
