//! Built-in scheduling policies.
//!
//! # Variants
//!
//! | Policy | Selects | Preemption trigger |
//! |--------|---------|--------------------|
//! | `RoundRobin` | rotation cursor, arrival order | quantum expiry only |
//! | `Priority` | minimum priority value | arrival with strictly better priority |
//! | `ShortestRemainingTime` | minimum remaining work | arrival with strictly less remaining |
//!
//! # Tie-breaking
//! `Priority` and `ShortestRemainingTime` break ties by earliest arrival,
//! then by id (stable when arrivals share a clock reading).

use super::{RunningSnapshot, SchedulingPolicy};
use crate::models::{Job, JobId, ReadyQueue};

/// Ordering key for an optional priority: explicit values first
/// (lower = higher precedence), absent priorities last.
fn priority_rank(priority: Option<i32>) -> i64 {
    priority.map(i64::from).unwrap_or(i64::MAX)
}

// ======================== Round Robin ========================

/// Round Robin with a fixed quantum.
///
/// Rotates over ready jobs in arrival order, granting each at most one
/// quantum per dispatch and wrapping from the back of the queue to the
/// front. Arrivals never preempt: they join the rotation and wait their
/// turn. The rotation restarts from the front after an idle period.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    quantum_ms: i64,
    cursor: Option<JobId>,
}

impl RoundRobin {
    /// Creates a Round Robin policy.
    ///
    /// # Panics
    /// If `quantum_ms` is not positive.
    pub fn new(quantum_ms: i64) -> Self {
        assert!(quantum_ms > 0, "quantum must be positive");
        Self {
            quantum_ms,
            cursor: None,
        }
    }

    /// The configured quantum (virtual ms).
    #[inline]
    pub fn quantum_ms(&self) -> i64 {
        self.quantum_ms
    }
}

impl SchedulingPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn select(&mut self, ready: &ReadyQueue, _now_ms: i64) -> Option<JobId> {
        let id = ready.next_after(self.cursor)?.id;
        self.cursor = Some(id);
        Some(id)
    }

    fn slice_ms(&self, job: &Job) -> i64 {
        self.quantum_ms.min(job.remaining_ms)
    }

    fn reset(&mut self) {
        self.cursor = None;
    }
}

// ======================== Priority ========================

/// Preemptive priority scheduling (lower value = higher precedence).
///
/// Jobs without a priority sort after every explicit one. An arrival
/// with a strictly better priority than the running job cuts its segment
/// short immediately instead of waiting for a quantum boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Priority;

impl Priority {
    /// Creates a priority policy.
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for Priority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn select(&mut self, ready: &ReadyQueue, _now_ms: i64) -> Option<JobId> {
        ready
            .iter()
            .min_by_key(|job| (priority_rank(job.priority), job.arrival_ms, job.id))
            .map(|job| job.id)
    }

    fn preempts(&self, newcomer: &Job, running: &RunningSnapshot) -> bool {
        priority_rank(newcomer.priority) < priority_rank(running.priority)
    }
}

// ======================== Shortest Remaining Time ========================

/// Shortest-Remaining-Time-First.
///
/// Selects the ready job with the least remaining work. An arrival whose
/// outstanding work is strictly less than the running job's remaining
/// work *as of now* (remaining at dispatch minus time already spent in
/// the segment) preempts it immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestRemainingTime;

impl ShortestRemainingTime {
    /// Creates an SRTF policy.
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for ShortestRemainingTime {
    fn name(&self) -> &'static str {
        "SRTF"
    }

    fn select(&mut self, ready: &ReadyQueue, _now_ms: i64) -> Option<JobId> {
        ready
            .iter()
            .min_by_key(|job| (job.remaining_ms, job.arrival_ms, job.id))
            .map(|job| job.id)
    }

    fn preempts(&self, newcomer: &Job, running: &RunningSnapshot) -> bool {
        newcomer.remaining_ms < running.remaining_now_ms
    }
}
