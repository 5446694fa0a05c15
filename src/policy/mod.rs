//! Scheduling policies and the selection capability.
//!
//! A policy is a pure selection strategy: given the ready queue and the
//! current virtual time, pick the job to dispatch next, and decide
//! whether a fresh arrival warrants preempting the running job. The loop
//! owns all scheduler state; policies see it read-only apart from their
//! own rotation cursors.
//!
//! # Usage
//!
//! ```
//! use vsched::policy::RoundRobin;
//! use vsched::scheduler::Scheduler;
//!
//! let scheduler = Scheduler::new(RoundRobin::new(2_000));
//! ```
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.3

mod rules;

pub use rules::{Priority, RoundRobin, ShortestRemainingTime};

use crate::models::{Job, JobId, ReadyQueue};

/// Read-only view of the currently running job, taken at the moment an
/// arrival is evaluated for preemption.
#[derive(Debug, Clone, Copy)]
pub struct RunningSnapshot {
    /// The running job's priority.
    pub priority: Option<i32>,
    /// Remaining work right now: remaining at dispatch minus the virtual
    /// time already spent in this segment (never negative).
    pub remaining_now_ms: i64,
}

/// A scheduling policy: selection strategy plus preemption trigger.
///
/// # Selection Convention
/// `select` returns the id of the job to dispatch, or `None` when the
/// ready queue is empty — the loop then enters its idle state.
pub trait SchedulingPolicy: Send + 'static {
    /// Policy name (e.g. "RR", "PRIORITY", "SRTF").
    fn name(&self) -> &'static str;

    /// Picks the next job to dispatch.
    fn select(&mut self, ready: &ReadyQueue, now_ms: i64) -> Option<JobId>;

    /// Virtual milliseconds the dispatched job may run before yielding.
    ///
    /// Defaults to run-to-completion; quantum-driven policies override.
    fn slice_ms(&self, job: &Job) -> i64 {
        job.remaining_ms
    }

    /// Whether a fresh arrival preempts the running job immediately,
    /// rather than waiting for the current segment to end.
    ///
    /// Defaults to never: quantum-driven policies ignore arrivals.
    fn preempts(&self, _newcomer: &Job, _running: &RunningSnapshot) -> bool {
        false
    }

    /// Hook: the loop went idle, so any rotation state starts over.
    fn reset(&mut self) {}
}
