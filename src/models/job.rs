//! Job (process) model.
//!
//! A job is the schedulable unit: a named amount of virtual CPU work,
//! optionally prioritised, stamped with its arrival time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque job identifier, stable for the job's lifetime.
///
/// Ids are handed out from a monotonically increasing counter at
/// submission, so id order equals arrival order — the property the ready
/// queue's iteration and the Round Robin rotation rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub(crate) u64);

impl JobId {
    /// Raw numeric value.
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A schedulable unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier.
    pub id: JobId,
    /// Human-readable name (display only).
    pub name: String,
    /// Total virtual milliseconds of work required. Immutable.
    pub burst_ms: i64,
    /// Virtual milliseconds still owed. Decreases only via completed
    /// execution segments; the job is complete iff this reaches zero,
    /// after which it leaves the ready queue and is never mutated again.
    pub remaining_ms: i64,
    /// Scheduling precedence: lower value = higher precedence.
    /// `None` sorts after every explicit priority.
    pub priority: Option<i32>,
    /// Virtual time of submission (ms).
    pub arrival_ms: i64,
}

impl Job {
    /// Creates a job with its full burst outstanding.
    ///
    /// # Panics
    /// If `burst_ms` is negative.
    pub(crate) fn new(
        id: JobId,
        name: impl Into<String>,
        burst_ms: i64,
        priority: Option<i32>,
        arrival_ms: i64,
    ) -> Self {
        assert!(burst_ms >= 0, "burst_ms must be non-negative");
        Self {
            id,
            name: name.into(),
            burst_ms,
            remaining_ms: burst_ms,
            priority,
            arrival_ms,
        }
    }

    /// Whether the job has no work left.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining_ms == 0
    }
}
