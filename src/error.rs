//! Caller-facing error taxonomy.
//!
//! Every fallible operation reports synchronously at the call site; the
//! library never retries on the caller's behalf. Invariant violations
//! inside the engine (arming a second execution, losing the running-job
//! record) are programming errors and panic instead of returning a
//! variant.

use thiserror::Error;

/// Errors surfaced by the scheduler and the safe-sequence check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// An operation was attempted after the scheduler shut down.
    #[error("scheduler is closed")]
    Closed,

    /// Shutdown was requested while a job was still executing.
    #[error("a job is still executing; retry once the scheduler is idle")]
    Busy,

    /// A report was requested before any job was submitted.
    #[error("no jobs have been submitted")]
    NoJobs,

    /// The resource state admits no deadlock-free completion order.
    #[error("no safe execution sequence exists")]
    NoSafeSequence,
}
