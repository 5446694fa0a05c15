//! Scheduling domain models.
//!
//! Core data types for the simulation: the schedulable [`Job`], the
//! arrival-ordered [`ReadyQueue`], and the [`ExecutionLedger`] recording
//! every interval a job held the CPU.
//!
//! # Time Representation
//! All times are in `i64` virtual milliseconds relative to the scheduling
//! epoch (t=0). One virtual second of work is simulated as one real
//! second of execution.

mod job;
mod ledger;
mod queue;

pub use job::{Job, JobId};
pub use ledger::{ExecutionLedger, LedgerEntry, Segment};
pub use queue::ReadyQueue;
