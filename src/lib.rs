//! Preemptive CPU-scheduling simulation.
//!
//! Models how a single-CPU operating-system scheduler selects, runs, and
//! preempts competing jobs under different ordering policies, while an
//! independent virtual clock timestamps every execution segment for
//! waiting/service-time analysis. Built for learners exploring scheduling
//! theory, not for driving real workloads.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Job`, `JobId`, `ReadyQueue`,
//!   `ExecutionLedger`, `LedgerEntry`, `Segment`
//! - **`clock`**: The virtual clock, a fixed-increment timestamp source
//! - **`policy`**: Scheduling policies — `RoundRobin`, `Priority`,
//!   `ShortestRemainingTime`
//! - **`scheduler`**: The preemptive scheduling loop and its statistics
//!   report
//! - **`safety`**: Banker's-algorithm safe-sequence check
//!
//! # Architecture
//!
//! One logical control task drives the loop; jobs never execute
//! concurrently. Execution is simulated — one virtual millisecond of work
//! per real millisecond slept — and external arrivals interleave with the
//! loop only at its suspension points (a dispatched run, or the idle
//! wait). The clock runs on its own periodic schedule and is read, never
//! driven, by the loop.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5: CPU Scheduling
//! - Tanenbaum & Bos (2015), "Modern Operating Systems", Ch. 2.4

pub mod clock;
pub mod models;
pub mod policy;
pub mod safety;
pub mod scheduler;

mod error;

pub use error::SchedulerError;
