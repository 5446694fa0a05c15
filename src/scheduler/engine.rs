//! The scheduling loop.
//!
//! One control task owns every transition: policy selection, dispatch,
//! preemption, completion bookkeeping, and idle/wake. All shared state
//! sits behind a single lock that is never held across a suspension
//! point; `submit` and `stop` are the only external mutators and each
//! takes effect as one atomic operation against the loop — enqueueing an
//! arrival and deciding whether it preempts happen in the same locked
//! section.
//!
//! # State machine
//!
//! Idle (no ready job) ⇄ Running (one dispatched job, one outstanding
//! timed run) → Closed (terminal). Stopping succeeds only from Idle; the
//! engine never force-kills an in-flight execution.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{oneshot, Notify};
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use super::report::ExecutionReport;
use super::slot::ExecutionSlot;
use crate::clock::VirtualClock;
use crate::error::SchedulerError;
use crate::models::{ExecutionLedger, Job, JobId, ReadyQueue, Segment};
use crate::policy::{RunningSnapshot, SchedulingPolicy};

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    /// Accepting jobs; the loop may run.
    Open,
    /// Shutdown observed, teardown in progress.
    Closing,
    /// Terminal: every subsequent call fails with `Closed`.
    Closed,
}

/// Record of the currently dispatched job.
#[derive(Debug, Clone, Copy)]
struct RunningJob {
    id: JobId,
    /// Virtual time this segment started (ms).
    segment_start_ms: i64,
    /// Remaining work at dispatch (ms).
    remaining_at_dispatch_ms: i64,
    priority: Option<i32>,
}

/// Mutable loop state. One lock, never held across an await.
struct Core {
    ready: ReadyQueue,
    running: Option<RunningJob>,
    slot: ExecutionSlot,
    policy: Box<dyn SchedulingPolicy>,
    ledger: ExecutionLedger,
    lifecycle: Lifecycle,
    /// True while the loop is suspended waiting for an arrival.
    idle: bool,
    started: bool,
    next_id: u64,
}

struct Inner {
    core: Mutex<Core>,
    clock: VirtualClock,
    /// Single-waiter wake signal for the idle loop. A wake with no
    /// waiter parks a permit; a double wake collapses into one.
    wake: Notify,
    on_idle: Mutex<Option<Arc<dyn Fn() + Send + Sync>>>,
}

/// A preemptive single-CPU scheduling simulator.
///
/// Cheap to clone; every clone is a handle onto the same scheduler.
///
/// # Example
///
/// ```no_run
/// use vsched::policy::Priority;
/// use vsched::scheduler::Scheduler;
///
/// # async fn demo() -> Result<(), vsched::SchedulerError> {
/// let scheduler = Scheduler::new(Priority::new());
/// scheduler.start()?;
/// scheduler.submit("P1", 3_000, Some(3))?;
/// scheduler.submit("P2", 4_000, Some(2))?; // preempts P1 immediately
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    /// Creates a scheduler with the given policy. Nothing runs until
    /// [`start`](Self::start).
    pub fn new<P: SchedulingPolicy>(policy: P) -> Self {
        Self {
            inner: Arc::new(Inner {
                core: Mutex::new(Core {
                    ready: ReadyQueue::new(),
                    running: None,
                    slot: ExecutionSlot::default(),
                    policy: Box::new(policy),
                    ledger: ExecutionLedger::new(),
                    lifecycle: Lifecycle::Open,
                    idle: false,
                    started: false,
                    next_id: 1,
                }),
                clock: VirtualClock::new(),
                wake: Notify::new(),
                on_idle: Mutex::new(None),
            }),
        }
    }

    /// Registers a hook invoked every time the loop enters the idle
    /// state. Observability only; its return value is ignored.
    pub fn on_idle<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.inner.on_idle.lock() = Some(Arc::new(hook));
    }

    /// Submits a job, returning its id.
    ///
    /// The job joins the ready queue at the current virtual time. An
    /// arrival while the loop is idle wakes it; an arrival that the
    /// policy ranks above the running job cuts the running segment short
    /// immediately, resolving it with the virtual time spent so far.
    ///
    /// # Errors
    /// `Closed` once the scheduler has shut down.
    pub fn submit(
        &self,
        name: impl Into<String>,
        burst_ms: i64,
        priority: Option<i32>,
    ) -> Result<JobId, SchedulerError> {
        let now_ms = self.inner.clock.now_ms();
        let mut core = self.inner.core.lock();
        if core.lifecycle != Lifecycle::Open {
            return Err(SchedulerError::Closed);
        }

        let id = JobId(core.next_id);
        core.next_id += 1;
        let job = Job::new(id, name, burst_ms, priority, now_ms);
        info!(name = %job.name, id = %id, burst_ms, "job submitted");
        core.ledger.open_entry(&job);

        // Arrival-triggered preemption: at most one shot per segment.
        if let Some(running) = core.running {
            let elapsed_ms = (now_ms - running.segment_start_ms).max(0);
            let snapshot = RunningSnapshot {
                priority: running.priority,
                remaining_now_ms: (running.remaining_at_dispatch_ms - elapsed_ms).max(0),
            };
            if core.policy.preempts(&job, &snapshot) && core.slot.preempt(elapsed_ms) {
                debug!(preempted = %running.id, by = %id, elapsed_ms, "running job preempted");
            }
        }

        core.ready.insert(job);
        let was_idle = core.idle;
        drop(core);
        if was_idle {
            self.inner.wake.notify_one();
        }
        Ok(id)
    }

    /// Starts the scheduling loop and the virtual clock. Must be called
    /// from within a tokio runtime.
    ///
    /// # Errors
    /// `Closed` if the scheduler has already shut down.
    ///
    /// # Panics
    /// If called a second time: restarting a scheduler is a programming
    /// error.
    pub fn start(&self) -> Result<(), SchedulerError> {
        {
            let mut core = self.inner.core.lock();
            if core.lifecycle != Lifecycle::Open {
                return Err(SchedulerError::Closed);
            }
            assert!(!core.started, "scheduler already started");
            core.started = true;
        }
        self.inner.clock.start();
        tokio::spawn(run_loop(Arc::clone(&self.inner)));
        info!("scheduler started");
        Ok(())
    }

    /// Shuts the scheduler down.
    ///
    /// Succeeds only while the loop is idle, or before it ever started:
    /// the engine never force-kills an in-flight execution, so a busy
    /// scheduler reports `Busy` and the caller must retry once idle. On
    /// success the clock halts, never-run jobs are discarded, and the
    /// ledger is retained for reporting.
    ///
    /// # Errors
    /// `Busy` while a job is executing; `Closed` if already closed.
    pub fn stop(&self) -> Result<(), SchedulerError> {
        let mut core = self.inner.core.lock();
        if core.lifecycle != Lifecycle::Open {
            return Err(SchedulerError::Closed);
        }
        if core.started && !core.idle {
            return Err(SchedulerError::Busy);
        }
        core.lifecycle = Lifecycle::Closing;
        self.inner.clock.halt();
        core.lifecycle = Lifecycle::Closed;
        drop(core);
        // Wake the idle loop so it observes Closed and exits.
        self.inner.wake.notify_one();
        info!("scheduler closed");
        Ok(())
    }

    /// Derives the waiting/service-time report from the ledger.
    ///
    /// Available at any point in the lifecycle, including after close.
    ///
    /// # Errors
    /// `NoJobs` if nothing has ever been submitted.
    pub fn report(&self) -> Result<ExecutionReport, SchedulerError> {
        ExecutionReport::from_ledger(&self.inner.core.lock().ledger)
    }

    /// Current virtual time (ms).
    pub fn virtual_now_ms(&self) -> i64 {
        self.inner.clock.now_ms()
    }
}

/// Next action for the loop, decided under the lock.
enum Step {
    Execute {
        slice_ms: i64,
        cancel: oneshot::Receiver<i64>,
    },
    Idle,
    Exit,
}

async fn run_loop(inner: Arc<Inner>) {
    loop {
        match next_step(&inner) {
            Step::Exit => break,
            Step::Idle => {
                info!("entering idle state");
                let hook = inner.on_idle.lock().clone();
                if let Some(hook) = hook {
                    hook();
                }
                inner.wake.notified().await;
                inner.core.lock().idle = false;
                debug!("leaving idle state");
            }
            Step::Execute { slice_ms, cancel } => {
                let elapsed_ms = execute_slice(slice_ms, cancel).await;
                finish_segment(&inner, elapsed_ms);
            }
        }
    }
    debug!("scheduling loop exited");
}

/// Selects and dispatches the next job, or decides to idle/exit.
/// Everything here happens under the core lock.
fn next_step(inner: &Inner) -> Step {
    let mut guard = inner.core.lock();
    let core = &mut *guard;
    if core.lifecycle != Lifecycle::Open {
        return Step::Exit;
    }
    let now_ms = inner.clock.now_ms();
    loop {
        let Some(id) = core.policy.select(&core.ready, now_ms) else {
            core.idle = true;
            core.policy.reset();
            return Step::Idle;
        };
        let job = core
            .ready
            .get(id)
            .expect("policy selected a job missing from the ready queue");
        if job.remaining_ms == 0 {
            // Zero-burst submissions retire without a segment.
            core.ready.remove(id);
            continue;
        }

        let slice_ms = core.policy.slice_ms(job);
        let start_ms = inner.clock.now_ms();
        let cancel = core.slot.arm();
        core.running = Some(RunningJob {
            id,
            segment_start_ms: start_ms,
            remaining_at_dispatch_ms: job.remaining_ms,
            priority: job.priority,
        });
        debug!(job = %id, slice_ms, start_ms, "dispatching");
        return Step::Execute { slice_ms, cancel };
    }
}

/// Runs one execution segment: up to `slice_ms` of simulated work at one
/// real millisecond per virtual millisecond. Resolves with the full
/// slice when the timer fires, or with the preempted portion when the
/// slot cuts it short.
async fn execute_slice(slice_ms: i64, cancel: oneshot::Receiver<i64>) -> i64 {
    tokio::select! {
        _ = sleep(Duration::from_millis(slice_ms as u64)) => slice_ms,
        preempted = cancel => preempted.unwrap_or(slice_ms),
    }
}

/// Books a finished segment: ledger append, remaining decrement, and
/// removal of the job once its work is done.
fn finish_segment(inner: &Inner, elapsed_ms: i64) {
    let mut guard = inner.core.lock();
    let core = &mut *guard;
    let end_ms = inner.clock.now_ms();
    core.slot.disarm();
    let running = core
        .running
        .take()
        .expect("segment finished with no running job recorded");
    core.ledger.record_segment(
        running.id,
        Segment {
            start_ms: running.segment_start_ms,
            end_ms,
        },
    );
    if let Some(job) = core.ready.get_mut(running.id) {
        job.remaining_ms = (job.remaining_ms - elapsed_ms).max(0);
        debug!(job = %running.id, elapsed_ms, remaining_ms = job.remaining_ms, "segment recorded");
        if job.remaining_ms == 0 {
            core.ready.remove(running.id);
            info!(job = %running.id, "job complete");
        }
    }
}
