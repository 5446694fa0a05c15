//! Single-shot execution slot.
//!
//! Owns the one in-flight "run this job for up to N virtual ms"
//! operation and structurally enforces its contract: arming a second run
//! while one is outstanding panics, and cancellation consumes the
//! channel, so a second preemption — or one landing after natural
//! resolution — is an inert no-op rather than a double resolution.

use tokio::sync::oneshot;

/// Holder of the cancellation side of the outstanding execution.
#[derive(Debug, Default)]
pub(crate) struct ExecutionSlot {
    cancel: Option<oneshot::Sender<i64>>,
}

impl ExecutionSlot {
    /// Installs a fresh cancellation channel and returns the receiving
    /// half for the run to race against its own timer.
    ///
    /// # Panics
    /// If a run is already outstanding. Two concurrent executions are a
    /// programming error, not a recoverable condition.
    pub(crate) fn arm(&mut self) -> oneshot::Receiver<i64> {
        assert!(self.cancel.is_none(), "execution already outstanding");
        let (tx, rx) = oneshot::channel();
        self.cancel = Some(tx);
        rx
    }

    /// Cuts the outstanding run short, resolving it with `elapsed_ms`
    /// instead of its full duration.
    ///
    /// Returns whether a cancellation was actually delivered. Calling
    /// with no run outstanding, calling twice, or calling after natural
    /// resolution returns `false` and does nothing.
    pub(crate) fn preempt(&mut self, elapsed_ms: i64) -> bool {
        match self.cancel.take() {
            Some(tx) => tx.send(elapsed_ms).is_ok(),
            None => false,
        }
    }

    /// Clears the slot once the run has resolved naturally.
    pub(crate) fn disarm(&mut self) {
        self.cancel = None;
    }
}
