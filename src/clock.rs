//! Virtual clock.
//!
//! A monotonically non-decreasing timestamp source that advances by a
//! fixed virtual increment on a fixed real-time period, independently of
//! whatever the scheduling loop is doing. The loop reads it; nothing
//! drives it, and it gates nothing.
//!
//! The tick period is slightly under half a real second so that the clock
//! leads the execution simulation (which burns 1000 real ms per virtual
//! second) instead of trailing it. Under tokio's paused test time this
//! makes the clock read exactly `n * 1000` virtual ms at every
//! whole-second observation point.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Real-time period between clock ticks.
pub const TICK_PERIOD: Duration = Duration::from_millis(498);

/// Virtual milliseconds added per tick.
pub const TICK_INCREMENT_MS: i64 = 500;

/// A fixed-increment virtual time source.
///
/// Cheap to clone; every clone reads and controls the same clock.
/// [`now_ms`](Self::now_ms) may be called from any task. [`halt`](Self::halt)
/// is idempotent: the first call stops the ticker, later calls are silent
/// no-ops.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    inner: Arc<ClockInner>,
}

#[derive(Debug, Default)]
struct ClockInner {
    now_ms: AtomicI64,
    halted: AtomicBool,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl VirtualClock {
    /// Creates a clock at virtual time zero. The ticker does not run
    /// until [`start`](Self::start).
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns the ticker task. Must be called from within a tokio
    /// runtime. A halted clock stays halted.
    ///
    /// # Panics
    /// If the ticker is already running.
    pub fn start(&self) {
        if self.inner.halted.load(Ordering::SeqCst) {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(TICK_PERIOD);
            // A tokio interval fires its first tick immediately; consume
            // it so the clock stays at zero until one full period passes.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                inner.now_ms.fetch_add(TICK_INCREMENT_MS, Ordering::Relaxed);
            }
        });
        let mut ticker = self.inner.ticker.lock();
        assert!(ticker.is_none(), "virtual clock already started");
        *ticker = Some(handle);
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> i64 {
        self.inner.now_ms.load(Ordering::Relaxed)
    }

    /// Stops the ticker, freezing the clock at its current reading.
    /// Idempotent: only the first call has any effect.
    pub fn halt(&self) {
        if self.inner.halted.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.inner.ticker.lock().take() {
            handle.abort();
        }
        debug!(now_ms = self.now_ms(), "virtual clock halted");
    }
}
