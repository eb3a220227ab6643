use std::{
    sync::{
        atomic::{self, AtomicI64},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};

/// Source of timestamps, in milliseconds since an arbitrary but fixed epoch.
pub trait Clock: Send + Sync + 'static {
    fn now_millis(&self) -> i64;
}

/// Monotonic clock counting from its own creation.
///
/// Built on [`tokio::time::Instant`], so it stands still and jumps together
/// with the tokio timers when the runtime's time is paused or advanced.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    epoch: tokio::time::Instant,
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            epoch: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> i64 {
        (tokio::time::Instant::now() - self.epoch).as_millis() as i64
    }
}

/// Wall clock, milliseconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since_epoch| since_epoch.as_millis() as i64)
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now_millis: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    pub fn set(&self, now_millis: i64) {
        self.now_millis.store(now_millis, atomic::Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now_millis.fetch_add(millis, atomic::Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now_millis.load(atomic::Ordering::SeqCst)
    }
}
