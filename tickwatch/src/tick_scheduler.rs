use std::{fmt::Display, ops::ControlFlow, time::Duration};

use tokio::{
    runtime::{Handle, TryCurrentError},
    task::AbortHandle,
    time::{Instant, MissedTickBehavior},
};

pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub enum SchedulerError {
    NoRuntime(TryCurrentError),
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::NoRuntime(e) => write!(f, "no tokio runtime available, msg = {e}"),
        }
    }
}

impl std::error::Error for SchedulerError {}

/// Arms fixed-period repeating callbacks on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    runtime: Handle,
}

impl TickScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(SchedulerError::NoRuntime)
    }

    /// Calls `on_tick` every `period`, the first call one full period after arming.
    ///
    /// Late ticks are skipped instead of being delivered in a burst. The
    /// registration ends when `on_tick` returns [`ControlFlow::Break`], when
    /// it panics, or when the returned handle is cancelled or dropped.
    pub fn schedule(
        &self,
        period: Duration,
        mut on_tick: impl FnMut() -> ControlFlow<()> + Send + 'static,
    ) -> TickHandle {
        let period = period.max(MIN_TICK_PERIOD);

        let tick_task = self.runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                if on_tick().is_break() {
                    break;
                }
            }
        });

        let abort_handle = tick_task.abort_handle();

        self.runtime.spawn(async move {
            if let Err(e) = tick_task.await {
                if e.is_panic() {
                    log::error!("tick task panicked, msg = {e:?}");
                }
            }
        });

        TickHandle {
            abort_handle,
            cancelled: false,
        }
    }
}

/// Owned periodic registration. Cancelled on drop.
#[derive(Debug)]
pub struct TickHandle {
    abort_handle: AbortHandle,
    cancelled: bool,
}

impl TickHandle {
    pub fn cancel(&mut self) {
        if !self.cancelled {
            self.abort_handle.abort();
            self.cancelled = true;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_active(&self) -> bool {
        !self.cancelled && !self.abort_handle.is_finished()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}
