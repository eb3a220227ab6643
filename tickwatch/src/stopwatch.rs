use std::{fmt::Display, ops::ControlFlow, sync::Arc, time::Duration};

use crate::{
    clock::{Clock, TokioClock},
    config::StopwatchConfig,
    elapsed::{ElapsedRecord, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND},
    prelude::{arc_mutex_new, ArcMutex},
    tick_scheduler::{SchedulerError, TickHandle, TickScheduler},
};


pub type Listener = Arc<dyn Fn(&Stopwatch) + Send + Sync + 'static>;

struct StopwatchState {
    start_time: i64,
    stop_time: i64,
    total_elapsed: i64,
    initial_elapsed: i64,
    started: bool,
    count_up: bool,
    tick_resolution: Duration,
    listener: Option<Listener>,

    // stays Some after stop() cancels it, reset() and set_elapsed() re-arm whenever it is Some
    tick_handle: Option<TickHandle>,
    tick_generation: u64,
}

/// Start/stop elapsed time tracker with periodic listener notification.
///
/// Clones are handles to the same stopwatch. The listener is called from the
/// tick task with the stopwatch itself, without the internal lock held, so it
/// may freely call back into the stopwatch (e.g. to stop it).
///
/// The periodic registration is cancelled by [`Stopwatch::stop`] and when the
/// last handle is dropped.
#[derive(Clone)]
pub struct Stopwatch {
    state: ArcMutex<StopwatchState>,
    clock: Arc<dyn Clock>,
    scheduler: TickScheduler,
}

impl Stopwatch {
    pub fn new(config: &StopwatchConfig, scheduler: TickScheduler, clock: impl Clock) -> Self {
        Self {
            state: arc_mutex_new(StopwatchState {
                start_time: 0,
                stop_time: 0,
                total_elapsed: 0,
                initial_elapsed: 0,
                started: false,
                count_up: config.count_up,
                tick_resolution: config.tick_resolution(),
                listener: None,
                tick_handle: None,
                tick_generation: 0,
            }),
            clock: Arc::new(clock),
            scheduler,
        }
    }

    /// Ticks on the current tokio runtime, time measured by a [`TokioClock`].
    pub fn with_tokio(config: &StopwatchConfig) -> Result<Self, SchedulerError> {
        Ok(Self::new(config, TickScheduler::current()?, TokioClock::new()))
    }

    pub fn with_listener(self, listener: impl Fn(&Stopwatch) + Send + Sync + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn start(&self) {
        let mut state = self.state.lock();

        if !state.started {
            state.start_time = self.clock.now_millis();
            state.stop_time = 0;
            state.started = true;
            self.arm_ticks(&mut state);

            log::debug!("stopwatch started at {} ms", state.start_time);
        }
    }

    pub fn stop(&self) -> ElapsedRecord {
        let mut state = self.state.lock();

        if state.started {
            state.stop_time = self.clock.now_millis();
            state.started = false;
            state.total_elapsed = state
                .total_elapsed
                .saturating_add(state.stop_time - state.start_time);
            Self::disarm_ticks(&mut state);

            log::debug!(
                "stopwatch stopped at {} ms, total elapsed = {} ms",
                state.stop_time,
                state.total_elapsed
            );
        }

        self.elapsed_of(&state)
    }

    /// Zeroes the elapsed time (back to the countdown baseline when counting down).
    ///
    /// Keeps the running state. Re-arms the tick registration if there is one,
    /// including one already cancelled by [`Stopwatch::stop`].
    pub fn reset(&self) {
        let mut state = self.state.lock();

        let now = self.clock.now_millis();
        state.total_elapsed = if state.count_up {
            0
        } else {
            state.initial_elapsed
        };
        state.start_time = now;
        state.stop_time = now;

        if state.tick_handle.is_some() {
            self.arm_ticks(&mut state);
        }

        log::debug!("stopwatch reset at {now} ms");
    }

    pub fn restart(&self) {
        self.stop();
        self.reset();
        self.start();
    }

    pub fn elapsed(&self) -> ElapsedRecord {
        self.elapsed_of(&self.state.lock())
    }

    /// Overrides the elapsed time, the baseline of the countdown in count-down mode.
    ///
    /// The arguments are not range checked, only the resulting total is
    /// clamped at zero. In count-down mode the seconds are rounded up to the
    /// end of the given second.
    pub fn set_elapsed(&self, hours: i64, minutes: i64, seconds: i64) {
        let mut state = self.state.lock();

        let now = self.clock.now_millis();
        state.start_time = now;
        state.stop_time = now;

        let seconds_millis = if state.count_up {
            seconds.saturating_mul(MILLIS_PER_SECOND as i64)
        } else {
            seconds
                .saturating_add(1)
                .saturating_mul(MILLIS_PER_SECOND as i64)
                .saturating_sub(1)
        };

        let total_elapsed = hours
            .saturating_mul(MILLIS_PER_HOUR as i64)
            .saturating_add(minutes.saturating_mul(MILLIS_PER_MINUTE as i64))
            .saturating_add(seconds_millis)
            .max(0);

        state.total_elapsed = total_elapsed;
        state.initial_elapsed = total_elapsed;

        if state.tick_handle.is_some() {
            self.arm_ticks(&mut state);
        }

        log::debug!("stopwatch elapsed time set to {total_elapsed} ms");
    }

    /// `HH:MM:SS`, or `HH:MM:SS.mmm` when `include_milliseconds` is set.
    pub fn format(&self, include_milliseconds: bool) -> String {
        self.elapsed().format(include_milliseconds)
    }

    /// Takes effect from the next tick on.
    pub fn set_listener(&self, listener: impl Fn(&Stopwatch) + Send + Sync + 'static) {
        self.state.lock().listener = Some(Arc::new(listener));
    }

    pub fn remove_listener(&self) {
        self.state.lock().listener = None;
    }

    /// Calls the listener, if any, on the calling thread.
    pub fn on_tick(&self) {
        let listener = self.state.lock().listener.clone();

        if let Some(listener) = listener {
            listener(self);
        }
    }

    pub fn is_started(&self) -> bool {
        self.state.lock().started
    }

    pub fn is_count_up(&self) -> bool {
        self.state.lock().count_up
    }

    pub fn start_time(&self) -> i64 {
        self.state.lock().start_time
    }

    pub fn stop_time(&self) -> i64 {
        self.state.lock().stop_time
    }

    pub fn total_elapsed(&self) -> i64 {
        self.state.lock().total_elapsed
    }

    pub fn initial_elapsed(&self) -> i64 {
        self.state.lock().initial_elapsed
    }

    pub fn tick_resolution(&self) -> Duration {
        self.state.lock().tick_resolution
    }

    pub fn has_listener(&self) -> bool {
        self.state.lock().listener.is_some()
    }

    /// Whether a tick registration exists, cancelled or not.
    pub fn has_tick_registration(&self) -> bool {
        self.state.lock().tick_handle.is_some()
    }

    pub fn is_tick_registration_active(&self) -> bool {
        self.state
            .lock()
            .tick_handle
            .as_ref()
            .map_or(false, TickHandle::is_active)
    }

    pub fn is_same_instance(&self, other: &Stopwatch) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn elapsed_of(&self, state: &StopwatchState) -> ElapsedRecord {
        let mut elapsed = if state.started {
            self.clock.now_millis() - state.start_time
        } else {
            0
        };
        elapsed = elapsed.saturating_add(state.total_elapsed);

        if !state.count_up {
            elapsed = state
                .initial_elapsed
                .saturating_mul(2)
                .saturating_sub(elapsed)
                .max(0);
        }

        ElapsedRecord::from_millis(elapsed.max(0) as u64)
    }

    fn arm_ticks(&self, state: &mut StopwatchState) {
        if let Some(mut previous) = state.tick_handle.take() {
            previous.cancel();
        }

        state.tick_generation = state.tick_generation.wrapping_add(1);
        let generation = state.tick_generation;

        let weak_state = Arc::downgrade(&self.state);
        let clock = self.clock.clone();
        let scheduler = self.scheduler.clone();

        state.tick_handle = Some(self.scheduler.schedule(state.tick_resolution, move || {
            let Some(shared_state) = weak_state.upgrade() else {
                return ControlFlow::Break(());
            };

            Stopwatch {
                state: shared_state,
                clock: clock.clone(),
                scheduler: scheduler.clone(),
            }
            .tick(generation)
        }));

        log::debug!(
            "tick registration armed, period = {:?}, generation = {generation}",
            state.tick_resolution
        );
    }

    fn disarm_ticks(state: &mut StopwatchState) {
        state.tick_generation = state.tick_generation.wrapping_add(1);

        if let Some(tick_handle) = state.tick_handle.as_mut() {
            tick_handle.cancel();
        }
    }

    fn tick(&self, generation: u64) -> ControlFlow<()> {
        // a firing that raced with stop() or a re-arm must not reach the listener
        if self.state.lock().tick_generation != generation {
            return ControlFlow::Break(());
        }

        log::trace!("tick, elapsed = {:#}", self.elapsed());

        self.on_tick();

        ControlFlow::Continue(())
    }
}

impl Display for Stopwatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

impl std::fmt::Debug for Stopwatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();

        f.debug_struct("Stopwatch")
            .field("start_time", &state.start_time)
            .field("stop_time", &state.stop_time)
            .field("total_elapsed", &state.total_elapsed)
            .field("initial_elapsed", &state.initial_elapsed)
            .field("started", &state.started)
            .field("count_up", &state.count_up)
            .field("tick_resolution", &state.tick_resolution)
            .field("has_listener", &state.listener.is_some())
            .finish()
    }
}
