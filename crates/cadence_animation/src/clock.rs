//! Frame clock
//!
//! Turns an injected "request next frame" primitive into a ticking
//! process that calls a single `on_tick(time)` callback once per frame
//! until stopped.
//!
//! The primitive is always supplied explicitly through [`FrameScheduler`];
//! the clock never reaches for a platform default on its own.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a pending frame request, used for cancellation
    pub struct FrameHandle;
}

/// Callback delivered once by a frame scheduler with the frame timestamp
pub type FrameCallback = Box<dyn FnOnce(f64) + Send>;

/// Callback invoked by a clock on every tick
pub type TickCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// The platform primitive a [`FrameClock`] is built over
///
/// Implementations must deliver callbacks from their own frame loop, never
/// synchronously from inside `schedule_next_frame`.
pub trait FrameScheduler: Send + Sync {
    /// Request `callback` to run on the next frame
    fn schedule_next_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending request; unknown or already-delivered handles are ignored
    fn cancel_scheduled_frame(&self, handle: FrameHandle);
}

/// A start/stop ticking driver
///
/// [`Animator`](crate::Animator) is generic over this trait so a test
/// double can stand in for the real clock.
pub trait Clock: Send + Sync + 'static {
    /// Start ticking; no-op if already running
    fn start(&self) -> &Self;

    /// Stop ticking; no-op if not running
    fn stop(&self) -> &Self;

    fn is_running(&self) -> bool;

    /// Install the tick callback, replacing any previous one
    fn set_on_tick(&self, on_tick: TickCallback);
}

#[derive(Default)]
struct ClockState {
    running: bool,
    generation: u64,
    /// Generation of the one request the clock is waiting on
    awaiting: Option<u64>,
    handle: Option<FrameHandle>,
}

struct ClockInner {
    scheduler: Arc<dyn FrameScheduler>,
    state: Mutex<ClockState>,
    on_tick: Mutex<Option<TickCallback>>,
}

impl ClockInner {
    fn request_frame(inner: &Arc<ClockInner>) {
        let generation = {
            let mut state = inner.state.lock();
            state.generation += 1;
            state.awaiting = Some(state.generation);
            state.generation
        };

        let weak: Weak<ClockInner> = Arc::downgrade(inner);
        let handle = inner.scheduler.schedule_next_frame(Box::new(move |time| {
            if let Some(inner) = weak.upgrade() {
                ClockInner::tick(&inner, generation, time);
            }
        }));

        let mut state = inner.state.lock();
        if state.awaiting == Some(generation) {
            state.handle = Some(handle);
        } else {
            drop(state);
            inner.scheduler.cancel_scheduled_frame(handle);
        }
    }

    fn tick(inner: &Arc<ClockInner>, generation: u64, time: f64) {
        {
            let mut state = inner.state.lock();
            if !state.running || state.awaiting != Some(generation) {
                tracing::trace!(generation, "dropping stale frame");
                return;
            }
            state.awaiting = None;
            state.handle = None;
        }

        tracing::trace!(time, "clock tick");

        let on_tick = inner.on_tick.lock().clone();
        if let Some(on_tick) = on_tick {
            on_tick(time);
        }

        // on_tick may have stopped the clock, or stopped and restarted it
        let reschedule = {
            let state = inner.state.lock();
            state.running && state.awaiting.is_none()
        };
        if reschedule {
            ClockInner::request_frame(inner);
        }
    }
}

/// The [`Clock`] implementation over a [`FrameScheduler`]
///
/// At most one frame request is outstanding while running. Frames
/// delivered after `stop()` (or for a request superseded by a restart)
/// are dropped, so no tick is observed once the clock reports stopped.
#[derive(Clone)]
pub struct FrameClock {
    inner: Arc<ClockInner>,
}

impl FrameClock {
    pub fn new(scheduler: Arc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Arc::new(ClockInner {
                scheduler,
                state: Mutex::new(ClockState::default()),
                on_tick: Mutex::new(None),
            }),
        }
    }

    /// Create a clock with its tick callback already installed
    pub fn with_on_tick<F>(scheduler: Arc<dyn FrameScheduler>, on_tick: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        let clock = Self::new(scheduler);
        clock.set_on_tick(Arc::new(on_tick));
        clock
    }

    /// Whether a frame request is currently outstanding
    pub fn has_pending_frame(&self) -> bool {
        self.inner.state.lock().handle.is_some()
    }
}

impl Clock for FrameClock {
    fn start(&self) -> &Self {
        {
            let mut state = self.inner.state.lock();
            if state.running {
                return self;
            }
            state.running = true;
        }

        tracing::debug!("frame clock started");
        ClockInner::request_frame(&self.inner);
        self
    }

    fn stop(&self) -> &Self {
        let mut state = self.inner.state.lock();
        if !state.running {
            return self;
        }

        // Cancel before reporting stopped
        state.awaiting = None;
        if let Some(handle) = state.handle.take() {
            self.inner.scheduler.cancel_scheduled_frame(handle);
        }
        state.running = false;
        drop(state);

        tracing::debug!("frame clock stopped");
        self
    }

    fn is_running(&self) -> bool {
        self.inner.state.lock().running
    }

    fn set_on_tick(&self, on_tick: TickCallback) {
        *self.inner.on_tick.lock() = Some(on_tick);
    }
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("FrameClock")
            .field("running", &state.running)
            .field("pending", &state.handle.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;

    fn recording_clock() -> (Arc<ManualScheduler>, FrameClock, Arc<Mutex<Vec<f64>>>) {
        let scheduler = Arc::new(ManualScheduler::new());
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = ticks.clone();
        let clock = FrameClock::with_on_tick(scheduler.clone(), move |t| sink.lock().push(t));
        (scheduler, clock, ticks)
    }

    #[test]
    fn test_start_and_stop_are_chainable() {
        let (_, clock, _) = recording_clock();
        assert!(!clock.is_running());

        assert!(clock.start().is_running());
        assert!(!clock.start().stop().is_running());
    }

    #[test]
    fn test_ticks_until_stopped() {
        let (scheduler, clock, ticks) = recording_clock();

        // Nothing scheduled before start
        scheduler.tick(1.0);
        assert!(ticks.lock().is_empty());

        assert!(!clock.has_pending_frame());
        clock.start();
        assert!(clock.has_pending_frame());
        scheduler.tick(16.0);
        scheduler.tick(32.0);
        assert_eq!(*ticks.lock(), vec![16.0, 32.0]);
        assert_eq!(scheduler.pending_frames(), 1);
        assert!(clock.has_pending_frame());

        clock.stop();
        assert!(!clock.has_pending_frame());
        assert_eq!(scheduler.pending_frames(), 0);
        scheduler.tick(48.0);
        assert_eq!(*ticks.lock(), vec![16.0, 32.0]);
    }

    #[test]
    fn test_redundant_start_keeps_single_request() {
        let (scheduler, clock, ticks) = recording_clock();

        clock.start().start().start();
        assert_eq!(scheduler.pending_frames(), 1);

        scheduler.tick(10.0);
        assert_eq!(ticks.lock().len(), 1);
    }

    #[test]
    fn test_stop_from_inside_tick() {
        let scheduler = Arc::new(ManualScheduler::new());
        let count = Arc::new(Mutex::new(0));

        let clock = FrameClock::new(scheduler.clone());
        let handle = clock.clone();
        let seen = count.clone();
        clock.set_on_tick(Arc::new(move |_| {
            *seen.lock() += 1;
            handle.stop();
        }));

        clock.start();
        scheduler.tick(1.0);
        scheduler.tick(2.0);

        assert_eq!(*count.lock(), 1);
        assert!(!clock.has_pending_frame());
        assert!(!clock.is_running());
        assert!(!scheduler.has_pending_frames());
    }

    #[test]
    fn test_restart_inside_tick_does_not_double_schedule() {
        let scheduler = Arc::new(ManualScheduler::new());
        let clock = FrameClock::new(scheduler.clone());
        let handle = clock.clone();
        clock.set_on_tick(Arc::new(move |_| {
            handle.stop().start();
        }));

        clock.start();
        scheduler.tick(1.0);

        assert!(clock.is_running());
        assert_eq!(scheduler.pending_frames(), 1);
    }

    /// A scheduler that ignores cancellation
    struct LeakyScheduler {
        inner: ManualScheduler,
    }

    impl FrameScheduler for LeakyScheduler {
        fn schedule_next_frame(&self, callback: FrameCallback) -> FrameHandle {
            self.inner.schedule_next_frame(callback)
        }

        fn cancel_scheduled_frame(&self, _handle: FrameHandle) {}
    }

    #[test]
    fn test_stale_frames_are_dropped() {
        let scheduler = Arc::new(LeakyScheduler {
            inner: ManualScheduler::new(),
        });
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = ticks.clone();
        let clock = FrameClock::with_on_tick(scheduler.clone(), move |t| sink.lock().push(t));

        clock.start().stop();
        scheduler.inner.tick(5.0);
        assert!(ticks.lock().is_empty());

        // Restarting leaves the stale request queued next to the new one
        clock.start();
        clock.stop();
        clock.start();
        scheduler.inner.tick(6.0);
        assert_eq!(*ticks.lock(), vec![6.0]);
    }

    #[test]
    fn test_dropped_clock_ignores_frames() {
        let scheduler = Arc::new(ManualScheduler::new());
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = ticks.clone();
        {
            let clock =
                FrameClock::with_on_tick(scheduler.clone(), move |t| sink.lock().push(t));
            clock.start();
        }
        scheduler.tick(1.0);
        assert!(ticks.lock().is_empty());
    }
}
