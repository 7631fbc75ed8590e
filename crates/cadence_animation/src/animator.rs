//! Animator
//!
//! Creates animations, tracks which of them are running, and drives them
//! all from one shared clock. The clock only runs while at least one
//! animation is active.
//!
//! ```rust
//! use std::sync::Arc;
//! use cadence_animation::{AnimationConfig, Animator, ManualScheduler};
//!
//! let scheduler = Arc::new(ManualScheduler::new());
//! let animator = Animator::new(scheduler.clone());
//!
//! let fade = animator.animate(
//!     AnimationConfig::new()
//!         .duration(100.0)
//!         .from(0.0)
//!         .to(1.0)
//!         .time_source(|| 0.0),
//! );
//! fade.start();
//! assert_eq!(animator.active_len(), 1);
//!
//! scheduler.tick(50.0);
//! assert_eq!(fade.position(), 0.5);
//!
//! scheduler.tick(100.0);
//! assert!(fade.is_complete());
//! assert!(animator.is_idle());
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::animation::{Animation, AnimationConfig};
use crate::clock::{Clock, FrameClock, FrameScheduler};

/// Listener notified with the frame time after every tick
pub type FrameListener = Arc<dyn Fn(f64) + Send + Sync>;

struct AnimatorShared<C: Clock> {
    clock: Arc<C>,
    /// Running animations in start order
    active: Mutex<Vec<Animation>>,
    frame_listeners: Mutex<Vec<FrameListener>>,
}

impl<C: Clock> AnimatorShared<C> {
    fn frame(&self, time: f64) {
        // Listeners may remove entries while we iterate
        let active: SmallVec<[Animation; 8]> = self.active.lock().iter().cloned().collect();
        for animation in &active {
            animation.frame(time);
        }

        let listeners: SmallVec<[FrameListener; 4]> =
            self.frame_listeners.lock().iter().cloned().collect();
        for listener in &listeners {
            listener(time);
        }
    }

    fn activate(&self, animation: &Animation) {
        let first = {
            let mut active = self.active.lock();
            if active.iter().any(|a| a.ptr_eq(animation)) {
                return;
            }
            active.push(animation.clone());
            active.len() == 1
        };

        tracing::debug!(id = %animation.id(), "animation activated");

        if first {
            tracing::debug!("first active animation, starting clock");
            self.clock.start();
        }
    }

    fn deactivate(&self, animation: &Animation) {
        let now_empty = {
            let mut active = self.active.lock();
            let Some(index) = active.iter().position(|a| a.ptr_eq(animation)) else {
                return;
            };
            active.remove(index);
            active.is_empty()
        };

        tracing::debug!(id = %animation.id(), "animation deactivated");

        if now_empty {
            tracing::debug!("no active animations, stopping clock");
            self.clock.stop();
        }
    }
}

/// The shared scheduling context for a group of animations
///
/// Cloning yields another handle to the same animator.
pub struct Animator<C: Clock = FrameClock> {
    shared: Arc<AnimatorShared<C>>,
}

impl Animator<FrameClock> {
    /// Create an animator whose clock runs over `scheduler`
    pub fn new(scheduler: Arc<dyn FrameScheduler>) -> Self {
        Self::with_clock(Arc::new(FrameClock::new(scheduler)))
    }
}

impl<C: Clock> Animator<C> {
    /// Create an animator around a pre-built clock
    ///
    /// The clock's tick callback is replaced with one that drives this
    /// animator.
    pub fn with_clock(clock: Arc<C>) -> Self {
        let shared = Arc::new(AnimatorShared {
            clock,
            active: Mutex::new(Vec::new()),
            frame_listeners: Mutex::new(Vec::new()),
        });

        let weak: Weak<AnimatorShared<C>> = Arc::downgrade(&shared);
        shared.clock.set_on_tick(Arc::new(move |time| {
            if let Some(shared) = weak.upgrade() {
                shared.frame(time);
            }
        }));

        Self { shared }
    }

    /// Register a listener called with the time of every tick, after all
    /// active animations have been advanced
    pub fn on_frame<F>(&self, listener: F) -> &Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.shared.frame_listeners.lock().push(Arc::new(listener));
        self
    }

    /// Advance every active animation to `time`, then notify frame listeners
    ///
    /// Animations are advanced in start order from a snapshot taken before
    /// the first one runs, so animations that finish (or are started)
    /// during this frame do not disturb the pass.
    pub fn frame(&self, time: f64) {
        self.shared.frame(time);
    }

    /// Create an animation managed by this animator
    ///
    /// The animation is returned armed; it joins the active set when
    /// started and leaves it when stopped or complete.
    pub fn animate(&self, config: AnimationConfig) -> Animation {
        let animation = Animation::new(config);

        let weak = Arc::downgrade(&self.shared);
        animation.on_start(move |a| {
            if let Some(shared) = weak.upgrade() {
                shared.activate(a);
            }
        });

        let weak = Arc::downgrade(&self.shared);
        animation.on_stop(move |a| {
            if let Some(shared) = weak.upgrade() {
                shared.deactivate(a);
            }
        });

        let weak = Arc::downgrade(&self.shared);
        animation.on_complete(move |a| {
            if let Some(shared) = weak.upgrade() {
                shared.deactivate(a);
            }
        });

        animation
    }

    /// Snapshot of the running animations, in start order
    pub fn active(&self) -> Vec<Animation> {
        self.shared.active.lock().clone()
    }

    pub fn active_len(&self) -> usize {
        self.shared.active.lock().len()
    }

    /// Whether no animation is running
    pub fn is_idle(&self) -> bool {
        self.shared.active.lock().is_empty()
    }

    /// Stop every running animation
    pub fn stop_all(&self) {
        for animation in self.active() {
            animation.stop();
        }
    }

    pub fn clock(&self) -> &Arc<C> {
        &self.shared.clock
    }
}

impl<C: Clock> Clone for Animator<C> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<C: Clock> fmt::Debug for Animator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("active", &self.active_len())
            .field("clock_running", &self.shared.clock.is_running())
            .field("frame_listeners", &self.shared.frame_listeners.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TickCallback;
    use crate::scheduler::ManualScheduler;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Clock double counting start/stop calls
    #[derive(Default)]
    struct CountingClock {
        running: AtomicBool,
        starts: AtomicUsize,
        stops: AtomicUsize,
        on_tick: Mutex<Option<TickCallback>>,
    }

    impl CountingClock {
        fn starts(&self) -> usize {
            self.starts.load(Ordering::SeqCst)
        }

        fn stops(&self) -> usize {
            self.stops.load(Ordering::SeqCst)
        }

        fn fire(&self, time: f64) {
            let on_tick = self.on_tick.lock().clone();
            if let Some(on_tick) = on_tick {
                on_tick(time);
            }
        }
    }

    impl Clock for CountingClock {
        fn start(&self) -> &Self {
            self.running.store(true, Ordering::SeqCst);
            self.starts.fetch_add(1, Ordering::SeqCst);
            self
        }

        fn stop(&self) -> &Self {
            self.running.store(false, Ordering::SeqCst);
            self.stops.fetch_add(1, Ordering::SeqCst);
            self
        }

        fn is_running(&self) -> bool {
            self.running.load(Ordering::SeqCst)
        }

        fn set_on_tick(&self, on_tick: TickCallback) {
            *self.on_tick.lock() = Some(on_tick);
        }
    }

    fn counting_animator() -> (Arc<CountingClock>, Animator<CountingClock>) {
        let clock = Arc::new(CountingClock::default());
        let animator = Animator::with_clock(clock.clone());
        (clock, animator)
    }

    fn timed(duration: f64) -> AnimationConfig {
        AnimationConfig::new()
            .duration(duration)
            .from(0.0)
            .to(1.0)
            .time_source(|| 0.0)
    }

    #[test]
    fn test_on_frame_receives_time() {
        let (_, animator) = counting_animator();
        let seen = Arc::new(Mutex::new(0.0));
        let sink = seen.clone();
        animator.on_frame(move |t| *sink.lock() = t);

        animator.frame(42.0);
        assert_eq!(*seen.lock(), 42.0);
    }

    #[test]
    fn test_clock_tick_drives_frame() {
        let (clock, animator) = counting_animator();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        animator.on_frame(move |t| sink.lock().push(t));

        clock.fire(16.0);
        clock.fire(33.0);
        assert_eq!(*seen.lock(), vec![16.0, 33.0]);
    }

    #[test]
    fn test_frame_advances_every_active_animation() {
        let (_, animator) = counting_animator();
        let a = animator.animate(timed(1000.0));
        let b = animator.animate(timed(1000.0));
        a.start();
        b.start();

        animator.frame(100.0);
        assert_eq!(a.current_time(), 100.0);
        assert_eq!(b.current_time(), 100.0);
    }

    #[test]
    fn test_animations_advance_before_frame_listeners() {
        let (_, animator) = counting_animator();
        let animation = animator.animate(timed(1000.0));
        animation.start();

        let observed = Arc::new(Mutex::new(None));
        let sink = observed.clone();
        let handle = animation.clone();
        animator.on_frame(move |_| *sink.lock() = Some(handle.frame_count()));

        animator.frame(10.0);
        assert_eq!(*observed.lock(), Some(1));
    }

    #[test]
    fn test_animate_returns_armed_animation() {
        let (clock, animator) = counting_animator();
        let animation = animator.animate(AnimationConfig::new());

        assert!(!animation.is_running());
        assert_eq!(animator.active_len(), 0);
        assert_eq!(clock.starts(), 0);
    }

    #[test]
    fn test_start_adds_to_active() {
        let (_, animator) = counting_animator();
        let animation = animator.animate(AnimationConfig::new());

        assert_eq!(animator.active_len(), 0);
        animation.start();
        assert_eq!(animator.active_len(), 1);
        assert_eq!(animator.active()[0], animation);

        // Redundant start does not duplicate the entry
        animation.start();
        assert_eq!(animator.active_len(), 1);
    }

    #[test]
    fn test_stop_removes_from_active() {
        let (_, animator) = counting_animator();
        let animation = animator.animate(AnimationConfig::new());

        animation.start();
        assert_eq!(animator.active_len(), 1);
        animation.stop();
        assert_eq!(animator.active_len(), 0);
    }

    #[test]
    fn test_complete_removes_from_active() {
        let (clock, animator) = counting_animator();
        let animation = animator.animate(timed(100.0));

        animation.start();
        animator.frame(50.0);
        assert_eq!(animator.active_len(), 1);

        animator.frame(100.0);
        assert!(animation.is_complete());
        assert_eq!(animator.active_len(), 0);
        assert_eq!(clock.stops(), 1);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_first_start_starts_clock() {
        let (clock, animator) = counting_animator();
        let animation = animator.animate(AnimationConfig::new());

        animation.start();
        assert_eq!(clock.starts(), 1);
        assert!(clock.is_running());
    }

    #[test]
    fn test_clock_stops_when_last_animation_ends() {
        let (clock, animator) = counting_animator();

        let a1 = animator.animate(AnimationConfig::new());
        assert_eq!(clock.starts(), 0);
        assert_eq!(clock.stops(), 0);

        a1.start();
        assert_eq!(clock.starts(), 1);
        assert_eq!(clock.stops(), 0);

        let a2 = animator.animate(AnimationConfig::new());
        a2.start();
        assert_eq!(clock.starts(), 1);

        a1.stop();
        assert_eq!(clock.stops(), 0);

        a2.stop();
        assert_eq!(clock.stops(), 1);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_completion_during_frame_does_not_skip_others() {
        let (_, animator) = counting_animator();
        let short = animator.animate(timed(10.0));
        let long = animator.animate(timed(1000.0));
        short.start();
        long.start();

        animator.frame(10.0);

        assert!(short.is_complete());
        assert_eq!(long.frame_count(), 1);
        assert_eq!(animator.active(), vec![long]);
    }

    #[test]
    fn test_animation_started_during_frame_waits_for_next_tick() {
        let (_, animator) = counting_animator();
        let first = animator.animate(timed(10.0));
        let second = animator.animate(timed(1000.0));

        let follow_up = second.clone();
        first.on_complete(move |_| {
            follow_up.start();
        });

        first.start();
        animator.frame(10.0);

        assert!(second.is_running());
        assert_eq!(second.frame_count(), 0);

        animator.frame(20.0);
        assert_eq!(second.frame_count(), 1);
    }

    #[test]
    fn test_unmanaged_animation_is_not_tracked() {
        let (clock, animator) = counting_animator();
        let animation = Animation::new(AnimationConfig::new());
        animation.start();

        assert!(animator.is_idle());
        assert_eq!(clock.starts(), 0);
    }

    #[test]
    fn test_stop_all() {
        let (clock, animator) = counting_animator();
        let a = animator.animate(AnimationConfig::new());
        let b = animator.animate(AnimationConfig::new());
        a.start();
        b.start();

        animator.stop_all();
        assert!(animator.is_idle());
        assert!(!a.is_running());
        assert!(!b.is_running());
        assert_eq!(clock.stops(), 1);
    }

    #[test]
    fn test_frame_clock_runs_only_while_active() {
        let scheduler = Arc::new(ManualScheduler::new());
        let animator = Animator::new(scheduler.clone());
        let animation = animator.animate(timed(32.0));

        assert!(!animator.clock().is_running());
        assert!(!scheduler.has_pending_frames());

        animation.start();
        assert!(animator.clock().is_running());
        assert_eq!(scheduler.pending_frames(), 1);

        scheduler.tick(16.0);
        assert_eq!(animation.frame_count(), 1);
        assert_eq!(scheduler.pending_frames(), 1);

        scheduler.tick(32.0);
        assert!(animation.is_complete());
        assert!(!animator.clock().is_running());
        assert!(!scheduler.has_pending_frames());
    }
}
