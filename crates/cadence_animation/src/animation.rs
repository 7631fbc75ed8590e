//! Timed value animations
//!
//! An [`Animation`] interpolates one number from `from` to `to` over
//! `duration` milliseconds, optionally mirroring the result onto a
//! property of a target object. It does not tick itself: an owner (usually
//! the [`Animator`](crate::Animator)) calls [`Animation::frame`] with the
//! current time once per frame.
//!
//! ```rust
//! use cadence_animation::{Animation, AnimationConfig, Easing};
//!
//! let animation = Animation::new(
//!     AnimationConfig::new()
//!         .duration(500.0)
//!         .from(1000.0)
//!         .to(2000.0)
//!         .easing(Easing::In)
//!         .time_source(|| 8000.0),
//! );
//!
//! animation.start();
//! animation.frame(8250.0);
//! assert_eq!(animation.position(), 1250.0);
//!
//! animation.frame(8500.0);
//! assert!(animation.is_complete());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cadence_core::error::validate_duration;
use cadence_core::{
    AnimationEvent, Lifecycle, LifecycleEvent, LifecycleState, ListenerRegistry, PropertyTarget,
    SharedTarget,
};
use parking_lot::Mutex;

use crate::easing::Easing;
use crate::time::{self, TimeSource};

/// Duration used when none is configured, in milliseconds
pub const DEFAULT_DURATION: f64 = 1000.0;

/// Options for creating an [`Animation`]
///
/// Every field is optional; unset fields fall back to the defaults
/// (`duration = 1000`, linear easing, monotonic time source).
#[derive(Clone)]
pub struct AnimationConfig {
    /// Milliseconds; a non-positive or non-finite value falls back to
    /// [`DEFAULT_DURATION`]
    pub duration: f64,
    /// Start value; when unset it is read from the target at `start()`
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub easing: Easing,
    pub target: Option<SharedTarget>,
    pub property: Option<String>,
    /// Overrides the source of "now" (for deterministic tests)
    pub time_source: Option<TimeSource>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            from: None,
            to: None,
            easing: Easing::default(),
            target: None,
            property: None,
            time_source: None,
        }
    }
}

impl AnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn from(mut self, from: f64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: f64) -> Self {
        self.to = Some(to);
        self
    }

    pub fn easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = easing.into();
        self
    }

    /// Set the object whose `property` mirrors the animated position
    pub fn target<T: PropertyTarget + 'static>(mut self, target: Arc<Mutex<T>>) -> Self {
        self.target = Some(target);
        self
    }

    /// Like [`AnimationConfig::target`], for an already type-erased target
    pub fn shared_target(mut self, target: SharedTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn time_source<F>(mut self, now: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.time_source = Some(Arc::new(now));
        self
    }
}

impl fmt::Debug for AnimationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationConfig")
            .field("duration", &self.duration)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("easing", &self.easing)
            .field("target", &self.target.is_some())
            .field("property", &self.property)
            .field("time_source", &self.time_source.is_some())
            .finish()
    }
}

/// Process-unique animation identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        AnimationId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Runtime fields of an animation captured at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSnapshot {
    pub state: LifecycleState,
    pub start_time: f64,
    pub current_time: f64,
    pub elapsed: f64,
    pub delta: f64,
    pub progress: f64,
    pub position: f64,
    pub frame_count: u64,
}

struct AnimationState {
    duration: f64,
    from: Option<f64>,
    to: Option<f64>,
    easing: Easing,
    target: Option<SharedTarget>,
    property: Option<String>,
    now: TimeSource,
    lifecycle: Lifecycle,
    start_time: f64,
    current_time: f64,
    elapsed: f64,
    delta: f64,
    progress: f64,
    position: f64,
    frame_count: u64,
}

impl AnimationState {
    /// The target and property, only when both are set
    fn binding(&self) -> Option<(&SharedTarget, &str)> {
        match (&self.target, &self.property) {
            (Some(target), Some(property)) => Some((target, property.as_str())),
            _ => None,
        }
    }

    /// Fill in an unset `from` from the target's current value
    fn resolve_from(&mut self, id: AnimationId) {
        if self.from.is_some() {
            return;
        }

        let read = self
            .binding()
            .map(|(target, property)| (target.lock().property(property), property.to_string()));

        match read {
            Some((Some(value), _)) => self.from = Some(value),
            Some((None, property)) => tracing::warn!(
                %id,
                property = %property,
                "target has no such property; animating from 0"
            ),
            None => tracing::warn!(
                %id,
                "animation started without `from` or a target to read it from; animating from 0"
            ),
        }
    }

    fn compute_position(&self) -> f64 {
        // An unset `from` is treated as 0 (already reported by resolve_from),
        // an unset `to` as no change
        let from = self.from.unwrap_or(0.0);
        let to = self.to.unwrap_or(from);
        self.easing
            .apply(self.elapsed, from, to - from, self.duration)
    }

    fn write_target(&self) {
        if let Some((target, property)) = self.binding() {
            target.lock().set_property(property, self.position);
        }
    }

    fn snapshot(&self) -> AnimationSnapshot {
        AnimationSnapshot {
            state: self.lifecycle.current(),
            start_time: self.start_time,
            current_time: self.current_time,
            elapsed: self.elapsed,
            delta: self.delta,
            progress: self.progress,
            position: self.position,
            frame_count: self.frame_count,
        }
    }
}

struct AnimationInner {
    id: AnimationId,
    state: Mutex<AnimationState>,
    listeners: Mutex<ListenerRegistry<Animation>>,
}

/// A single timed transition
///
/// Cloning yields another handle to the same animation. Listeners receive
/// the animation itself and may call back into it (for example `stop()`
/// from a `frame` listener); no internal lock is held while they run.
#[derive(Clone)]
pub struct Animation {
    inner: Arc<AnimationInner>,
}

impl Animation {
    pub fn new(config: AnimationConfig) -> Self {
        let id = AnimationId::next();

        match (&config.target, &config.property) {
            (Some(_), None) => {
                tracing::warn!(%id, "target set without a property; target will not be updated")
            }
            (None, Some(property)) => tracing::warn!(
                %id,
                property = %property,
                "property set without a target; nothing will be updated"
            ),
            _ => {}
        }

        let duration = match validate_duration(config.duration) {
            Ok(duration) => duration,
            Err(err) => {
                tracing::warn!(%id, %err, fallback = DEFAULT_DURATION, "using default duration");
                DEFAULT_DURATION
            }
        };

        let state = AnimationState {
            duration,
            from: config.from,
            to: config.to,
            easing: config.easing,
            target: config.target,
            property: config.property,
            now: config.time_source.unwrap_or_else(time::monotonic),
            lifecycle: Lifecycle::new(),
            start_time: 0.0,
            current_time: 0.0,
            elapsed: 0.0,
            delta: 0.0,
            progress: 0.0,
            position: config.from.unwrap_or(0.0),
            frame_count: 0,
        };

        Self {
            inner: Arc::new(AnimationInner {
                id,
                state: Mutex::new(state),
                listeners: Mutex::new(ListenerRegistry::new()),
            }),
        }
    }

    /// Begin running; no-op unless the animation is still armed
    ///
    /// Captures the start time, resolves `from`, writes the initial
    /// position to the target and fires `start` listeners.
    pub fn start(&self) -> &Self {
        {
            let mut state = self.inner.state.lock();
            if !state.lifecycle.can_send(LifecycleEvent::Start) {
                return self;
            }

            let now = (state.now)();
            state.start_time = now;
            state.current_time = now;
            state.elapsed = 0.0;
            state.delta = 0.0;
            state.progress = 0.0;
            state.frame_count = 0;

            state.resolve_from(self.id());
            if state.to.is_none() {
                tracing::warn!(id = %self.id(), "animation started without `to`; position will not change");
            }

            state.position = state.compute_position();
            state.write_target();
            state.lifecycle.send(LifecycleEvent::Start);

            tracing::debug!(
                id = %self.id(),
                start_time = now,
                duration = state.duration,
                easing = %state.easing,
                "animation started"
            );
        }

        self.emit(AnimationEvent::Start);
        self
    }

    /// Advance to `time`; no-op unless running
    ///
    /// Fires `frame` listeners, then `complete` listeners once elapsed time
    /// reaches the duration.
    pub fn frame(&self, time: f64) -> &Self {
        let finished = {
            let mut state = self.inner.state.lock();
            if !state.lifecycle.is_in(LifecycleState::Running) {
                return self;
            }

            state.delta = time - state.current_time;
            state.current_time = time;
            state.elapsed = (state.current_time - state.start_time).max(0.0);
            state.progress = state.elapsed / state.duration;
            state.frame_count += 1;
            state.position = state.compute_position();
            state.write_target();

            tracing::trace!(
                id = %self.id(),
                time,
                elapsed = state.elapsed,
                position = state.position,
                "animation frame"
            );

            state.elapsed >= state.duration
        };

        self.emit(AnimationEvent::Frame);

        if finished {
            // A frame listener may already have stopped us
            let completed = self
                .inner
                .state
                .lock()
                .lifecycle
                .send(LifecycleEvent::Finish)
                .is_some();
            if completed {
                tracing::debug!(id = %self.id(), "animation complete");
                self.emit(AnimationEvent::Complete);
            }
        }

        self
    }

    /// Cancel the animation; no-op unless running
    pub fn stop(&self) -> &Self {
        let stopped = self
            .inner
            .state
            .lock()
            .lifecycle
            .send(LifecycleEvent::Stop)
            .is_some();

        if stopped {
            tracing::debug!(id = %self.id(), "animation stopped");
            self.emit(AnimationEvent::Stop);
        }
        self
    }

    /// Register a listener for `event`
    pub fn on<F>(&self, event: AnimationEvent, listener: F) -> &Self
    where
        F: Fn(&Animation) + Send + Sync + 'static,
    {
        self.inner.listeners.lock().register(event, listener);
        self
    }

    pub fn on_start<F>(&self, listener: F) -> &Self
    where
        F: Fn(&Animation) + Send + Sync + 'static,
    {
        self.on(AnimationEvent::Start, listener)
    }

    pub fn on_frame<F>(&self, listener: F) -> &Self
    where
        F: Fn(&Animation) + Send + Sync + 'static,
    {
        self.on(AnimationEvent::Frame, listener)
    }

    pub fn on_stop<F>(&self, listener: F) -> &Self
    where
        F: Fn(&Animation) + Send + Sync + 'static,
    {
        self.on(AnimationEvent::Stop, listener)
    }

    pub fn on_complete<F>(&self, listener: F) -> &Self
    where
        F: Fn(&Animation) + Send + Sync + 'static,
    {
        self.on(AnimationEvent::Complete, listener)
    }

    fn emit(&self, event: AnimationEvent) {
        let listeners = self.inner.listeners.lock().snapshot(event);
        for listener in listeners {
            listener(self);
        }
    }

    /// Replace the source of "now" used by `start()`
    pub fn set_time_source<F>(&self, now: F)
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.inner.state.lock().now = Arc::new(now);
    }

    pub fn id(&self) -> AnimationId {
        self.inner.id
    }

    /// Whether both handles refer to the same animation
    pub fn ptr_eq(&self, other: &Animation) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.state.lock().lifecycle.current()
    }

    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    pub fn is_complete(&self) -> bool {
        self.state() == LifecycleState::Complete
    }

    pub fn duration(&self) -> f64 {
        self.inner.state.lock().duration
    }

    /// Start value; filled from the target at `start()` when unset
    pub fn from(&self) -> Option<f64> {
        self.inner.state.lock().from
    }

    pub fn to(&self) -> Option<f64> {
        self.inner.state.lock().to
    }

    pub fn easing(&self) -> Easing {
        self.inner.state.lock().easing
    }

    pub fn target(&self) -> Option<SharedTarget> {
        self.inner.state.lock().target.clone()
    }

    pub fn property(&self) -> Option<String> {
        self.inner.state.lock().property.clone()
    }

    pub fn start_time(&self) -> f64 {
        self.inner.state.lock().start_time
    }

    pub fn current_time(&self) -> f64 {
        self.inner.state.lock().current_time
    }

    pub fn elapsed(&self) -> f64 {
        self.inner.state.lock().elapsed
    }

    /// Time between the two most recent frames
    pub fn delta(&self) -> f64 {
        self.inner.state.lock().delta
    }

    /// Elapsed time over duration; not clamped, may exceed 1 on the final frame
    pub fn progress(&self) -> f64 {
        self.inner.state.lock().progress
    }

    pub fn position(&self) -> f64 {
        self.inner.state.lock().position
    }

    pub fn frame_count(&self) -> u64 {
        self.inner.state.lock().frame_count
    }

    /// All runtime fields read under a single lock
    pub fn snapshot(&self) -> AnimationSnapshot {
        self.inner.state.lock().snapshot()
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl PartialEq for Animation {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Animation {}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Animation")
            .field("id", &self.inner.id)
            .field("state", &state.lifecycle.current())
            .field("duration", &state.duration)
            .field("from", &state.from)
            .field("to", &state.to)
            .field("easing", &state.easing)
            .field("position", &state.position)
            .field("frame_count", &state.frame_count)
            .finish()
    }
}
