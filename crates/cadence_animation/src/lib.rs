//! Cadence Animation Engine
//!
//! Frame-driven value animations with easing.
//!
//! # Features
//!
//! - **Easing**: Penner-style curves over absolute time (quadratic, cubic, sine, circular)
//! - **Animations**: Cancellable, observable transitions with `start`/`frame`/`stop`/`complete` events
//! - **Property Targets**: Mirror the animated value onto a named property each frame
//! - **Animator**: One shared clock for many animations, running only while any is active
//! - **Injected Scheduling**: The frame primitive is always supplied by the host

pub mod animation;
pub mod animator;
pub mod clock;
pub mod easing;
pub mod scheduler;
pub mod time;

pub use animation::{Animation, AnimationConfig, AnimationId, AnimationSnapshot, DEFAULT_DURATION};
pub use animator::{Animator, FrameListener};
pub use clock::{Clock, FrameCallback, FrameClock, FrameHandle, FrameScheduler, TickCallback};
pub use easing::{Easing, EasingFn};
pub use scheduler::ManualScheduler;
pub use time::TimeSource;

pub use cadence_core::{AnimationEvent, LifecycleState, PropertyTarget, SharedTarget};
