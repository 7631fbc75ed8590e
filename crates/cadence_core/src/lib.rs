//! Cadence Core
//!
//! Engine-independent primitives shared by the Cadence animation crates:
//!
//! - **Lifecycle**: the armed → running → stopped/complete state machine
//! - **Event Channels**: one ordered listener list per animation event
//! - **Property Targets**: objects whose numeric properties an animation writes
//! - **Errors**: the parsing and configuration error taxonomy
//!
//! # Example
//!
//! ```rust
//! use cadence_core::fsm::{Lifecycle, LifecycleEvent, LifecycleState};
//!
//! let mut lifecycle = Lifecycle::new();
//! assert_eq!(lifecycle.send(LifecycleEvent::Start), Some(LifecycleState::Running));
//!
//! // A second start is not a transition
//! assert_eq!(lifecycle.send(LifecycleEvent::Start), None);
//!
//! lifecycle.send(LifecycleEvent::Stop);
//! assert!(lifecycle.is_terminal());
//! ```

pub mod error;
pub mod events;
pub mod fsm;
pub mod target;

pub use error::{CadenceError, Result};
pub use events::{AnimationEvent, Listener, ListenerRegistry};
pub use fsm::{Lifecycle, LifecycleEvent, LifecycleState, Transition};
pub use target::{PropertyTarget, SharedTarget};
