//! Animation event channels
//!
//! Animations expose exactly four events. Rather than a dynamic event bus
//! keyed by strings, every emitter owns one ordered listener list per
//! event.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::CadenceError;

/// The events an animation emits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationEvent {
    /// The animation began running
    Start,
    /// The animation advanced by one frame
    Frame,
    /// The animation was cancelled
    Stop,
    /// The animation reached its duration
    Complete,
}

impl AnimationEvent {
    /// Every event, in channel order
    pub const ALL: [AnimationEvent; 4] = [
        AnimationEvent::Start,
        AnimationEvent::Frame,
        AnimationEvent::Stop,
        AnimationEvent::Complete,
    ];

    /// The event's canonical name
    pub fn name(self) -> &'static str {
        match self {
            AnimationEvent::Start => "start",
            AnimationEvent::Frame => "frame",
            AnimationEvent::Stop => "stop",
            AnimationEvent::Complete => "complete",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AnimationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationEvent {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationEvent::ALL
            .into_iter()
            .find(|event| event.name() == s)
            .ok_or_else(|| CadenceError::UnknownEvent(s.to_string()))
    }
}

/// Event listener function type
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ordered listener lists, one per [`AnimationEvent`]
pub struct ListenerRegistry<T: ?Sized> {
    channels: [SmallVec<[Listener<T>; 2]>; 4],
}

impl<T: ?Sized> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            channels: Default::default(),
        }
    }

    /// Register a listener; listeners run in registration order
    pub fn register<F>(&mut self, event: AnimationEvent, listener: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.channels[event.index()].push(Arc::new(listener));
    }

    /// Clone the listeners for an event
    ///
    /// Emitters call listeners from the snapshot after releasing any lock on
    /// the registry, so a listener may register further listeners or
    /// trigger other events on the same emitter.
    pub fn snapshot(&self, event: AnimationEvent) -> SmallVec<[Listener<T>; 2]> {
        self.channels[event.index()].clone()
    }

    /// Number of listeners registered for an event
    pub fn len(&self, event: AnimationEvent) -> usize {
        self.channels[event.index()].len()
    }

    /// Check if no listeners are registered for an event
    pub fn is_empty(&self, event: AnimationEvent) -> bool {
        self.channels[event.index()].is_empty()
    }

    /// Remove every listener
    pub fn clear(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.clear();
        }
    }
}

impl<T: ?Sized> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ListenerRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for event in AnimationEvent::ALL {
            map.entry(&event.name(), &self.len(event));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_event_names_round_trip() {
        for event in AnimationEvent::ALL {
            assert_eq!(event.name().parse::<AnimationEvent>(), Ok(event));
        }
        assert_eq!(
            "finish".parse::<AnimationEvent>(),
            Err(CadenceError::UnknownEvent("finish".to_string()))
        );
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry: ListenerRegistry<u32> = ListenerRegistry::new();

        let first = calls.clone();
        registry.register(AnimationEvent::Frame, move |v| first.lock().push(("a", *v)));
        let second = calls.clone();
        registry.register(AnimationEvent::Frame, move |v| second.lock().push(("b", *v)));

        for listener in registry.snapshot(AnimationEvent::Frame) {
            listener(&7);
        }

        assert_eq!(*calls.lock(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut registry: ListenerRegistry<()> = ListenerRegistry::new();
        registry.register(AnimationEvent::Start, |_| {});
        registry.register(AnimationEvent::Start, |_| {});
        registry.register(AnimationEvent::Complete, |_| {});

        assert_eq!(registry.len(AnimationEvent::Start), 2);
        assert_eq!(registry.len(AnimationEvent::Complete), 1);
        assert!(registry.is_empty(AnimationEvent::Frame));
        assert!(registry.is_empty(AnimationEvent::Stop));

        registry.clear();
        assert!(registry.is_empty(AnimationEvent::Start));
    }
}
