//! Property targets
//!
//! An animation may mirror its position onto a named numeric property of
//! an external object. Anything that can get and set an `f64` by key can
//! be a target.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use parking_lot::Mutex;

/// An object with numeric properties addressed by name
pub trait PropertyTarget: Send {
    /// Read a property, `None` if the target has no such property
    fn property(&self, key: &str) -> Option<f64>;

    /// Write a property
    fn set_property(&mut self, key: &str, value: f64);
}

/// A target shared between an animation and its owner
pub type SharedTarget = Arc<Mutex<dyn PropertyTarget>>;

impl<S: BuildHasher + Send> PropertyTarget for HashMap<String, f64, S> {
    fn property(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }

    fn set_property(&mut self, key: &str, value: f64) {
        match self.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.insert(key.to_string(), value);
            }
        }
    }
}

impl PropertyTarget for BTreeMap<String, f64> {
    fn property(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }

    fn set_property(&mut self, key: &str, value: f64) {
        match self.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.insert(key.to_string(), value);
            }
        }
    }
}
