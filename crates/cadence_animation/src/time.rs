//! Time sources
//!
//! Animations read "now" through a [`TimeSource`] so tests can substitute
//! a deterministic clock. Times are milliseconds, matching animation
//! durations.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Zero-argument function returning the current time in milliseconds
pub type TimeSource = Arc<dyn Fn() -> f64 + Send + Sync>;

fn epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// Milliseconds elapsed since the process-wide epoch (first call)
pub fn monotonic_now() -> f64 {
    epoch().elapsed().as_secs_f64() * 1000.0
}

/// The default time source, backed by [`monotonic_now`]
pub fn monotonic() -> TimeSource {
    Arc::new(monotonic_now)
}

/// A time source that always returns `time`
pub fn fixed(time: f64) -> TimeSource {
    Arc::new(move || time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_never_goes_backwards() {
        let source = monotonic();
        let a = source();
        let b = source();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn test_fixed() {
        let source = fixed(42.0);
        assert_eq!(source(), 42.0);
        assert_eq!(source(), 42.0);
    }
}
