//! Manual frame scheduler
//!
//! A [`FrameScheduler`] with no platform behind it: frame requests are
//! queued until the owner calls [`ManualScheduler::tick`]. Headless hosts,
//! tests, and the real-time loop of the command-line driver all deliver
//! frames through it.

use std::fmt;

use parking_lot::Mutex;
use slotmap::SlotMap;

use crate::clock::{FrameCallback, FrameHandle, FrameScheduler};

struct PendingFrame {
    /// Request order, so delivery is reproducible regardless of slot reuse
    sequence: u64,
    callback: FrameCallback,
}

#[derive(Default)]
struct Pending {
    frames: SlotMap<FrameHandle, PendingFrame>,
    next_sequence: u64,
}

/// Frame scheduler driven by explicit `tick` calls
#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<Pending>,
    last_tick: Mutex<Option<f64>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver every frame requested before this call, in request order
    ///
    /// Requests made by the callbacks themselves wait for the next tick.
    /// Returns the number of callbacks delivered.
    pub fn tick(&self, time: f64) -> usize {
        let mut frames: Vec<PendingFrame> = {
            let mut pending = self.pending.lock();
            pending.frames.drain().map(|(_, frame)| frame).collect()
        };
        frames.sort_by_key(|frame| frame.sequence);

        *self.last_tick.lock() = Some(time);

        let delivered = frames.len();
        for frame in frames {
            (frame.callback)(time);
        }
        delivered
    }

    /// Tick until no frames are pending or `max_frames` ticks have run
    ///
    /// `next_time` supplies the timestamp for each tick; a real-time host
    /// sleeps inside it, a simulation just advances a counter. Returns the
    /// number of ticks run.
    pub fn run_until_idle<F>(&self, max_frames: u32, mut next_time: F) -> u32
    where
        F: FnMut() -> f64,
    {
        let mut ticks = 0;
        while ticks < max_frames && self.has_pending_frames() {
            self.tick(next_time());
            ticks += 1;
        }
        ticks
    }

    /// Number of outstanding frame requests
    pub fn pending_frames(&self) -> usize {
        self.pending.lock().frames.len()
    }

    pub fn has_pending_frames(&self) -> bool {
        !self.pending.lock().frames.is_empty()
    }

    /// Timestamp of the most recent tick
    pub fn last_tick(&self) -> Option<f64> {
        *self.last_tick.lock()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut pending = self.pending.lock();
        let sequence = pending.next_sequence;
        pending.next_sequence += 1;
        pending.frames.insert(PendingFrame { sequence, callback })
    }

    fn cancel_scheduled_frame(&self, handle: FrameHandle) {
        self.pending.lock().frames.remove(handle);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending_frames())
            .field("last_tick", &self.last_tick())
            .finish()
    }
}
