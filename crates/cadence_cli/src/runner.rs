//! Frame loop driving an animator from the terminal
//!
//! This is the composition root: the only place a frame scheduler is
//! chosen and handed to the engine.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use cadence_animation::{time, Animation, Animator, Clock, ManualScheduler};
use parking_lot::Mutex;

use crate::config::CadenceConfig;
use crate::render;

/// How frame timestamps are produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeMode {
    /// Sleep between frames and read the monotonic clock
    Realtime,
    /// Advance a virtual clock by one interval per frame, without sleeping
    Simulated,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub completed: usize,
    /// Final value of every animated property
    pub values: BTreeMap<String, f64>,
}

/// Run every configured animation until all complete or the frame budget
/// is spent, writing one line per frame to `out`
pub fn run(
    config: &CadenceConfig,
    mode: TimeMode,
    bar_width: usize,
    out: &mut impl Write,
) -> Result<RunSummary> {
    let scheduler = Arc::new(ManualScheduler::new());
    let animator = Animator::new(scheduler.clone());
    let target = Arc::new(Mutex::new(BTreeMap::<String, f64>::new()));

    let interval_ms = config.clock.interval_ms();
    let start = match mode {
        TimeMode::Realtime => time::monotonic_now(),
        TimeMode::Simulated => 0.0,
    };

    let mut ranges = BTreeMap::new();
    let mut animations: Vec<Animation> = Vec::new();
    for spec in &config.animations {
        let mut anim_config = spec.to_config()?.target(target.clone());
        if mode == TimeMode::Simulated {
            anim_config = anim_config.time_source(move || start);
        }

        // The first animation of a property seeds it, so a later one without
        // `from` continues from that value
        let from = {
            let mut values = target.lock();
            let current = *values
                .entry(spec.property.clone())
                .or_insert_with(|| spec.from.unwrap_or(0.0));
            spec.from.unwrap_or(current)
        };
        ranges.insert(spec.property.clone(), (from, spec.to));
        animations.push(animator.animate(anim_config));
    }

    let lines = Arc::new(Mutex::new(Vec::new()));
    {
        let lines = lines.clone();
        let target = target.clone();
        animator.on_frame(move |now| {
            let values = target.lock().clone();
            lines
                .lock()
                .push(render::frame_line(now - start, &values, &ranges, bar_width));
        });
    }

    tracing::info!(
        animations = animations.len(),
        fps = config.clock.fps,
        ?mode,
        "starting animations"
    );
    for animation in &animations {
        animation.start();
    }

    let mut frames = 0;
    while frames < config.clock.max_frames && scheduler.has_pending_frames() {
        let now = match mode {
            TimeMode::Realtime => {
                thread::sleep(Duration::from_secs_f64(interval_ms / 1000.0));
                time::monotonic_now()
            }
            TimeMode::Simulated => start + interval_ms * (frames + 1) as f64,
        };
        scheduler.tick(now);
        frames += 1;

        for line in lines.lock().drain(..) {
            writeln!(out, "{}", line)?;
        }
    }

    if !animator.is_idle() {
        tracing::warn!(
            still_running = animator.active_len(),
            max_frames = config.clock.max_frames,
            "frame budget exhausted, stopping remaining animations"
        );
        animator.stop_all();
    }
    debug_assert!(!animator.clock().is_running());

    let completed = animations.iter().filter(|a| a.is_complete()).count();
    tracing::info!(frames, completed, "run finished");

    let values = target.lock().clone();
    Ok(RunSummary {
        frames,
        completed,
        values,
    })
}
