use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::warn;

use super::scene::TickReport;

static POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn recover_poisoned<T>(poisoned: PoisonError<T>, operation: &'static str) -> T {
    if !POISON_WARNED.swap(true, Ordering::Relaxed) {
        warn!(operation, "metrics lock poisoned; recovered inner value");
    }
    poisoned.into_inner()
}

/// Pacing and exploration rates over the last closed interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    /// Ticks that had a direction held, whether or not the player got anywhere.
    pub moving_ticks: u32,
    /// Ticks where terrain or an object forced an axis fallback or a full revert.
    pub blocked_ticks: u32,
}

/// Latest published snapshot, shared between the loop and whoever reports on it.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    latest: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        *self
            .latest
            .read()
            .unwrap_or_else(|poisoned| recover_poisoned(poisoned, "read"))
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        *self
            .latest
            .write()
            .unwrap_or_else(|poisoned| recover_poisoned(poisoned, "write")) = snapshot;
    }
}

#[derive(Debug, Default)]
struct IntervalCounts {
    frames: u32,
    ticks: u32,
    moving_ticks: u32,
    blocked_ticks: u32,
    frame_time: Duration,
}

impl IntervalCounts {
    fn rates_over(&self, elapsed: Duration) -> LoopMetricsSnapshot {
        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time.as_secs_f32() * 1000.0 / frames as f32,
        };
        LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms,
            moving_ticks: self.moving_ticks,
            blocked_ticks: self.blocked_ticks,
        }
    }
}

/// Counts frames and simulation outcomes until the reporting interval elapses.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    counts: IntervalCounts,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval_start: Instant::now(),
            interval,
            counts: IntervalCounts::default(),
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.counts.frames = self.counts.frames.saturating_add(1);
        self.counts.frame_time = self.counts.frame_time.saturating_add(frame_dt);
    }

    pub(crate) fn record_tick(&mut self, report: &TickReport) {
        let counts = &mut self.counts;
        counts.ticks = counts.ticks.saturating_add(1);
        counts.moving_ticks = counts
            .moving_ticks
            .saturating_add(u32::from(report.player.moving));
        counts.blocked_ticks = counts
            .blocked_ticks
            .saturating_add(u32::from(report.resolution.is_blocked()));
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let due = now.saturating_duration_since(self.interval_start) >= self.interval;
        due.then(|| self.take_snapshot(now))
    }

    /// Closes the current interval regardless of its length.
    pub(crate) fn take_snapshot(&mut self, now: Instant) -> LoopMetricsSnapshot {
        let elapsed = now.saturating_duration_since(self.interval_start);
        self.interval_start = now;
        mem::take(&mut self.counts).rates_over(elapsed)
    }
}
