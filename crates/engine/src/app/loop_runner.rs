use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::sim::PlayerState;

use super::metrics::MetricsAccumulator;
use super::scene::{Scene, SceneCommand, SimulationState, TickReport, Vec2};
use super::MetricsHandle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Ticks follow wall-clock time through the fixed-step clock.
    #[default]
    Realtime,
    /// One tick per frame, no sleeping.
    Unpaced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub pacing: Pacing,
    /// Stop after this many ticks; `None` runs until the scene quits.
    pub max_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            pacing: Pacing::Realtime,
            max_ticks: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames: u64,
    pub moving_ticks: u64,
    pub blocked_ticks: u64,
    pub regenerations: u32,
    pub failed_regenerations: u32,
    pub seed: Option<u64>,
    pub world_width: u32,
    pub world_height: u32,
    pub object_count: usize,
    pub fingerprint: String,
    pub player: PlayerState,
    pub camera: Vec2,
}

#[derive(Debug, Default)]
struct RunTotals {
    frames: u64,
    moving_ticks: u64,
    blocked_ticks: u64,
    regenerations: u32,
    failed_regenerations: u32,
}

impl RunTotals {
    fn record_tick(&mut self, report: &TickReport) {
        if report.player.moving {
            self.moving_ticks += 1;
        }
        if report.resolution.is_blocked() {
            self.blocked_ticks += 1;
        }
    }
}

pub fn run_app(
    config: LoopConfig,
    state: &mut SimulationState,
    scene: &mut dyn Scene,
) -> RunSummary {
    let metrics_handle = MetricsHandle::default();
    run_app_with_metrics(config, state, scene, metrics_handle)
}

pub fn run_app_with_metrics(
    config: LoopConfig,
    state: &mut SimulationState,
    scene: &mut dyn Scene,
    metrics_handle: MetricsHandle,
) -> RunSummary {
    let mut clock = FixedStepClock::new(&config);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));

    info!(
        target_tps = clock.target_tps(),
        max_frame_delta_ms = clock.max_frame_delta.as_millis() as u64,
        max_ticks_per_frame = clock.max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        pacing = ?config.pacing,
        max_ticks = ?config.max_ticks,
        "loop_config"
    );

    scene.load(state);
    info!(
        width = state.world().width_tiles(),
        height = state.world().height_tiles(),
        object_count = state.world().objects().len(),
        "scene_loaded"
    );

    let started = Instant::now();
    let mut last_frame_instant = started;
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut totals = RunTotals::default();
    let max_ticks = config.max_ticks;
    let tick_limit_reached =
        |state: &SimulationState| max_ticks.is_some_and(|max| state.tick_count() >= max);

    'frames: loop {
        if tick_limit_reached(state) {
            break;
        }

        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;

        let ticks_to_run = match config.pacing {
            Pacing::Realtime => clock.advance(raw_frame_dt).ticks_to_run,
            Pacing::Unpaced => 1,
        };

        for _ in 0..ticks_to_run {
            if tick_limit_reached(state) {
                break 'frames;
            }
            let input = scene.sample_input(state.tick_count());
            let report = state.tick(&input);
            metrics_accumulator.record_tick(&report);
            totals.record_tick(&report);

            match scene.update(&report, state) {
                SceneCommand::None => {}
                SceneCommand::Regenerate { width, height } => {
                    match state.regenerate(width, height) {
                        Ok(()) => totals.regenerations += 1,
                        Err(error) => {
                            totals.failed_regenerations += 1;
                            warn!(
                                tick = report.tick,
                                width,
                                height,
                                error = %error,
                                "world_regenerate_failed"
                            );
                        }
                    }
                }
                SceneCommand::Quit => {
                    info!(
                        tick = report.tick,
                        reason = "scene_quit",
                        "shutdown_requested"
                    );
                    break 'frames;
                }
            }
        }

        let frame = state.frame_snapshot();
        scene.render(&frame, state.world());
        metrics_accumulator.record_frame(raw_frame_dt);
        totals.frames += 1;

        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(Instant::now()) {
            metrics_handle.publish(snapshot);
            info!(
                tps = snapshot.tps,
                fps = snapshot.fps,
                frame_time_ms = snapshot.frame_time_ms,
                moving_ticks = snapshot.moving_ticks,
                blocked_ticks = snapshot.blocked_ticks,
                "loop_metrics"
            );
        }

        if config.pacing == Pacing::Realtime {
            let wait = clock.time_until_next_tick();
            if wait > Duration::ZERO {
                thread::sleep(wait);
            }
        }
    }

    metrics_handle.publish(metrics_accumulator.take_snapshot(Instant::now()));
    scene.unload(state);

    let world = state.world();
    let summary = RunSummary {
        ticks: state.tick_count(),
        frames: totals.frames,
        moving_ticks: totals.moving_ticks,
        blocked_ticks: totals.blocked_ticks,
        regenerations: totals.regenerations,
        failed_regenerations: totals.failed_regenerations,
        seed: state.generator().seed().map(|seed| seed.0),
        world_width: world.width_tiles(),
        world_height: world.height_tiles(),
        object_count: world.objects().len(),
        fingerprint: world.fingerprint(),
        player: *state.player(),
        camera: state.camera().offset,
    };
    info!(
        ticks = summary.ticks,
        frames = summary.frames,
        moving_ticks = summary.moving_ticks,
        blocked_ticks = summary.blocked_ticks,
        regenerations = summary.regenerations,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "run_complete"
    );
    summary
}

/// Accumulator-driven fixed timestep. Frame deltas are clamped and the number of
/// ticks per frame is capped; any backlog beyond the cap is dropped.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    accumulator: Duration,
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
}

impl FixedStepClock {
    pub fn new(config: &LoopConfig) -> Self {
        let target_tps = config.target_tps.max(1);
        Self {
            accumulator: Duration::ZERO,
            fixed_dt: Duration::from_secs_f64(1.0 / target_tps as f64),
            max_frame_delta: normalize_non_zero_duration(
                config.max_frame_delta,
                Duration::from_millis(250),
            ),
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
        }
    }

    pub fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    fn target_tps(&self) -> u32 {
        (1.0 / self.fixed_dt.as_secs_f64()).round() as u32
    }

    pub fn advance(&mut self, raw_frame_dt: Duration) -> StepPlan {
        let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, self.max_frame_delta);
        let accumulator = self.accumulator.saturating_add(clamped_frame_dt);
        let plan = plan_sim_steps(accumulator, self.fixed_dt, self.max_ticks_per_frame);
        self.accumulator = plan.remaining_accumulator;

        if plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "sim_clamp_triggered"
            );
        }
        plan
    }

    pub fn time_until_next_tick(&self) -> Duration {
        self.fixed_dt.saturating_sub(self.accumulator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    pub remaining_accumulator: Duration,
    pub dropped_backlog: Duration,
}

pub fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

pub fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
