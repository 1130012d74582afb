mod input;
mod loop_runner;
mod metrics;
pub mod rendering;
mod scene;

pub use input::{HeldKeys, InputAction, InputSnapshot, InputSource};
pub use loop_runner::{
    clamp_frame_delta, plan_sim_steps, run_app, run_app_with_metrics, FixedStepClock, LoopConfig,
    Pacing, RunSummary, StepPlan,
};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{
    tile_sprite_visible, visible_tile_range, world_to_screen_px, FrameSnapshot, TileRange, Viewport,
};
pub use scene::{spawn_position, Camera2D, Scene, SceneCommand, SimulationState, TickReport, Vec2};
