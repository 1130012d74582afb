use std::env;

use tracing::{info, warn};

pub mod app;
pub mod sim;
pub mod world;

pub use app::{
    run_app, run_app_with_metrics, spawn_position, world_to_screen_px, Camera2D, FixedStepClock,
    FrameSnapshot, HeldKeys, InputAction, InputSnapshot, InputSource, LoopConfig,
    LoopMetricsSnapshot, MetricsHandle, Pacing, RunSummary, Scene, SceneCommand, SimulationState,
    TickReport, TileRange, Vec2, Viewport,
};
pub use sim::{
    step_player, update_camera, AnimationState, CameraConfig, CollisionQuery, Facing,
    MoveResolution, MovementConfig, PlayerState, PlayerStep,
};
pub use world::{
    NoiseChannel, NoiseChannels, NoiseField, ObjectId, ObjectKind, SimplexField, TerrainGrid,
    TerrainKind, World, WorldError, WorldGenerator, WorldObject, WorldSeed,
    DEFAULT_WORLD_HEIGHT_TILES, DEFAULT_WORLD_WIDTH_TILES, TILE_SIZE_PX,
};

pub const WORLD_SEED_ENV_VAR: &str = "TILEWORLD_SEED";

/// Seed precedence: `TILEWORLD_SEED`, then `configured`, then a random seed.
/// An unreadable or unparsable env value is logged and skipped.
pub fn resolve_world_seed(configured: Option<u64>) -> WorldSeed {
    let from_env = match env::var(WORLD_SEED_ENV_VAR) {
        Ok(value) => match parse_seed(&value) {
            Some(seed) => Some(seed),
            None => {
                warn!(
                    env_var = WORLD_SEED_ENV_VAR,
                    value = value.as_str(),
                    "invalid world seed env var value; falling back"
                );
                None
            }
        },
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(
                env_var = WORLD_SEED_ENV_VAR,
                error = %err,
                "unable to read world seed env var; falling back"
            );
            None
        }
    };

    let (seed, source) = match (from_env, configured) {
        (Some(seed), _) => (WorldSeed(seed), "env"),
        (None, Some(seed)) => (WorldSeed(seed), "config"),
        (None, None) => (WorldSeed::random(), "random"),
    };
    info!(seed = seed.0, source, "world_seed_resolved");
    seed
}

/// Decimal, or hex with a `0x` prefix.
pub fn parse_seed(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => trimmed.parse::<u64>().ok(),
    }
}
