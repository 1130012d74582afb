use std::path::PathBuf;

use engine::{resolve_world_seed, LoopConfig, SimulationState, WorldGenerator};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_config, ExplorerConfig};
use super::scene::ExplorerScene;
use super::ExplorerError;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) state: SimulationState,
    pub(crate) scene: ExplorerScene,
    pub(crate) summary_path: Option<PathBuf>,
}

pub(crate) fn build_app() -> Result<AppWiring, ExplorerError> {
    info!("=== Tileworld Explorer Startup ===");
    let config = load_config()?;
    wire(config)
}

pub(crate) fn wire(config: ExplorerConfig) -> Result<AppWiring, ExplorerError> {
    let seed = resolve_world_seed(config.seed);
    let state = SimulationState::new(
        WorldGenerator::from_seed(seed),
        config.world_width,
        config.world_height,
        config.camera,
        config.movement,
    )?;

    let loop_config = LoopConfig {
        target_tps: config.target_tps,
        pacing: config.pacing,
        max_ticks: config.effective_max_ticks(),
        ..LoopConfig::default()
    };
    let summary_path = config.summary_path.clone();

    Ok(AppWiring {
        config: loop_config,
        state,
        scene: ExplorerScene::from_config(&config),
        summary_path,
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
