use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use engine::{
    CameraConfig, MovementConfig, ObjectKind, Pacing, Vec2, DEFAULT_WORLD_HEIGHT_TILES,
    DEFAULT_WORLD_WIDTH_TILES,
};
use serde::Deserialize;
use tracing::info;

use super::script::ScriptStep;
use super::ExplorerError;

pub(crate) const CONFIG_ENV_VAR: &str = "TILEWORLD_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ExplorerConfig {
    pub(crate) world_width: u32,
    pub(crate) world_height: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) camera: CameraConfig,
    pub(crate) movement: MovementConfig,
    /// Overrides the default viewport-centred spawn.
    pub(crate) spawn: Option<Vec2>,
    pub(crate) pacing: Pacing,
    pub(crate) target_tps: u32,
    pub(crate) max_ticks: Option<u64>,
    pub(crate) script: Vec<ScriptStep>,
    pub(crate) objects: Vec<ObjectPlacement>,
    pub(crate) removals: Vec<ObjectRemoval>,
    pub(crate) regenerations: Vec<RegenerationStep>,
    pub(crate) summary_path: Option<PathBuf>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            world_width: DEFAULT_WORLD_WIDTH_TILES,
            world_height: DEFAULT_WORLD_HEIGHT_TILES,
            seed: None,
            camera: CameraConfig::default(),
            movement: MovementConfig::default(),
            spawn: None,
            pacing: Pacing::Realtime,
            target_tps: 60,
            max_ticks: None,
            script: Vec::new(),
            objects: Vec::new(),
            removals: Vec::new(),
            regenerations: Vec::new(),
            summary_path: None,
        }
    }
}

/// Object added after tick `at_tick` completes; tick 0 means before the first tick.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ObjectPlacement {
    #[serde(default)]
    pub(crate) at_tick: u64,
    /// Explicit id; omitted ids are allocated.
    #[serde(default)]
    pub(crate) id: Option<u64>,
    pub(crate) kind: ObjectKind,
    pub(crate) tile_x: u32,
    pub(crate) tile_y: u32,
    #[serde(default)]
    pub(crate) solid: Option<bool>,
    #[serde(default)]
    pub(crate) growth_stage: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ObjectRemoval {
    #[serde(default)]
    pub(crate) at_tick: u64,
    pub(crate) id: u64,
}

/// Regeneration runs after the same tick's object edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RegenerationStep {
    pub(crate) at_tick: u64,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl ExplorerConfig {
    /// Explicit `max_ticks`, else the script length, else unbounded.
    pub(crate) fn effective_max_ticks(&self) -> Option<u64> {
        self.max_ticks.or_else(|| {
            let total: u64 = self.script.iter().map(|step| step.ticks).sum();
            (total > 0).then_some(total)
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ExplorerError> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(invalid(
                "world_width",
                format!(
                    "world must be at least 1x1, got {}x{}",
                    self.world_width, self.world_height
                ),
            ));
        }
        if self.camera.viewport.width == 0 || self.camera.viewport.height == 0 {
            return Err(invalid("camera.viewport", "viewport must be non-empty"));
        }
        if !(self.movement.speed_px_per_tick.is_finite()
            && self.movement.sprint_speed_px_per_tick.is_finite()
            && self.movement.player_size_px > 0.0)
        {
            return Err(invalid(
                "movement",
                "speeds must be finite and player size positive",
            ));
        }
        if self.pacing == Pacing::Unpaced && self.effective_max_ticks().is_none() {
            return Err(invalid(
                "max_ticks",
                "unpaced runs need max_ticks or a non-empty script",
            ));
        }

        let mut regeneration_ticks = BTreeSet::new();
        for (index, step) in self.regenerations.iter().enumerate() {
            if step.at_tick == 0 {
                return Err(invalid(
                    &format!("regenerations[{index}].at_tick"),
                    "regeneration must happen after at least one tick",
                ));
            }
            if !regeneration_ticks.insert(step.at_tick) {
                return Err(invalid(
                    &format!("regenerations[{index}].at_tick"),
                    format!("duplicate regeneration at tick {}", step.at_tick),
                ));
            }
        }
        Ok(())
    }
}

impl ObjectPlacement {
    pub(crate) fn solid(&self) -> bool {
        self.solid.unwrap_or_else(|| self.kind.solid_by_default())
    }
}

fn invalid(path: &str, message: impl Into<String>) -> ExplorerError {
    ExplorerError::InvalidConfig {
        path: path.to_string(),
        message: message.into(),
    }
}

/// Reads the file named by `TILEWORLD_CONFIG`, or returns defaults when it is unset.
pub(crate) fn load_config() -> Result<ExplorerConfig, ExplorerError> {
    match env::var(CONFIG_ENV_VAR) {
        Ok(value) => load_config_from_path(Path::new(&value)),
        Err(env::VarError::NotPresent) => {
            info!(env_var = CONFIG_ENV_VAR, "config_defaults");
            Ok(ExplorerConfig::default())
        }
        Err(source) => Err(ExplorerError::EnvVar {
            var: CONFIG_ENV_VAR,
            source,
        }),
    }
}

pub(crate) fn load_config_from_path(path: &Path) -> Result<ExplorerConfig, ExplorerError> {
    let raw = fs::read_to_string(path).map_err(|source| ExplorerError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_json(&raw)?;
    config.validate()?;
    info!(
        path = %path.display(),
        world_width = config.world_width,
        world_height = config.world_height,
        pacing = ?config.pacing,
        script_steps = config.script.len(),
        "config_loaded"
    );
    Ok(config)
}

pub(crate) fn parse_config_json(raw: &str) -> Result<ExplorerConfig, ExplorerError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, ExplorerConfig>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let location = if path.is_empty() || path == "." {
            String::new()
        } else {
            format!(" at {path}")
        };
        ExplorerError::ParseConfig {
            location,
            source: error.into_inner(),
        }
    })
}
