use tracing::info;

use crate::app::Vec2;

use super::noise_field::{NoiseChannels, NoiseField, SimplexField, WorldSeed};
use super::objects::{ObjectId, ObjectKind, WorldObject};
use super::terrain::{TerrainGrid, TerrainKind};
use super::{World, WorldError, TILE_SIZE_PX};

pub const ELEVATION_SCALE: f64 = 0.05;
pub const MOISTURE_SCALE: f64 = 0.1;
// River noise is stretched vertically so rivers come out as long thin bands.
pub const RIVER_SCALE_X: f64 = 0.15;
pub const RIVER_SCALE_Y: f64 = 0.02;
pub const OBJECT_SCALE: f64 = 0.2;

const RIVER_BAND_MIN: f64 = 0.35;
const RIVER_BAND_MAX: f64 = 0.45;
const LAKE_ELEVATION_MAX: f64 = -0.25;
const MOUNTAIN_ELEVATION_MIN: f64 = 0.5;
const DRY_LOWLAND_ELEVATION_MAX: f64 = 0.1;
const DRY_LOWLAND_MOISTURE_MAX: f64 = 0.0;
const TREE_BAND_MIN: f64 = 0.6;
const TREE_BAND_MAX: f64 = 0.65;
const SMOOTHING_MAX_SAME_NEIGHBORS: usize = 2;

/// First matching rule wins; the order is part of the contract.
pub fn classify_cell(elevation: f64, moisture: f64, river: f64) -> TerrainKind {
    if river > RIVER_BAND_MIN && river < RIVER_BAND_MAX {
        TerrainKind::Water
    } else if elevation < LAKE_ELEVATION_MAX {
        TerrainKind::Water
    } else if elevation > MOUNTAIN_ELEVATION_MIN {
        TerrainKind::Stone
    } else if elevation < DRY_LOWLAND_ELEVATION_MAX && moisture < DRY_LOWLAND_MOISTURE_MAX {
        TerrainKind::Dirt
    } else {
        TerrainKind::Grass
    }
}

/// Single smoothing pass over interior cells. Neighbor counts always come from
/// `grid`, never from cells already rewritten in this pass. Water is kept.
pub fn smooth_isolated_cells(grid: &TerrainGrid) -> TerrainGrid {
    let mut smoothed = grid.clone();
    let width = grid.width();
    let height = grid.height();
    if width < 3 || height < 3 {
        return smoothed;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let Some(current) = grid.kind_at(x, y) else {
                continue;
            };
            if current == TerrainKind::Water {
                continue;
            }
            let same_neighbors = count_same_neighbors(grid, x, y, current);
            if same_neighbors <= SMOOTHING_MAX_SAME_NEIGHBORS {
                smoothed.set(x, y, TerrainKind::Grass);
            }
        }
    }
    smoothed
}

fn count_same_neighbors(grid: &TerrainGrid, x: u32, y: u32, kind: TerrainKind) -> usize {
    let mut count = 0;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if grid.kind_at_signed(x as i64 + dx, y as i64 + dy) == Some(kind) {
                count += 1;
            }
        }
    }
    count
}

/// Places a solid tree on every grass cell whose object-density sample lands in
/// the narrow tree band. Ids are sequential in row-major order.
pub fn scatter_objects<N: NoiseField>(grid: &TerrainGrid, density: &N) -> Vec<WorldObject> {
    let mut objects = Vec::new();
    let mut next_id = 0u64;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.kind_at(x, y) != Some(TerrainKind::Grass) {
                continue;
            }
            let chance = density.sample(x as f64 * OBJECT_SCALE, y as f64 * OBJECT_SCALE);
            if chance > TREE_BAND_MIN && chance < TREE_BAND_MAX {
                objects.push(WorldObject::new(
                    ObjectId(next_id),
                    ObjectKind::Tree,
                    Vec2 {
                        x: x as f32 * TILE_SIZE_PX,
                        y: y as f32 * TILE_SIZE_PX,
                    },
                    true,
                ));
                next_id += 1;
            }
        }
    }
    objects
}

#[derive(Debug, Clone)]
pub struct WorldGenerator<N = SimplexField> {
    channels: NoiseChannels<N>,
    seed: Option<WorldSeed>,
}

impl WorldGenerator<SimplexField> {
    pub fn from_seed(seed: WorldSeed) -> Self {
        Self {
            channels: NoiseChannels::from_seed(seed),
            seed: Some(seed),
        }
    }
}

impl<N: NoiseField> WorldGenerator<N> {
    pub fn with_channels(channels: NoiseChannels<N>) -> Self {
        Self {
            channels,
            seed: None,
        }
    }

    pub fn seed(&self) -> Option<WorldSeed> {
        self.seed
    }

    pub fn channels(&self) -> &NoiseChannels<N> {
        &self.channels
    }

    pub fn generate(&self, width: u32, height: u32) -> Result<World, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimension { width, height });
        }

        let classified = self.classify(width, height)?;
        let terrain = smooth_isolated_cells(&classified);
        let objects = scatter_objects(&terrain, &self.channels.objects);
        let world = World::new(terrain, objects)?;

        info!(
            width,
            height,
            seed = ?self.seed.map(|seed| seed.0),
            object_count = world.objects().len(),
            water_cells = world.terrain().count_of(TerrainKind::Water),
            stone_cells = world.terrain().count_of(TerrainKind::Stone),
            fingerprint = %world.fingerprint(),
            "world_generated"
        );
        Ok(world)
    }

    fn classify(&self, width: u32, height: u32) -> Result<TerrainGrid, WorldError> {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let (fx, fy) = (x as f64, y as f64);
                let elevation = self
                    .channels
                    .elevation
                    .sample(fx * ELEVATION_SCALE, fy * ELEVATION_SCALE);
                let moisture = self
                    .channels
                    .moisture
                    .sample(fx * MOISTURE_SCALE, fy * MOISTURE_SCALE);
                let river = self
                    .channels
                    .river
                    .sample(fx * RIVER_SCALE_X, fy * RIVER_SCALE_Y);
                cells.push(classify_cell(elevation, moisture, river));
            }
        }
        TerrainGrid::new(width, height, cells)
    }
}
