mod generator;
mod hashing;
mod noise_field;
mod objects;
mod terrain;

use thiserror::Error;
use tracing::{debug, warn};

use crate::app::Vec2;

pub use generator::{
    classify_cell, scatter_objects, smooth_isolated_cells, WorldGenerator, ELEVATION_SCALE,
    MOISTURE_SCALE, OBJECT_SCALE, RIVER_SCALE_X, RIVER_SCALE_Y,
};
pub use noise_field::{NoiseChannel, NoiseChannels, NoiseField, SimplexField, WorldSeed};
pub use objects::{ObjectId, ObjectIdAllocator, ObjectKind, WorldObject};
pub use terrain::{TerrainGrid, TerrainKind};

pub const TILE_SIZE_PX: f32 = 64.0;
pub const DEFAULT_WORLD_WIDTH_TILES: u32 = 150;
pub const DEFAULT_WORLD_HEIGHT_TILES: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WorldError {
    #[error("world dimensions must be at least 1x1, got {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },
    #[error("terrain cell count mismatch: expected {expected}, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
    #[error("object id {0} already exists")]
    DuplicateObjectId(ObjectId),
    #[error("object {id} at ({x}, {y}) lies outside the world")]
    ObjectOutOfBounds { id: ObjectId, x: f32, y: f32 },
}

/// Terrain grid plus placed objects. Terrain never changes after construction;
/// objects change only through [`World::add_object`] and [`World::remove_object`].
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    terrain: TerrainGrid,
    objects: Vec<WorldObject>,
    allocator: ObjectIdAllocator,
}

impl World {
    pub fn new(terrain: TerrainGrid, objects: Vec<WorldObject>) -> Result<Self, WorldError> {
        let mut world = Self {
            terrain,
            objects: Vec::with_capacity(objects.len()),
            allocator: ObjectIdAllocator::default(),
        };
        for object in objects {
            world.insert_checked(object)?;
        }
        Ok(world)
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    pub fn width_tiles(&self) -> u32 {
        self.terrain.width()
    }

    pub fn height_tiles(&self) -> u32 {
        self.terrain.height()
    }

    pub fn pixel_width(&self) -> f32 {
        self.terrain.width() as f32 * TILE_SIZE_PX
    }

    pub fn pixel_height(&self) -> f32 {
        self.terrain.height() as f32 * TILE_SIZE_PX
    }

    pub fn pixel_size(&self) -> Vec2 {
        Vec2 {
            x: self.pixel_width(),
            y: self.pixel_height(),
        }
    }

    /// Terrain under a world-pixel point; `None` off the map.
    pub fn terrain_at_px(&self, x: f32, y: f32) -> Option<TerrainKind> {
        let tile_x = (x / TILE_SIZE_PX).floor() as i64;
        let tile_y = (y / TILE_SIZE_PX).floor() as i64;
        self.terrain.kind_at_signed(tile_x, tile_y)
    }

    pub fn contains_px(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.y >= 0.0
            && position.x < self.pixel_width()
            && position.y < self.pixel_height()
    }

    pub fn find_object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn solid_objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter().filter(|object| object.solid)
    }

    pub fn add_object(&mut self, object: WorldObject) -> Result<(), WorldError> {
        let id = object.id;
        match self.insert_checked(object) {
            Ok(()) => {
                debug!(
                    object_id = %id,
                    object_count = self.objects.len(),
                    "object_added"
                );
                Ok(())
            }
            Err(error) => {
                warn!(object_id = %id, error = %error, "object_add_rejected");
                Err(error)
            }
        }
    }

    /// Reserves an id no current or earlier object has used.
    pub fn allocate_object_id(&mut self) -> ObjectId {
        let mut id = self.allocator.allocate();
        while self.find_object(id).is_some() {
            id = self.allocator.allocate();
        }
        id
    }

    /// Allocates a fresh id and places a new object.
    pub fn spawn_object(
        &mut self,
        kind: ObjectKind,
        position: Vec2,
        solid: bool,
    ) -> Result<ObjectId, WorldError> {
        let id = self.allocate_object_id();
        self.add_object(WorldObject::new(id, kind, position, solid))?;
        Ok(id)
    }

    /// Removing an unknown id is a no-op; returns whether anything was removed.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|object| object.id != id);
        let removed = self.objects.len() != before;
        if removed {
            debug!(
                object_id = %id,
                object_count = self.objects.len(),
                "object_removed"
            );
        }
        removed
    }

    /// SHA-256 over terrain and objects, lowercase hex.
    pub fn fingerprint(&self) -> String {
        hashing::world_fingerprint(&self.terrain, &self.objects)
    }

    fn insert_checked(&mut self, object: WorldObject) -> Result<(), WorldError> {
        if self.find_object(object.id).is_some() {
            return Err(WorldError::DuplicateObjectId(object.id));
        }
        if !self.contains_px(object.position) {
            return Err(WorldError::ObjectOutOfBounds {
                id: object.id,
                x: object.position.x,
                y: object.position.y,
            });
        }
        self.allocator.observe(object.id);
        self.objects.push(object);
        Ok(())
    }
}
