use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::sim::{
    step_player, update_camera, CameraConfig, MoveResolution, MovementConfig, PlayerState,
};
use crate::world::{
    NoiseField, ObjectId, ObjectKind, SimplexField, World, WorldError, WorldGenerator,
    WorldObject, WorldSeed,
};

use super::input::InputSnapshot;
use super::rendering::{FrameSnapshot, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    None,
    Regenerate { width: u32, height: u32 },
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Top-left of the visible region, in world pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera2D {
    pub offset: Vec2,
}

impl Camera2D {
    pub fn follow(&mut self, player_position: Vec2, viewport: Viewport, world_pixel_size: Vec2) {
        self.offset = update_camera(player_position, viewport, world_pixel_size);
    }
}

/// Outcome of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub player: PlayerState,
    pub camera: Vec2,
    pub resolution: MoveResolution,
}

/// Viewport centre plus half a player, clamped into the world.
pub fn spawn_position(viewport: Viewport, world_pixel_size: Vec2, player_size_px: f32) -> Vec2 {
    let size = viewport.size();
    let centre = Vec2 {
        x: size.x / 2.0 + player_size_px / 2.0,
        y: size.y / 2.0 + player_size_px / 2.0,
    };
    clamp_into_world(centre, world_pixel_size, player_size_px)
}

fn clamp_into_world(position: Vec2, world_pixel_size: Vec2, player_size_px: f32) -> Vec2 {
    Vec2 {
        x: position.x.min(world_pixel_size.x - player_size_px).max(0.0),
        y: position.y.min(world_pixel_size.y - player_size_px).max(0.0),
    }
}

/// Everything one explorer session owns: the generated world, the player and the camera.
/// Only [`SimulationState::tick`] moves the player or the camera during play.
#[derive(Debug, Clone)]
pub struct SimulationState<N = SimplexField> {
    generator: WorldGenerator<N>,
    world: World,
    player: PlayerState,
    camera: Camera2D,
    camera_config: CameraConfig,
    movement: MovementConfig,
    tick: u64,
}

impl<N: NoiseField> SimulationState<N> {
    pub fn new(
        generator: WorldGenerator<N>,
        width: u32,
        height: u32,
        camera_config: CameraConfig,
        movement: MovementConfig,
    ) -> Result<Self, WorldError> {
        let world = generator.generate(width, height)?;
        Ok(Self::from_world(generator, world, camera_config, movement))
    }

    pub fn from_world(
        generator: WorldGenerator<N>,
        world: World,
        camera_config: CameraConfig,
        movement: MovementConfig,
    ) -> Self {
        let spawn = spawn_position(
            camera_config.viewport,
            world.pixel_size(),
            movement.player_size_px,
        );
        let mut state = Self {
            generator,
            world,
            player: PlayerState::at(spawn),
            camera: Camera2D::default(),
            camera_config,
            movement,
            tick: 0,
        };
        state.refresh_camera();
        state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn camera(&self) -> Camera2D {
        self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.camera_config.viewport
    }

    pub fn movement(&self) -> &MovementConfig {
        &self.movement
    }

    pub fn generator(&self) -> &WorldGenerator<N> {
        &self.generator
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Movement, then camera follow.
    pub fn tick(&mut self, input: &InputSnapshot) -> TickReport {
        let step = step_player(&self.player, input, &self.world, &self.movement);
        self.player = step.player;
        self.refresh_camera();
        self.tick += 1;

        trace!(
            tick = self.tick,
            x = self.player.position.x,
            y = self.player.position.y,
            facing = ?self.player.facing,
            resolution = ?step.resolution,
            "tick"
        );

        TickReport {
            tick: self.tick,
            player: self.player,
            camera: self.camera.offset,
            resolution: step.resolution,
        }
    }

    /// Builds a fresh world with the current generator, then swaps it in.
    /// On error the previous world, player and camera are untouched.
    pub fn regenerate(&mut self, width: u32, height: u32) -> Result<(), WorldError> {
        let world = self.generator.generate(width, height)?;
        self.install_world(world);
        Ok(())
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.camera_config.viewport = viewport;
        self.refresh_camera();
    }

    /// Moves the player without collision checks; the position is clamped into the world.
    pub fn place_player(&mut self, position: Vec2) {
        self.player.position = clamp_into_world(
            position,
            self.world.pixel_size(),
            self.movement.player_size_px,
        );
        self.refresh_camera();
    }

    pub fn add_object(&mut self, object: WorldObject) -> Result<(), WorldError> {
        self.world.add_object(object)
    }

    pub fn allocate_object_id(&mut self) -> ObjectId {
        self.world.allocate_object_id()
    }

    pub fn spawn_object(
        &mut self,
        kind: ObjectKind,
        position: Vec2,
        solid: bool,
    ) -> Result<ObjectId, WorldError> {
        self.world.spawn_object(kind, position, solid)
    }

    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        self.world.remove_object(id)
    }

    pub fn frame_snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(
            self.tick,
            &self.world,
            self.player,
            self.camera.offset,
            self.camera_config.viewport,
        )
    }

    fn install_world(&mut self, world: World) {
        self.world = world;
        self.player.position = clamp_into_world(
            self.player.position,
            self.world.pixel_size(),
            self.movement.player_size_px,
        );
        self.refresh_camera();
        info!(
            width = self.world.width_tiles(),
            height = self.world.height_tiles(),
            object_count = self.world.objects().len(),
            player_x = self.player.position.x,
            player_y = self.player.position.y,
            fingerprint = %self.world.fingerprint(),
            "world_regenerated"
        );
    }

    fn refresh_camera(&mut self) {
        self.camera.follow(
            self.player.position,
            self.camera_config.viewport,
            self.world.pixel_size(),
        );
    }
}

impl SimulationState<SimplexField> {
    /// Replaces the generator with one built from `seed`, then regenerates.
    pub fn regenerate_with_seed(
        &mut self,
        seed: WorldSeed,
        width: u32,
        height: u32,
    ) -> Result<(), WorldError> {
        let generator = WorldGenerator::from_seed(seed);
        let world = generator.generate(width, height)?;
        self.generator = generator;
        self.install_world(world);
        Ok(())
    }
}

/// Host-side driver for one session. The loop asks for input once per tick,
/// applies it, then hands the report back so the scene can edit the world.
pub trait Scene {
    fn load(&mut self, state: &mut SimulationState);
    fn sample_input(&mut self, tick: u64) -> InputSnapshot;
    fn update(&mut self, report: &TickReport, state: &mut SimulationState) -> SceneCommand;
    fn render(&mut self, _frame: &FrameSnapshot, _world: &World) {}
    fn unload(&mut self, state: &mut SimulationState);
}
