use serde::Serialize;

use crate::app::Vec2;
use crate::sim::PlayerState;
use crate::world::{ObjectId, World};

use super::transform::{tile_sprite_visible, visible_tile_range, TileRange, Viewport};

/// Read-only view of one frame. Renderers pair it with `&World` for tile and object lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub player: PlayerState,
    pub camera: Vec2,
    pub viewport: Viewport,
    pub visible_tiles: TileRange,
    pub visible_objects: Vec<ObjectId>,
}

impl FrameSnapshot {
    pub fn capture(
        tick: u64,
        world: &World,
        player: PlayerState,
        camera: Vec2,
        viewport: Viewport,
    ) -> Self {
        let visible_tiles =
            visible_tile_range(camera, viewport, world.width_tiles(), world.height_tiles());
        let visible_objects = world
            .objects()
            .iter()
            .filter(|object| tile_sprite_visible(object.position, camera, viewport))
            .map(|object| object.id)
            .collect();
        Self {
            tick,
            player,
            camera,
            viewport,
            visible_tiles,
            visible_objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ObjectKind, TerrainGrid, TerrainKind, WorldObject};

    #[test]
    fn capture_culls_objects_outside_viewport() {
        let objects = vec![
            WorldObject::new(
                ObjectId(0),
                ObjectKind::Tree,
                Vec2 { x: 64.0, y: 64.0 },
                true,
            ),
            WorldObject::new(
                ObjectId(1),
                ObjectKind::Rock,
                Vec2 { x: 1600.0, y: 64.0 },
                true,
            ),
            WorldObject::new(
                ObjectId(2),
                ObjectKind::Bush,
                Vec2 { x: 832.0, y: 576.0 },
                false,
            ),
        ];
        let world = World::new(
            TerrainGrid::filled(40, 40, TerrainKind::Grass).expect("grid"),
            objects,
        )
        .expect("world");

        let frame = FrameSnapshot::capture(
            3,
            &world,
            PlayerState::default(),
            Vec2 { x: 32.0, y: 0.0 },
            Viewport::default(),
        );
        assert_eq!(frame.visible_objects, vec![ObjectId(0), ObjectId(2)]);
        assert_eq!(frame.visible_tiles.start_x, 0);
        assert_eq!(frame.visible_tiles.end_x, 14);
    }

    #[test]
    fn snapshot_serializes_for_headless_hosts() {
        let world = World::new(
            TerrainGrid::filled(2, 2, TerrainKind::Grass).expect("grid"),
            Vec::new(),
        )
        .expect("world");
        let frame = FrameSnapshot::capture(
            0,
            &world,
            PlayerState::default(),
            Vec2::default(),
            Viewport::default(),
        );
        let value = serde_json::to_value(&frame).expect("to_value");
        assert_eq!(value["player"]["facing"], "down");
        assert_eq!(value["visible_tiles"]["end_x"], 2);
        assert_eq!(value["viewport"]["width"], 800);
    }
}
