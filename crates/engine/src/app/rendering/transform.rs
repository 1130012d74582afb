use serde::{Deserialize, Serialize};

use crate::app::Vec2;
use crate::world::TILE_SIZE_PX;

pub const DEFAULT_VIEWPORT_WIDTH: u32 = 800;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn size(self) -> Vec2 {
        Vec2 {
            x: self.width as f32,
            y: self.height as f32,
        }
    }
}

/// Half-open tile rectangle `[start, end)` on each axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

impl TileRange {
    pub fn contains(&self, tile_x: u32, tile_y: u32) -> bool {
        tile_x >= self.start_x
            && tile_x < self.end_x
            && tile_y >= self.start_y
            && tile_y < self.end_y
    }

    pub fn tile_count(&self) -> u32 {
        self.end_x.saturating_sub(self.start_x) * self.end_y.saturating_sub(self.start_y)
    }
}

pub fn world_to_screen_px(world: Vec2, camera_offset: Vec2) -> (i32, i32) {
    let x = world.x - camera_offset.x;
    let y = world.y - camera_offset.y;
    (x.round() as i32, y.round() as i32)
}

/// Tiles touched by the viewport, plus one spare column and row, clipped to the grid.
pub fn visible_tile_range(
    camera_offset: Vec2,
    viewport: Viewport,
    grid_width: u32,
    grid_height: u32,
) -> TileRange {
    let (start_x, end_x) = visible_axis(camera_offset.x, viewport.width, grid_width);
    let (start_y, end_y) = visible_axis(camera_offset.y, viewport.height, grid_height);
    TileRange {
        start_x,
        start_y,
        end_x,
        end_y,
    }
}

fn visible_axis(offset: f32, viewport_extent: u32, grid_extent: u32) -> (u32, u32) {
    let start = (offset / TILE_SIZE_PX).floor().max(0.0) as u32;
    let span = (viewport_extent as f32 / TILE_SIZE_PX).ceil() as u32 + 1;
    let end = start.saturating_add(span).min(grid_extent);
    (start.min(end), end)
}

/// Whether a tile-sized sprite at `world` overlaps the viewport at all.
pub fn tile_sprite_visible(world: Vec2, camera_offset: Vec2, viewport: Viewport) -> bool {
    let screen = Vec2 {
        x: world.x - camera_offset.x,
        y: world.y - camera_offset.y,
    };
    let size = viewport.size();
    !(screen.x + TILE_SIZE_PX < 0.0
        || screen.x > size.x
        || screen.y + TILE_SIZE_PX < 0.0
        || screen.y > size.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_offset_shifts_screen_position() {
        let (x, y) = world_to_screen_px(Vec2 { x: 500.0, y: 420.4 }, Vec2 { x: 100.0, y: 20.0 });
        assert_eq!((x, y), (400, 400));
    }

    #[test]
    fn viewport_size_is_its_pixel_extent() {
        assert_eq!(Viewport::default().size(), Vec2 { x: 800.0, y: 600.0 });
    }

    #[test]
    fn visible_range_at_origin_covers_viewport_plus_one() {
        let range = visible_tile_range(Vec2::default(), Viewport::default(), 150, 150);
        // 800/64 = 12.5 -> 13 + 1; 600/64 = 9.375 -> 10 + 1.
        assert_eq!(
            range,
            TileRange {
                start_x: 0,
                start_y: 0,
                end_x: 14,
                end_y: 11,
            }
        );
        assert_eq!(range.tile_count(), 154);
    }

    #[test]
    fn visible_range_is_clipped_at_far_edge() {
        let range = visible_tile_range(
            Vec2 {
                x: 8800.0,
                y: 9000.0,
            },
            Viewport::default(),
            150,
            150,
        );
        assert_eq!(range.start_x, 137);
        assert_eq!(range.start_y, 140);
        assert_eq!(range.end_x, 150);
        assert_eq!(range.end_y, 150);
        assert!(range.contains(149, 149));
        assert!(!range.contains(150, 149));
    }

    #[test]
    fn visible_range_handles_tiny_grids() {
        let range = visible_tile_range(Vec2::default(), Viewport::default(), 1, 7);
        assert_eq!((range.end_x, range.end_y), (1, 7));
    }

    #[test]
    fn sprite_visibility_includes_partial_overlap() {
        let viewport = Viewport::default();
        let camera = Vec2 { x: 100.0, y: 100.0 };
        let visible = |x, y| tile_sprite_visible(Vec2 { x, y }, camera, viewport);
        assert!(visible(40.0, 100.0));
        assert!(!visible(35.0, 100.0));
        assert!(visible(900.0, 700.0));
        assert!(!visible(901.0, 100.0));
    }
}
