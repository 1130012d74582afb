use serde::{Deserialize, Serialize};

use crate::app::rendering::Viewport;
use crate::app::Vec2;
use crate::world::TILE_SIZE_PX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub viewport: Viewport,
}

/// Offset that centers the player, clamped so the view never leaves the world.
/// When the world is smaller than the viewport on an axis, that axis pins to 0.
pub fn update_camera(player_position: Vec2, viewport: Viewport, world_pixel_size: Vec2) -> Vec2 {
    let view = viewport.size();
    let target_x = player_position.x - view.x / 2.0 + TILE_SIZE_PX / 2.0;
    let target_y = player_position.y - view.y / 2.0 + TILE_SIZE_PX / 2.0;
    Vec2 {
        x: clamp_axis(target_x, world_pixel_size.x - view.x),
        y: clamp_axis(target_y, world_pixel_size.y - view.y),
    }
}

/// `max(0, min(value, max))`; an inverted range collapses to 0.
pub(crate) fn clamp_axis(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 800,
        height: 600,
    };
    const WORLD: Vec2 = Vec2 {
        x: 9600.0,
        y: 9600.0,
    };

    #[test]
    fn centers_on_player_in_the_middle_of_the_world() {
        let camera = update_camera(Vec2 { x: 5000.0, y: 5000.0 }, VIEWPORT, WORLD);
        assert_eq!(camera, Vec2 { x: 4632.0, y: 4732.0 });
    }

    #[test]
    fn clamps_at_both_world_edges() {
        assert_eq!(
            update_camera(Vec2 { x: 0.0, y: 0.0 }, VIEWPORT, WORLD),
            Vec2 { x: 0.0, y: 0.0 }
        );
        assert_eq!(
            update_camera(Vec2 { x: 10.0, y: 10.0 }, VIEWPORT, WORLD),
            Vec2 { x: 0.0, y: 0.0 }
        );
        assert_eq!(
            update_camera(Vec2 { x: 9536.0, y: 9536.0 }, VIEWPORT, WORLD),
            Vec2 { x: 8800.0, y: 9000.0 }
        );
    }

    #[test]
    fn world_smaller_than_viewport_pins_to_zero() {
        let small = Vec2 { x: 320.0, y: 960.0 };
        let camera = update_camera(Vec2 { x: 200.0, y: 600.0 }, VIEWPORT, small);
        assert_eq!(camera.x, 0.0);
        // Vertical axis still fits a scrolling range: 600 - 300 + 32 = 332, max 360.
        assert_eq!(camera.y, 332.0);
    }

    #[test]
    fn camera_stays_within_range_for_any_player_position() {
        for step in 0..=40 {
            let p = step as f32 * 250.0 - 500.0;
            let camera = update_camera(Vec2 { x: p, y: p }, VIEWPORT, WORLD);
            assert!((0.0..=8800.0).contains(&camera.x), "{camera:?}");
            assert!((0.0..=9000.0).contains(&camera.y), "{camera:?}");
        }
    }
}
