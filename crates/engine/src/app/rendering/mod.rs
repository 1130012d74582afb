mod snapshot;
mod transform;

pub use snapshot::FrameSnapshot;
pub use transform::{
    tile_sprite_visible, visible_tile_range, world_to_screen_px, TileRange, Viewport,
    DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
};
