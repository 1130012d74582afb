use crate::app::Vec2;
use crate::world::{World, TILE_SIZE_PX};

/// Body-only hitbox used against terrain (skips the head/hair overhang).
pub const TERRAIN_HITBOX: Hitbox = Hitbox {
    offset_x: 24.0,
    offset_y: 24.0,
    width: 32.0,
    height: 24.0,
};

/// Wider-left hitbox used against solid objects.
pub const OBJECT_HITBOX: Hitbox = Hitbox {
    offset_x: 8.0,
    offset_y: 24.0,
    width: 32.0,
    height: 24.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn at(self, sprite_top_left: Vec2) -> Rect {
        Rect {
            x: sprite_top_left.x + self.offset_x,
            y: sprite_top_left.y + self.offset_y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn tile(top_left: Vec2) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            width: TILE_SIZE_PX,
            height: TILE_SIZE_PX,
        }
    }

    /// Strict overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Corner pixels, inclusive: the right/bottom corners are the last covered pixel.
    pub fn corner_pixels(&self) -> [Vec2; 4] {
        let right = self.x + self.width - 1.0;
        let bottom = self.y + self.height - 1.0;
        [
            Vec2 {
                x: self.x,
                y: self.y,
            },
            Vec2 {
                x: right,
                y: self.y,
            },
            Vec2 {
                x: self.x,
                y: bottom,
            },
            Vec2 {
                x: right,
                y: bottom,
            },
        ]
    }
}

/// What the movement step needs from the world.
pub trait CollisionQuery {
    fn is_blocked(&self, sprite_top_left: Vec2) -> bool;
    fn pixel_bounds(&self) -> Vec2;
}

impl CollisionQuery for World {
    fn is_blocked(&self, sprite_top_left: Vec2) -> bool {
        is_blocked(self, sprite_top_left)
    }

    fn pixel_bounds(&self) -> Vec2 {
        self.pixel_size()
    }
}

pub fn is_blocked(world: &World, sprite_top_left: Vec2) -> bool {
    blocked_by_terrain(world, sprite_top_left) || blocked_by_objects(world, sprite_top_left)
}

/// Off-map corners never block; only solid tiles inside the grid do.
pub fn blocked_by_terrain(world: &World, sprite_top_left: Vec2) -> bool {
    TERRAIN_HITBOX
        .at(sprite_top_left)
        .corner_pixels()
        .iter()
        .any(|corner| {
            world
                .terrain_at_px(corner.x, corner.y)
                .is_some_and(|kind| kind.is_solid())
        })
}

pub fn blocked_by_objects(world: &World, sprite_top_left: Vec2) -> bool {
    let body = OBJECT_HITBOX.at(sprite_top_left);
    world
        .solid_objects()
        .any(|object| body.overlaps(&Rect::tile(object.position)))
}
