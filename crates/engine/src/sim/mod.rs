mod animation;
mod camera;
mod collision;
mod movement;

pub use animation::{AnimationState, WALK_FRAME_COUNT, WALK_FRAME_TICKS};
pub use camera::{update_camera, CameraConfig};
pub use collision::{
    blocked_by_objects, blocked_by_terrain, is_blocked, CollisionQuery, Hitbox, Rect, OBJECT_HITBOX,
    TERRAIN_HITBOX,
};
pub use movement::{
    step_player, Facing, MoveResolution, MovementConfig, PlayerState, PlayerStep,
    PLAYER_SIZE_PX, PLAYER_SPEED_PX_PER_TICK, SPRINT_SPEED_PX_PER_TICK,
};
