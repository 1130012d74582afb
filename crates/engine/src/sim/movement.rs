use serde::{Deserialize, Serialize};

use crate::app::{InputAction, InputSource, Vec2};

use super::animation::AnimationState;
use super::camera::clamp_axis;
use super::collision::CollisionQuery;

pub const PLAYER_SIZE_PX: f32 = 64.0;
pub const PLAYER_SPEED_PX_PER_TICK: f32 = 4.0;
pub const SPRINT_SPEED_PX_PER_TICK: f32 = 6.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementConfig {
    pub speed_px_per_tick: f32,
    pub sprint_speed_px_per_tick: f32,
    pub player_size_px: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed_px_per_tick: PLAYER_SPEED_PX_PER_TICK,
            sprint_speed_px_per_tick: SPRINT_SPEED_PX_PER_TICK,
            player_size_px: PLAYER_SIZE_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Sprite top-left, in world pixels.
    pub position: Vec2,
    pub facing: Facing,
    pub moving: bool,
    pub animation: AnimationState,
}

impl PlayerState {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Which candidate position the collision fallback accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveResolution {
    Full,
    HorizontalOnly,
    VerticalOnly,
    Reverted,
}

impl MoveResolution {
    pub fn is_blocked(self) -> bool {
        !matches!(self, MoveResolution::Full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStep {
    pub player: PlayerState,
    pub resolution: MoveResolution,
}

const DIRECTIONS: [(InputAction, Facing, f32, f32); 4] = [
    (InputAction::MoveUp, Facing::Up, 0.0, -1.0),
    (InputAction::MoveDown, Facing::Down, 0.0, 1.0),
    (InputAction::MoveLeft, Facing::Left, -1.0, 0.0),
    (InputAction::MoveRight, Facing::Right, 1.0, 0.0),
];

/// One movement tick: direction sum, world clamp, then full / x-only / y-only / revert.
///
/// `moving` follows held direction keys, not displacement, so opposing keys
/// still animate in place. Facing is the last held direction in up, down,
/// left, right order.
pub fn step_player<C, I>(
    player: &PlayerState,
    input: &I,
    collider: &C,
    config: &MovementConfig,
) -> PlayerStep
where
    C: CollisionQuery + ?Sized,
    I: InputSource + ?Sized,
{
    let speed = if input.is_held(InputAction::Sprint) {
        config.sprint_speed_px_per_tick
    } else {
        config.speed_px_per_tick
    };

    let old = player.position;
    let mut tentative = old;
    let mut facing = player.facing;
    let mut moving = false;
    for (action, direction, dx, dy) in DIRECTIONS {
        if input.is_held(action) {
            tentative.x += dx * speed;
            tentative.y += dy * speed;
            facing = direction;
            moving = true;
        }
    }

    let bounds = collider.pixel_bounds();
    let proposed = Vec2 {
        x: clamp_axis(tentative.x, bounds.x - config.player_size_px),
        y: clamp_axis(tentative.y, bounds.y - config.player_size_px),
    };
    let (position, resolution) = resolve_axis_priority(old, proposed, collider);

    PlayerStep {
        player: PlayerState {
            position,
            facing,
            moving,
            animation: player.animation.advance(moving),
        },
        resolution,
    }
}

fn resolve_axis_priority<C>(old: Vec2, proposed: Vec2, collider: &C) -> (Vec2, MoveResolution)
where
    C: CollisionQuery + ?Sized,
{
    if !collider.is_blocked(proposed) {
        return (proposed, MoveResolution::Full);
    }
    let horizontal = Vec2 {
        x: proposed.x,
        y: old.y,
    };
    if !collider.is_blocked(horizontal) {
        return (horizontal, MoveResolution::HorizontalOnly);
    }
    let vertical = Vec2 {
        x: old.x,
        y: proposed.y,
    };
    if !collider.is_blocked(vertical) {
        return (vertical, MoveResolution::VerticalOnly);
    }
    (old, MoveResolution::Reverted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::InputSnapshot;
    use crate::world::{ObjectKind, TerrainGrid, TerrainKind, World, TILE_SIZE_PX};

    struct FnCollider<F> {
        bounds: Vec2,
        blocked: F,
    }

    impl<F: Fn(Vec2) -> bool> CollisionQuery for FnCollider<F> {
        fn is_blocked(&self, sprite_top_left: Vec2) -> bool {
            (self.blocked)(sprite_top_left)
        }

        fn pixel_bounds(&self) -> Vec2 {
            self.bounds
        }
    }

    fn open(bounds: Vec2) -> FnCollider<impl Fn(Vec2) -> bool> {
        FnCollider {
            bounds,
            blocked: |_: Vec2| false,
        }
    }

    fn held(actions: &[InputAction]) -> InputSnapshot {
        actions
            .iter()
            .fold(InputSnapshot::empty(), |snapshot, action| {
                snapshot.with_action_down(*action, true)
            })
    }

    fn grass_world(width: u32, height: u32) -> World {
        World::new(
            TerrainGrid::filled(width, height, TerrainKind::Grass).expect("grid"),
            Vec::new(),
        )
        .expect("world")
    }

    const BIG: Vec2 = Vec2 {
        x: 6400.0,
        y: 6400.0,
    };

    #[test]
    fn diagonal_moves_both_axes_at_full_speed() {
        let player = PlayerState::at(Vec2 { x: 100.0, y: 100.0 });
        let step = step_player(
            &player,
            &held(&[InputAction::MoveRight, InputAction::MoveDown]),
            &open(BIG),
            &MovementConfig::default(),
        );
        assert_eq!(step.player.position, Vec2 { x: 104.0, y: 104.0 });
        assert_eq!(step.resolution, MoveResolution::Full);
        assert!(step.player.moving);
    }

    #[test]
    fn sprint_uses_sprint_speed() {
        let player = PlayerState::at(Vec2 { x: 100.0, y: 100.0 });
        let step = step_player(
            &player,
            &held(&[InputAction::MoveLeft, InputAction::Sprint]),
            &open(BIG),
            &MovementConfig::default(),
        );
        assert_eq!(step.player.position, Vec2 { x: 94.0, y: 100.0 });
    }

    #[test]
    fn solid_object_below_slides_horizontally() {
        let mut world = grass_world(10, 10);
        world
            .spawn_object(ObjectKind::Rock, Vec2 { x: 100.0, y: 150.0 }, true)
            .expect("rock");
        let player = PlayerState::at(Vec2 { x: 100.0, y: 100.0 });
        let step = step_player(
            &player,
            &held(&[InputAction::MoveRight, InputAction::MoveDown]),
            &world,
            &MovementConfig::default(),
        );
        assert_eq!(step.player.position, Vec2 { x: 104.0, y: 100.0 });
        assert_eq!(step.resolution, MoveResolution::HorizontalOnly);
    }

    #[test]
    fn stone_row_below_slides_horizontally() {
        let mut cells = vec![TerrainKind::Grass; 16];
        cells[2 * 4 + 1] = TerrainKind::Stone;
        cells[2 * 4 + 2] = TerrainKind::Stone;
        let world =
            World::new(TerrainGrid::new(4, 4, cells).expect("grid"), Vec::new()).expect("world");
        let player = PlayerState::at(Vec2 { x: 100.0, y: 80.0 });
        let step = step_player(
            &player,
            &held(&[InputAction::MoveRight, InputAction::MoveDown]),
            &world,
            &MovementConfig::default(),
        );
        assert_eq!(step.player.position, Vec2 { x: 104.0, y: 80.0 });
    }

    #[test]
    fn falls_back_to_vertical_when_horizontal_is_blocked() {
        let old_x = 100.0;
        let collider = FnCollider {
            bounds: BIG,
            blocked: move |position: Vec2| position.x != old_x,
        };
        let player = PlayerState::at(Vec2 { x: old_x, y: 100.0 });
        let step = step_player(
            &player,
            &held(&[InputAction::MoveRight, InputAction::MoveUp]),
            &collider,
            &MovementConfig::default(),
        );
        assert_eq!(step.player.position, Vec2 { x: 100.0, y: 96.0 });
        assert_eq!(step.resolution, MoveResolution::VerticalOnly);
    }

    #[test]
    fn fully_blocked_move_reverts_but_keeps_facing_and_animation() {
        let start = Vec2 { x: 100.0, y: 100.0 };
        // The third candidate keeps old.x with the new y; only a blocked
        // origin leaves nothing to fall back to.
        let collider = FnCollider {
            bounds: BIG,
            blocked: |_: Vec2| true,
        };
        let player = PlayerState::at(start);
        let step = step_player(
            &player,
            &held(&[InputAction::MoveLeft]),
            &collider,
            &MovementConfig::default(),
        );
        assert_eq!(step.player.position, start);
        assert_eq!(step.resolution, MoveResolution::Reverted);
        assert_eq!(step.player.facing, Facing::Left);
        assert!(step.player.moving);
        assert_eq!(step.player.animation.counter, 1);
    }

    #[test]
    fn facing_is_last_held_direction_in_fixed_order() {
        let player = PlayerState::at(Vec2 { x: 500.0, y: 500.0 });
        let config = MovementConfig::default();
        let cases = [
            (vec![InputAction::MoveUp, InputAction::MoveDown], Facing::Down),
            (vec![InputAction::MoveUp, InputAction::MoveLeft], Facing::Left),
            (
                vec![
                    InputAction::MoveRight,
                    InputAction::MoveUp,
                    InputAction::MoveLeft,
                ],
                Facing::Right,
            ),
            (vec![InputAction::MoveUp], Facing::Up),
        ];
        for (actions, expected) in cases {
            let step = step_player(&player, &held(&actions), &open(BIG), &config);
            assert_eq!(step.player.facing, expected, "{actions:?}");
        }
    }

    #[test]
    fn opposing_keys_animate_without_moving() {
        let start = Vec2 { x: 300.0, y: 300.0 };
        let step = step_player(
            &PlayerState::at(start),
            &held(&[InputAction::MoveLeft, InputAction::MoveRight]),
            &open(BIG),
            &MovementConfig::default(),
        );
        assert_eq!(step.player.position, start);
        assert!(step.player.moving);
        assert_eq!(step.player.facing, Facing::Right);
    }

    #[test]
    fn idle_tick_keeps_facing_and_resets_animation() {
        let mut player = PlayerState::at(Vec2 { x: 300.0, y: 300.0 });
        player.facing = Facing::Left;
        player.animation = AnimationState {
            frame: 1,
            counter: 3,
        };
        let step = step_player(
            &player,
            &InputSnapshot::empty(),
            &open(BIG),
            &MovementConfig::default(),
        );
        assert_eq!(step.player.facing, Facing::Left);
        assert!(!step.player.moving);
        assert_eq!(step.player.animation, AnimationState::default());
        assert_eq!(step.resolution, MoveResolution::Full);
    }

    #[test]
    fn position_is_clamped_to_world_bounds() {
        let bounds = Vec2 {
            x: 10.0 * TILE_SIZE_PX,
            y: 10.0 * TILE_SIZE_PX,
        };
        let config = MovementConfig::default();

        let step = step_player(
            &PlayerState::at(Vec2 { x: 2.0, y: 1.0 }),
            &held(&[InputAction::MoveLeft, InputAction::MoveUp]),
            &open(bounds),
            &config,
        );
        assert_eq!(step.player.position, Vec2 { x: 0.0, y: 0.0 });

        let step = step_player(
            &PlayerState::at(Vec2 { x: 575.0, y: 574.0 }),
            &held(&[InputAction::MoveRight, InputAction::MoveDown]),
            &open(bounds),
            &config,
        );
        assert_eq!(step.player.position, Vec2 { x: 576.0, y: 576.0 });
    }

    #[test]
    fn world_narrower_than_player_pins_axis_to_zero() {
        let bounds = Vec2 { x: 32.0, y: 640.0 };
        let step = step_player(
            &PlayerState::at(Vec2 { x: 0.0, y: 100.0 }),
            &held(&[InputAction::MoveRight]),
            &open(bounds),
            &MovementConfig::default(),
        );
        assert_eq!(step.player.position, Vec2 { x: 0.0, y: 100.0 });
    }

    #[test]
    fn held_keys_drive_movement_directly() {
        let keys = crate::app::HeldKeys::from_keys(["ArrowUp"]);
        let step = step_player(
            &PlayerState::at(Vec2 { x: 100.0, y: 100.0 }),
            &keys,
            &open(BIG),
            &MovementConfig::default(),
        );
        assert_eq!(step.player.position, Vec2 { x: 100.0, y: 96.0 });
        assert_eq!(step.player.facing, Facing::Up);
    }

    #[test]
    fn movement_config_rejects_unknown_fields() {
        let parsed: Result<MovementConfig, _> =
            serde_json::from_str(r#"{"speed_px_per_tick": 2.0, "warp": true}"#);
        assert!(parsed.is_err());
        let parsed: MovementConfig =
            serde_json::from_str(r#"{"speed_px_per_tick": 2.0}"#).expect("parse");
        assert_eq!(parsed.speed_px_per_tick, 2.0);
        assert_eq!(parsed.sprint_speed_px_per_tick, SPRINT_SPEED_PX_PER_TICK);
    }
}
