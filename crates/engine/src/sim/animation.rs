use serde::{Deserialize, Serialize};

/// Ticks spent on each walk frame.
pub const WALK_FRAME_TICKS: u32 = 8;
pub const WALK_FRAME_COUNT: u32 = 2;

/// Walk-cycle position. Frame 0 is the idle pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationState {
    pub frame: u32,
    pub counter: u32,
}

impl AnimationState {
    /// Advances one tick; any tick without movement snaps back to idle.
    pub fn advance(self, moving: bool) -> Self {
        if !moving {
            return Self::default();
        }
        let counter = self.counter + 1;
        if counter >= WALK_FRAME_TICKS {
            Self {
                frame: (self.frame + 1) % WALK_FRAME_COUNT,
                counter: 0,
            }
        } else {
            Self {
                frame: self.frame,
                counter,
            }
        }
    }
}
