use engine::{
    FrameSnapshot, InputSnapshot, ObjectId, Scene, SceneCommand, SimulationState, TickReport,
    Vec2, World, WorldObject, TILE_SIZE_PX,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::config::{ExplorerConfig, ObjectPlacement, ObjectRemoval, RegenerationStep};
use super::script::InputScript;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScheduledEdit {
    Place(ObjectPlacement),
    Remove(ObjectId),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct EditStats {
    pub(crate) objects_placed: u32,
    pub(crate) objects_rejected: u32,
    pub(crate) objects_removed: u32,
    pub(crate) removals_missing: u32,
}

/// Replays a scripted session: held keys per tick plus object edits and
/// regenerations pinned to tick numbers.
#[derive(Debug)]
pub(crate) struct ExplorerScene {
    script: InputScript,
    spawn: Option<Vec2>,
    // (tick, edit), sorted by tick; stable so config order wins within a tick.
    edits: Vec<(u64, ScheduledEdit)>,
    next_edit: usize,
    regenerations: Vec<RegenerationStep>,
    stats: EditStats,
    last_frame: Option<FrameSnapshot>,
}

impl ExplorerScene {
    pub(crate) fn from_config(config: &ExplorerConfig) -> Self {
        let mut edits: Vec<(u64, ScheduledEdit)> = config
            .objects
            .iter()
            .map(|placement| (placement.at_tick, ScheduledEdit::Place(placement.clone())))
            .chain(config.removals.iter().map(|ObjectRemoval { at_tick, id }| {
                (*at_tick, ScheduledEdit::Remove(ObjectId(*id)))
            }))
            .collect();
        edits.sort_by_key(|(tick, _)| *tick);

        let mut regenerations = config.regenerations.clone();
        regenerations.sort_by_key(|step| step.at_tick);

        Self {
            script: InputScript::from_steps(&config.script),
            spawn: config.spawn,
            edits,
            next_edit: 0,
            regenerations,
            stats: EditStats::default(),
            last_frame: None,
        }
    }

    pub(crate) fn stats(&self) -> EditStats {
        self.stats
    }

    pub(crate) fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.last_frame.as_ref()
    }

    fn apply_edits_through(&mut self, tick: u64, state: &mut SimulationState) {
        while let Some((at_tick, edit)) = self.edits.get(self.next_edit) {
            if *at_tick > tick {
                break;
            }
            let edit = edit.clone();
            self.next_edit += 1;
            self.apply_edit(edit, state);
        }
    }

    fn apply_edit(&mut self, edit: ScheduledEdit, state: &mut SimulationState) {
        match edit {
            ScheduledEdit::Place(placement) => {
                let id = match placement.id {
                    Some(id) => ObjectId(id),
                    None => state.allocate_object_id(),
                };
                let position = Vec2 {
                    x: placement.tile_x as f32 * TILE_SIZE_PX,
                    y: placement.tile_y as f32 * TILE_SIZE_PX,
                };
                let mut object = WorldObject::new(id, placement.kind, position, placement.solid());
                if let Some(stage) = placement.growth_stage {
                    object = object.with_growth_stage(stage);
                }
                match state.add_object(object) {
                    Ok(()) => self.stats.objects_placed += 1,
                    Err(_) => self.stats.objects_rejected += 1,
                }
            }
            ScheduledEdit::Remove(id) => {
                if state.remove_object(id) {
                    self.stats.objects_removed += 1;
                } else {
                    self.stats.removals_missing += 1;
                    debug!(object_id = %id, "object_remove_missing");
                }
            }
        }
    }

    fn regeneration_at(&self, tick: u64) -> Option<RegenerationStep> {
        self.regenerations
            .binary_search_by_key(&tick, |step| step.at_tick)
            .ok()
            .map(|index| self.regenerations[index])
    }
}

impl Scene for ExplorerScene {
    fn load(&mut self, state: &mut SimulationState) {
        if let Some(spawn) = self.spawn {
            state.place_player(spawn);
        }
        self.apply_edits_through(0, state);
        let player = state.player().position;
        info!(
            script_ticks = self.script.total_ticks(),
            scheduled_edits = self.edits.len(),
            regenerations = self.regenerations.len(),
            player_x = player.x,
            player_y = player.y,
            "explorer_loaded"
        );
    }

    fn sample_input(&mut self, tick: u64) -> InputSnapshot {
        InputSnapshot::sample(self.script.held_at(tick))
    }

    fn update(&mut self, report: &TickReport, state: &mut SimulationState) -> SceneCommand {
        self.apply_edits_through(report.tick, state);
        match self.regeneration_at(report.tick) {
            Some(step) => SceneCommand::Regenerate {
                width: step.width,
                height: step.height,
            },
            None => SceneCommand::None,
        }
    }

    fn render(&mut self, frame: &FrameSnapshot, _world: &World) {
        self.last_frame = Some(frame.clone());
    }

    fn unload(&mut self, _state: &mut SimulationState) {
        let pending = self.edits.len() - self.next_edit;
        if pending > 0 {
            warn!(pending, "scheduled_edits_not_reached");
        }
        info!(
            objects_placed = self.stats.objects_placed,
            objects_rejected = self.stats.objects_rejected,
            objects_removed = self.stats.objects_removed,
            removals_missing = self.stats.removals_missing,
            "explorer_unloaded"
        );
    }
}
