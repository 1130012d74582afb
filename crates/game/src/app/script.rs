use engine::HeldKeys;
use serde::Deserialize;

/// Keys held for `ticks` consecutive ticks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptStep {
    #[serde(default)]
    pub(crate) keys: Vec<String>,
    pub(crate) ticks: u64,
}

/// Replayable input timeline. Past its end nothing is held.
#[derive(Debug, Clone, Default)]
pub(crate) struct InputScript {
    // (first tick after this span, keys held during it)
    spans: Vec<(u64, HeldKeys)>,
    idle: HeldKeys,
}

impl InputScript {
    pub(crate) fn from_steps(steps: &[ScriptStep]) -> Self {
        let mut end = 0u64;
        let spans = steps
            .iter()
            .filter(|step| step.ticks > 0)
            .map(|step| {
                end = end.saturating_add(step.ticks);
                (end, HeldKeys::from_keys(&step.keys))
            })
            .collect();
        Self {
            spans,
            idle: HeldKeys::new(),
        }
    }

    pub(crate) fn total_ticks(&self) -> u64 {
        self.spans.last().map_or(0, |(end, _)| *end)
    }

    pub(crate) fn held_at(&self, tick: u64) -> &HeldKeys {
        let index = self.spans.partition_point(|(end, _)| *end <= tick);
        self.spans
            .get(index)
            .map_or(&self.idle, |(_, keys)| keys)
    }
}

#[cfg(test)]
mod tests {
    use engine::{InputAction, InputSource};

    use super::*;

    fn step(keys: &[&str], ticks: u64) -> ScriptStep {
        ScriptStep {
            keys: keys.iter().map(ToString::to_string).collect(),
            ticks,
        }
    }

    #[test]
    fn spans_are_replayed_in_order() {
        let script = InputScript::from_steps(&[
            step(&["d"], 3),
            step(&[], 2),
            step(&["w", "shift"], 1),
        ]);
        assert_eq!(script.total_ticks(), 6);

        for tick in 0..3 {
            assert!(script.held_at(tick).is_held(InputAction::MoveRight));
        }
        assert!(script.held_at(3).is_empty());
        assert!(script.held_at(4).is_empty());
        assert!(script.held_at(5).is_held(InputAction::MoveUp));
        assert!(script.held_at(5).is_held(InputAction::Sprint));
        assert!(script.held_at(6).is_empty());
        assert!(script.held_at(1_000).is_empty());
    }

    #[test]
    fn zero_length_steps_are_skipped() {
        let script = InputScript::from_steps(&[step(&["a"], 0), step(&["s"], 2)]);
        assert_eq!(script.total_ticks(), 2);
        assert!(script.held_at(0).is_held(InputAction::MoveDown));
    }

    #[test]
    fn empty_script_holds_nothing() {
        let script = InputScript::default();
        assert_eq!(script.total_ticks(), 0);
        assert!(script.held_at(0).is_empty());
    }
}
