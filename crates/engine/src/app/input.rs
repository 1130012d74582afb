use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Sprint,
}

const ACTION_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveUp,
        InputAction::MoveDown,
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Sprint,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Sprint => 4,
        }
    }

    /// Lowercase key names bound to this action.
    pub const fn key_names(self) -> &'static [&'static str] {
        match self {
            InputAction::MoveUp => &["w", "arrowup"],
            InputAction::MoveDown => &["s", "arrowdown"],
            InputAction::MoveLeft => &["a", "arrowleft"],
            InputAction::MoveRight => &["d", "arrowright"],
            InputAction::Sprint => &["shift"],
        }
    }

    pub fn for_key(key: &str) -> Option<InputAction> {
        let key = key.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.key_names().contains(&key.as_str()))
    }
}

/// Anything that can answer "is this action held right now".
pub trait InputSource {
    fn is_held(&self, action: InputAction) -> bool;
}

/// Held-action state sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sample(source: &impl InputSource) -> Self {
        let mut actions = ActionStates::default();
        for action in InputAction::ALL {
            actions.set(action, source.is_held(action));
        }
        Self { actions }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn any_movement(&self) -> bool {
        [
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
        ]
        .into_iter()
        .any(|action| self.is_down(action))
    }
}

impl InputSource for InputSnapshot {
    fn is_held(&self, action: InputAction) -> bool {
        self.is_down(action)
    }
}

/// Set of currently held key names, stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys {
    keys: BTreeSet<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut held = Self::new();
        for key in keys {
            held.press(key.as_ref());
        }
        held
    }

    pub fn press(&mut self, key: &str) {
        self.keys.insert(key.to_ascii_lowercase());
    }

    pub fn release(&mut self, key: &str) {
        self.keys.remove(&key.to_ascii_lowercase());
    }

    /// Drops every held key, e.g. when focus is lost.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&key.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl InputSource for HeldKeys {
    fn is_held(&self, action: InputAction) -> bool {
        action
            .key_names()
            .iter()
            .any(|name| self.keys.contains(*name))
    }
}
