use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Tree,
    Rock,
    Bush,
    Fence,
    Crop,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Tree,
        ObjectKind::Rock,
        ObjectKind::Bush,
        ObjectKind::Fence,
        ObjectKind::Crop,
    ];

    /// Crops can be walked through; every other kind blocks.
    pub const fn solid_by_default(self) -> bool {
        !matches!(self, ObjectKind::Crop)
    }

    pub(crate) const fn tag(self) -> u8 {
        match self {
            ObjectKind::Tree => 0,
            ObjectKind::Rock => 1,
            ObjectKind::Bush => 2,
            ObjectKind::Fence => 3,
            ObjectKind::Crop => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Top-left of the occupied tile, in world pixels.
    pub position: Vec2,
    pub solid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_stage: Option<u32>,
}

impl WorldObject {
    pub fn new(id: ObjectId, kind: ObjectKind, position: Vec2, solid: bool) -> Self {
        Self {
            id,
            kind,
            position,
            solid,
            growth_stage: None,
        }
    }

    pub fn with_growth_stage(mut self, growth_stage: u32) -> Self {
        self.growth_stage = Some(growth_stage);
        self
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ObjectIdAllocator {
    next: u64,
}

impl ObjectIdAllocator {
    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Keeps future allocations clear of ids that were added explicitly.
    pub fn observe(&mut self, id: ObjectId) {
        if id.0 >= self.next {
            self.next = id.0.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_never_reuses_ids() {
        let mut allocator = ObjectIdAllocator::default();
        let a = allocator.allocate();
        let b = allocator.allocate();
        assert_ne!(a, b);
        assert_eq!(b, ObjectId(1));
    }

    #[test]
    fn allocator_skips_past_observed_ids() {
        let mut allocator = ObjectIdAllocator::default();
        allocator.observe(ObjectId(41));
        assert_eq!(allocator.allocate(), ObjectId(42));
        allocator.observe(ObjectId(3));
        assert_eq!(allocator.allocate(), ObjectId(43));
    }

    #[test]
    fn object_json_uses_lowercase_kind_and_omits_missing_growth() {
        let object = WorldObject::new(
            ObjectId(7),
            ObjectKind::Tree,
            Vec2 { x: 64.0, y: 128.0 },
            true,
        );
        let value = serde_json::to_value(&object).expect("to_value");
        assert_eq!(value["kind"], "tree");
        assert_eq!(value["id"], 7);
        assert!(value.get("growth_stage").is_none());

        let crop = WorldObject::new(ObjectId(8), ObjectKind::Crop, Vec2::default(), false)
            .with_growth_stage(2);
        let value = serde_json::to_value(&crop).expect("to_value");
        assert_eq!(value["growth_stage"], 2);
    }

    #[test]
    fn only_crops_are_walkable_by_default() {
        for kind in ObjectKind::ALL {
            assert_eq!(
                kind.solid_by_default(),
                kind != ObjectKind::Crop,
                "{kind:?}"
            );
        }
    }

    #[test]
    fn display_matches_generated_id_format() {
        assert_eq!(ObjectId(12).to_string(), "obj_12");
    }
}
