use sha2::{Digest, Sha256};

use super::objects::WorldObject;
use super::terrain::TerrainGrid;

pub(crate) fn world_fingerprint(terrain: &TerrainGrid, objects: &[WorldObject]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(terrain.width().to_le_bytes());
    hasher.update(terrain.height().to_le_bytes());
    for cell in terrain.cells() {
        hasher.update([cell.tag()]);
    }
    hasher.update([0u8]);
    for object in objects {
        hasher.update(object.id.0.to_le_bytes());
        hasher.update([object.kind.tag(), u8::from(object.solid)]);
        hasher.update(object.position.x.to_bits().to_le_bytes());
        hasher.update(object.position.y.to_bits().to_le_bytes());
        match object.growth_stage {
            Some(stage) => {
                hasher.update([1u8]);
                hasher.update(stage.to_le_bytes());
            }
            None => hasher.update([0u8]),
        }
    }
    to_hex_lower(&hasher.finalize())
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}
