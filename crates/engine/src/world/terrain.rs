use serde::{Deserialize, Serialize};

use super::WorldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Grass,
    Dirt,
    Water,
    Stone,
}

impl TerrainKind {
    /// Water and stone block the player; grass and dirt do not.
    pub const fn is_solid(self) -> bool {
        matches!(self, TerrainKind::Water | TerrainKind::Stone)
    }

    pub(crate) const fn tag(self) -> u8 {
        match self {
            TerrainKind::Grass => 0,
            TerrainKind::Dirt => 1,
            TerrainKind::Water => 2,
            TerrainKind::Stone => 3,
        }
    }
}

/// Row-major terrain grid.
/// - Tile (0,0) is the top-left tile; its pixel origin is (0,0).
/// - Tile (x,y) covers `[x*tile, (x+1)*tile) × [y*tile, (y+1)*tile)` in world pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<TerrainKind>,
}

impl TerrainGrid {
    pub fn new(width: u32, height: u32, cells: Vec<TerrainKind>) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        let actual = cells.len();
        if expected != actual {
            return Err(WorldError::CellCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn filled(width: u32, height: u32, kind: TerrainKind) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimension { width, height });
        }
        Self::new(width, height, vec![kind; width as usize * height as usize])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn kind_at(&self, x: u32, y: u32) -> Option<TerrainKind> {
        self.index_of(x, y)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Signed lookup used by collision; anything off the grid is `None`.
    pub fn kind_at_signed(&self, x: i64, y: i64) -> Option<TerrainKind> {
        if x < 0 || y < 0 || x > u32::MAX as i64 || y > u32::MAX as i64 {
            return None;
        }
        self.kind_at(x as u32, y as u32)
    }

    pub fn row(&self, y: u32) -> Option<&[TerrainKind]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        self.cells.get(start..start + self.width as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TerrainKind]> {
        self.cells.chunks(self.width as usize)
    }

    pub fn cells(&self) -> &[TerrainKind] {
        &self.cells
    }

    pub(crate) fn set(&mut self, x: u32, y: u32, kind: TerrainKind) {
        if let Some(index) = self.index_of(x, y) {
            self.cells[index] = kind;
        }
    }

    pub fn count_of(&self, kind: TerrainKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }
}
