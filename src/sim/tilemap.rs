//! Tile grid: cell codes plus a sparse decoration layer
//!
//! Every lookup is total. Collision probes routinely sample one unit outside
//! the player's box, which can land outside the grid at world edges, so
//! out-of-range reads answer `Empty` and out-of-range writes are ignored.

use std::collections::BTreeMap;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::{GRID_HEIGHT, GRID_WIDTH, TILE_SIZE};
use crate::world_to_cell;

/// Cell contents. The numeric codes are stored in level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    #[default]
    Empty = 0,
    Wall = 1,
    PlayerSpawn = 2,
    Checkpoint = 3,
    KillBlock = 4,
    LevelEnd = 5,
}

impl TileKind {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileKind::Empty),
            1 => Some(TileKind::Wall),
            2 => Some(TileKind::PlayerSpawn),
            3 => Some(TileKind::Checkpoint),
            4 => Some(TileKind::KillBlock),
            5 => Some(TileKind::LevelEnd),
            _ => None,
        }
    }

    /// Only walls stop movement
    pub fn is_solid(self) -> bool {
        self == TileKind::Wall
    }
}

/// Fixed-size tile grid, row-major (`y * width + x`)
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
    /// Purely visual; never consulted by collision
    decorations: BTreeMap<(i32, i32), String>,
}

impl Default for TileMap {
    /// Full-size empty level grid
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl TileMap {
    /// Create an all-empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileKind::Empty; width * height],
            decorations: BTreeMap::new(),
        }
    }

    /// Build a grid from row-major cells. Returns `None` on a length mismatch.
    pub fn from_tiles(width: usize, height: usize, tiles: Vec<TileKind>) -> Option<Self> {
        if tiles.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
            decorations: BTreeMap::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major cell slice
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Cell at grid coordinates; `Empty` outside the grid
    pub fn get_tile(&self, x: i32, y: i32) -> TileKind {
        self.index(x, y)
            .and_then(|i| self.tiles.get(i).copied())
            .unwrap_or(TileKind::Empty)
    }

    /// Cell containing a world position
    pub fn get_tile_at_world(&self, pos: Vec2) -> TileKind {
        let cell = world_to_cell(pos);
        self.get_tile(cell.x, cell.y)
    }

    pub fn is_solid(&self, pos: Vec2) -> bool {
        self.get_tile_at_world(pos).is_solid()
    }

    /// Overwrite a cell; ignored outside the grid
    pub fn set_tile(&mut self, x: i32, y: i32, kind: TileKind) {
        if let Some(slot) = self.index(x, y).and_then(|i| self.tiles.get_mut(i)) {
            *slot = kind;
        }
    }

    /// Fill the outermost ring of cells with walls
    pub fn fill_border(&mut self, kind: TileKind) {
        let (w, h) = (self.width as i32, self.height as i32);
        for x in 0..w {
            self.set_tile(x, 0, kind);
            self.set_tile(x, h - 1, kind);
        }
        for y in 0..h {
            self.set_tile(0, y, kind);
            self.set_tile(w - 1, y, kind);
        }
    }

    /// First cell of the given kind in row-major order
    pub fn find_first(&self, kind: TileKind) -> Option<IVec2> {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .position(|&t| t == kind)
            .map(|i| IVec2::new((i % width) as i32, (i / width) as i32))
    }

    pub fn decoration(&self, x: i32, y: i32) -> Option<&str> {
        self.decorations.get(&(x, y)).map(String::as_str)
    }

    /// Attach a decoration to a cell, replacing any previous one
    pub fn set_decoration(&mut self, x: i32, y: i32, name: impl Into<String>) {
        self.decorations.insert((x, y), name.into());
    }

    pub fn remove_decoration(&mut self, x: i32, y: i32) -> Option<String> {
        self.decorations.remove(&(x, y))
    }

    /// Decorations in (x, y) order
    pub fn decorations(&self) -> impl Iterator<Item = (IVec2, &str)> {
        self.decorations
            .iter()
            .map(|(&(x, y), name)| (IVec2::new(x, y), name.as_str()))
    }

    /// Inclusive cell range overlapping a world rectangle, clamped to the grid
    pub fn cells_in_rect(&self, min: Vec2, max: Vec2) -> Option<(IVec2, IVec2)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let lo = world_to_cell(min).max(IVec2::ZERO);
        let hi = world_to_cell(max).min(IVec2::new(self.width as i32 - 1, self.height as i32 - 1));
        if lo.x > hi.x || lo.y > hi.y {
            return None;
        }
        Some((lo, hi))
    }

    /// World size of the whole grid
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * TILE_SIZE
    }
}
