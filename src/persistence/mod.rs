//! Level file format
//!
//! A level is a plain JSON document:
//! - `width`, `height` and a row-major `tiles` array of cell codes
//! - `blocks`: draggable block rest positions and sizes
//! - `decorations`: visual texture names keyed by cell
//!
//! Loading validates dimensions and tile codes before anything reaches the sim.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::state::World;
use crate::sim::tilemap::{TileKind, TileMap};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid is {width}x{height} but has {tiles} tiles")]
    DimensionMismatch {
        width: usize,
        height: usize,
        tiles: usize,
    },
    #[error("unknown tile code {code} at index {index}")]
    UnknownTile { index: usize, code: u8 },
    #[error("level grid is empty")]
    EmptyGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationPlacement {
    pub x: i32,
    pub y: i32,
    pub texture_name: String,
}

/// On-disk level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub width: usize,
    pub height: usize,
    /// Row-major cell codes
    pub tiles: Vec<u8>,
    #[serde(default)]
    pub blocks: Vec<BlockPlacement>,
    #[serde(default)]
    pub decorations: Vec<DecorationPlacement>,
}

impl LevelData {
    /// Capture the editable parts of a world. Blocks are stored at their rest
    /// position, wherever they happen to be right now.
    pub fn from_world(world: &World) -> Self {
        let map = &world.tilemap;
        Self {
            width: map.width(),
            height: map.height(),
            tiles: map.tiles().iter().map(|t| t.code()).collect(),
            blocks: world
                .blocks
                .iter()
                .map(|(_, block)| BlockPlacement {
                    x: block.origin().x,
                    y: block.origin().y,
                    width: block.size.x,
                    height: block.size.y,
                })
                .collect(),
            decorations: map
                .decorations()
                .map(|(cell, name)| DecorationPlacement {
                    x: cell.x,
                    y: cell.y,
                    texture_name: name.to_string(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!(
            "Level saved to {} ({}x{}, {} blocks)",
            path.display(),
            self.width,
            self.height,
            self.blocks.len()
        );
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let level = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Level loaded from {} ({}x{})",
            path.display(),
            level.width,
            level.height
        );
        Ok(level)
    }

    /// Validated tile grid with decorations attached
    pub fn to_tilemap(&self) -> Result<TileMap, LevelError> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let mismatch = LevelError::DimensionMismatch {
            width: self.width,
            height: self.height,
            tiles: self.tiles.len(),
        };
        if self.width.checked_mul(self.height) != Some(self.tiles.len()) {
            return Err(mismatch);
        }

        let tiles = self
            .tiles
            .iter()
            .enumerate()
            .map(|(index, &code)| TileKind::from_code(code).ok_or(LevelError::UnknownTile { index, code }))
            .collect::<Result<Vec<_>, _>>()?;
        let mut map = TileMap::from_tiles(self.width, self.height, tiles).ok_or(mismatch)?;

        for deco in &self.decorations {
            map.set_decoration(deco.x, deco.y, deco.texture_name.clone());
        }
        Ok(map)
    }

    /// Build a fresh world: player at the level start, blocks at rest
    pub fn into_world(self, seed: u64) -> Result<World, LevelError> {
        let map = self.to_tilemap()?;
        let mut world = World::new(map, seed);
        for block in &self.blocks {
            world.add_block(
                Vec2::new(block.x, block.y),
                Vec2::new(block.width, block.height),
            );
        }
        log::debug!(
            "world built: {} blocks, {} decorations",
            world.blocks.len(),
            self.decorations.len()
        );
        Ok(world)
    }
}
