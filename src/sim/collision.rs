//! Axis-separated AABB collision against the tile grid and solid blocks
//!
//! Movement is resolved one axis at a time: move, then snap the leading edge
//! back to the obstacle it entered. Tiles snap to the cell boundary, blocks
//! snap flush to their bounding edge. The two passes run back to back on each
//! axis, so an object fast enough to cross a one-tile gap between a wall and a
//! block in a single tick can tunnel; movement speeds stay well below that.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tilemap::TileMap;
use crate::consts::TILE_SIZE;

/// Axis-aligned box, `pos` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap: boxes that only share an edge do not intersect
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Half-open containment: left/top edges inside, right/bottom outside
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }
}

/// Result of resolving one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisHit {
    /// Corrected coordinate on the resolved axis
    pub snapped: f32,
}

/// Sample heights along a vertical leading edge
#[inline]
fn edge_samples_y(bounds: &Aabb) -> [f32; 3] {
    [
        bounds.top(),
        bounds.top() + bounds.size.y * 0.5,
        bounds.bottom() - 1.0,
    ]
}

/// Sample columns along a horizontal leading edge
#[inline]
fn edge_samples_x(bounds: &Aabb) -> [f32; 3] {
    [
        bounds.left() + 1.0,
        bounds.left() + bounds.size.x * 0.5,
        bounds.right() - 1.0,
    ]
}

/// Snap a box that moved horizontally out of wall tiles
///
/// Only the leading edge (by sign of `vel_x`) is probed.
pub fn resolve_tiles_x(map: &TileMap, bounds: &Aabb, vel_x: f32) -> Option<AxisHit> {
    if vel_x > 0.0 {
        let edge = bounds.right();
        let hit = edge_samples_y(bounds)
            .iter()
            .any(|&y| map.is_solid(Vec2::new(edge, y)));
        hit.then(|| AxisHit {
            snapped: (edge / TILE_SIZE).floor() * TILE_SIZE - bounds.size.x,
        })
    } else if vel_x < 0.0 {
        let edge = bounds.left();
        let hit = edge_samples_y(bounds)
            .iter()
            .any(|&y| map.is_solid(Vec2::new(edge, y)));
        hit.then(|| AxisHit {
            snapped: ((edge / TILE_SIZE).floor() + 1.0) * TILE_SIZE,
        })
    } else {
        None
    }
}

/// Snap a box that moved vertically out of wall tiles
pub fn resolve_tiles_y(map: &TileMap, bounds: &Aabb, vel_y: f32) -> Option<AxisHit> {
    if vel_y > 0.0 {
        let edge = bounds.bottom();
        let hit = edge_samples_x(bounds)
            .iter()
            .any(|&x| map.is_solid(Vec2::new(x, edge)));
        hit.then(|| AxisHit {
            snapped: (edge / TILE_SIZE).floor() * TILE_SIZE - bounds.size.y,
        })
    } else if vel_y < 0.0 {
        let edge = bounds.top();
        let hit = edge_samples_x(bounds)
            .iter()
            .any(|&x| map.is_solid(Vec2::new(x, edge)));
        hit.then(|| AxisHit {
            snapped: ((edge / TILE_SIZE).floor() + 1.0) * TILE_SIZE,
        })
    } else {
        None
    }
}

/// First solid obstacle strictly overlapping `bounds`
pub fn first_overlap<'a>(bounds: &Aabb, solids: &'a [Aabb]) -> Option<&'a Aabb> {
    solids.iter().find(|b| bounds.overlaps(b))
}

/// Snap flush against a block on the horizontal axis
pub fn resolve_block_x(bounds: &Aabb, block: &Aabb, vel_x: f32) -> Option<AxisHit> {
    if vel_x > 0.0 {
        Some(AxisHit {
            snapped: block.left() - bounds.size.x,
        })
    } else if vel_x < 0.0 {
        Some(AxisHit {
            snapped: block.right(),
        })
    } else {
        None
    }
}

/// Snap flush against a block on the vertical axis
pub fn resolve_block_y(bounds: &Aabb, block: &Aabb, vel_y: f32) -> Option<AxisHit> {
    if vel_y > 0.0 {
        Some(AxisHit {
            snapped: block.top() - bounds.size.y,
        })
    } else if vel_y < 0.0 {
        Some(AxisHit {
            snapped: block.bottom(),
        })
    } else {
        None
    }
}

/// Whether a wall tile or solid block sits one unit beyond the box's side
///
/// Samples the top, middle and bottom of that side so thin edges at the
/// corners are not missed.
pub fn touches_wall(map: &TileMap, solids: &[Aabb], bounds: &Aabb, direction: f32) -> bool {
    let x = if direction > 0.0 {
        bounds.right() + 1.0
    } else {
        bounds.left() - 1.0
    };
    edge_samples_y(bounds).iter().any(|&y| {
        let probe = Vec2::new(x, y);
        map.is_solid(probe) || solids.iter().any(|b| b.contains_point(probe))
    })
}

/// Whether a wall tile or solid block sits directly under the box's bottom edge
pub fn has_support(map: &TileMap, solids: &[Aabb], bounds: &Aabb) -> bool {
    let y = bounds.bottom();
    edge_samples_x(bounds).iter().any(|&x| {
        let point = Vec2::new(x, y);
        map.is_solid(point) || solids.iter().any(|b| b.contains_point(point))
    })
}
