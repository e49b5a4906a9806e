//! Roomhop - simulation core for a room-based 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile grid, player, blocks, camera, particles)
//! - `persistence`: Level file format (save/load with validation)
//! - `renderer`: Render data (colored quads + view matrix) derived from the sim
//! - `settings`: Player-facing preferences that gate cosmetic effects
//! - `tuning`: Data-driven movement and camera balance

pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use persistence::{LevelData, LevelError};
pub use settings::{QualityPreset, Settings};
pub use tuning::{CameraTuning, PlayerTuning};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Tile grid dimensions (cells)
    pub const GRID_WIDTH: usize = 512;
    pub const GRID_HEIGHT: usize = 512;
    /// Edge length of one cell in world units
    pub const TILE_SIZE: f32 = 40.0;

    /// Dash duration (0.15s)
    pub const DASH_TICKS: u32 = 9;
    /// Horizontal input lockout after a wall jump (0.2s)
    pub const WALL_JUMP_LOCK_TICKS: u32 = 12;
    /// Ghost trail sampling cadence during a dash (~0.03s)
    pub const GHOST_INTERVAL_TICKS: u32 = 2;
    /// How long a ghost sample stays visible
    pub const GHOST_LIFETIME_TICKS: u32 = 12;
    /// Starting alpha of a ghost sample
    pub const GHOST_ALPHA: f32 = 0.6;

    /// Draggable block timings (0.5s each)
    pub const BLOCK_WAIT_TICKS: u32 = 30;
    pub const BLOCK_RETURN_TICKS: u32 = 30;

    /// Particle defaults
    pub const PARTICLE_LIFETIME: f32 = 1.0;
    pub const PARTICLE_GRAVITY: f32 = 0.15;

    /// Horizontal speeds below this snap to zero under friction
    pub const VELOCITY_EPSILON: f32 = 0.1;
    /// Per-tick relaxation of the squish/stretch render scale
    pub const SQUISH_RELAX: f32 = 0.15;

    /// Convert a duration in seconds to whole simulation ticks
    pub fn secs_to_ticks(secs: f32) -> u32 {
        (secs / SIM_DT).round().max(0.0) as u32
    }
}

/// Grid cell containing a world position (`floor(pos / TILE_SIZE)`)
#[inline]
pub fn world_to_cell(pos: Vec2) -> IVec2 {
    (pos / consts::TILE_SIZE).floor().as_ivec2()
}

/// Top-left world position of a grid cell
#[inline]
pub fn cell_to_world(cell: IVec2) -> Vec2 {
    cell.as_vec2() * consts::TILE_SIZE
}

/// Cubic ease `3t² - 2t³`, with `t` clamped to [0, 1]
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
