//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (durations are tick countdowns)
//! - Seeded RNG only (owned by `World`)
//! - Stable iteration order (blocks by insertion id)
//! - No rendering or platform dependencies

pub mod block;
pub mod camera;
pub mod collision;
pub mod particles;
pub mod player;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use block::{BlockArena, BlockId, BlockState, BlockTransition, DraggableBlock, PointerInput};
pub use camera::Camera;
pub use collision::{Aabb, AxisHit};
pub use particles::{Particle, ParticleBurst, ParticleSystem};
pub use player::{Ghost, Player, PlayerEffects, PlayerState};
pub use state::{GameEvent, World};
pub use tick::{FixedTimestep, TickInput, run_frame, tick};
pub use tilemap::{TileKind, TileMap};
