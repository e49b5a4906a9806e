//! World state and core simulation types
//!
//! Everything one simulation stream owns lives here: the tile grid, the
//! block arena, the player, the camera, particles and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::block::{BlockArena, BlockId, DraggableBlock};
use super::camera::Camera;
use super::particles::ParticleSystem;
use super::player::Player;
use super::tilemap::{TileKind, TileMap};
use crate::settings::Settings;
use crate::tuning::{CameraTuning, PlayerTuning};

/// Things that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    WallJumped,
    /// Downward speed at the moment of impact
    Landed { impact_speed: f32 },
    DashStarted,
    DashEnded,
    CheckpointReached { spawn: Vec2 },
    Killed,
    Respawned,
    LevelEndReached,
    BlockGrabbed(BlockId),
    BlockReleased(BlockId),
    BlockReturned(BlockId),
}

/// Complete simulation state for one level
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tilemap: TileMap,
    pub blocks: BlockArena,
    pub player: Player,
    pub camera: Camera,
    pub particles: ParticleSystem,
    pub player_tuning: PlayerTuning,
    pub camera_tuning: CameraTuning,
    pub settings: Settings,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Interact was held on the previous tick (for the press edge)
    pub(crate) interact_was_held: bool,
}

impl World {
    /// Create a world around an existing grid with default tuning
    pub fn new(tilemap: TileMap, seed: u64) -> Self {
        Self::with_tuning(
            tilemap,
            seed,
            PlayerTuning::default(),
            CameraTuning::default(),
            Settings::default(),
        )
    }

    pub fn with_tuning(
        tilemap: TileMap,
        seed: u64,
        player_tuning: PlayerTuning,
        camera_tuning: CameraTuning,
        settings: Settings,
    ) -> Self {
        let spawn = Self::level_spawn(&tilemap, player_tuning.size);
        let player = Player::new(spawn, &player_tuning);
        let mut camera = Camera::new(&camera_tuning);
        camera.snap_to(player.center(), camera_tuning.room_size);

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tilemap,
            blocks: BlockArena::new(),
            player,
            camera,
            particles: ParticleSystem::new(settings.max_particles()),
            player_tuning,
            camera_tuning,
            settings,
            time_ticks: 0,
            events: Vec::new(),
            interact_was_held: false,
        }
    }

    /// Start position: the first `PlayerSpawn` cell, else one tile in from the origin
    pub fn level_spawn(tilemap: &TileMap, size: Vec2) -> Vec2 {
        let cell = tilemap
            .find_first(TileKind::PlayerSpawn)
            .unwrap_or(glam::IVec2::ONE);
        Player::cell_spawn(cell.x, cell.y, size)
    }

    pub fn add_block(&mut self, pos: Vec2, size: Vec2) -> BlockId {
        self.blocks.insert(DraggableBlock::new(pos, size))
    }

    /// Swap in new preferences; particle cap follows immediately
    pub fn apply_settings(&mut self, settings: Settings) {
        self.particles.set_max_particles(settings.max_particles());
        self.settings = settings;
    }

    /// Put the player back at the level start and reset transient state
    pub fn restart(&mut self) {
        let spawn = Self::level_spawn(&self.tilemap, self.player_tuning.size);
        self.player = Player::new(spawn, &self.player_tuning);
        self.particles.clear();
        self.events.clear();
        self.camera = Camera::new(&self.camera_tuning);
        self.camera
            .snap_to(self.player.center(), self.camera_tuning.room_size);
        log::info!("world restarted at {:?}", spawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TILE_SIZE;

    #[test]
    fn test_spawn_uses_player_spawn_tile() {
        let mut map = TileMap::new(20, 20);
        map.set_tile(4, 7, TileKind::PlayerSpawn);
        let world = World::new(map, 1);
        let size = world.player_tuning.size;
        assert_eq!(world.player.pos, Player::cell_spawn(4, 7, size));
        assert_eq!(world.player.spawn, world.player.pos);
    }

    #[test]
    fn test_spawn_defaults_inside_border() {
        let world = World::new(TileMap::new(20, 20), 1);
        assert!(world.player.pos.x > 0.0 && world.player.pos.x < 2.0 * TILE_SIZE);
    }

    #[test]
    fn test_camera_starts_framed() {
        let world = World::new(TileMap::new(64, 64), 1);
        let room = world.camera_tuning.room_size;
        assert_eq!(world.camera.position, room * 0.5);
    }

    #[test]
    fn test_restart_returns_to_level_start() {
        let mut map = TileMap::new(40, 20);
        map.set_tile(2, 2, TileKind::PlayerSpawn);
        let mut world = World::new(map, 1);
        let start = world.player.pos;

        world.player.pos = Vec2::new(1400.0, 300.0);
        world.player.spawn = world.player.pos;
        world.camera.snap_to(world.player.center(), world.camera_tuning.room_size);
        world.restart();

        assert_eq!(world.player.pos, start);
        assert_eq!(world.player.spawn, start);
        assert_eq!(world.camera.position, world.camera_tuning.room_size * 0.5);
    }

    #[test]
    fn test_disabling_particles_caps_at_zero() {
        let mut world = World::new(TileMap::new(8, 8), 1);
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        world.apply_settings(settings);
        let burst_origin = Vec2::ZERO;
        let mut rng = world.rng.clone();
        world
            .particles
            .spawn(&mut rng, burst_origin, 10, Vec2::ZERO, 1.0, [1.0; 4]);
        assert!(world.particles.is_empty());
    }
}
