//! Fixed timestep simulation tick
//!
//! Advances one world by exactly one tick in a fixed order: debug respawn,
//! draggable blocks, player, effect dispatch, particles, camera.

use glam::Vec2;

use super::block::{BlockTransition, PointerInput};
use super::player::PlayerEffects;
use super::state::{GameEvent, World};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input intent for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Horizontal axis; only the sign is used
    pub movement: i8,
    /// Jump went down this tick
    pub jump_pressed: bool,
    /// Jump is held
    pub jump_held: bool,
    /// Dash went down this tick
    pub dash_pressed: bool,
    /// Interact (drag) is held
    pub interact_held: bool,
    /// Pointer in screen pixels
    pub cursor: Vec2,
    /// Send the player back to spawn (debug)
    pub force_respawn: bool,
}

impl TickInput {
    /// Horizontal axis as -1.0, 0.0 or 1.0
    pub fn axis(&self) -> f32 {
        self.movement.signum() as f32
    }

    /// Fold one frame of device input into the pending input: held levels
    /// and the cursor are replaced, presses latch until a tick consumes them
    pub fn latch(&mut self, frame: &TickInput) {
        self.movement = frame.movement;
        self.jump_held = frame.jump_held;
        self.interact_held = frame.interact_held;
        self.cursor = frame.cursor;
        self.jump_pressed |= frame.jump_pressed;
        self.dash_pressed |= frame.dash_pressed;
        self.force_respawn |= frame.force_respawn;
    }

    /// Drop rising-edge flags so a held frame input is not replayed
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.dash_pressed = false;
        self.force_respawn = false;
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    world.events.clear();
    world.time_ticks += 1;

    let mut fx = PlayerEffects::default();
    if input.force_respawn {
        world.player.respawn(&mut fx);
    }

    // Blocks read the pointer through last tick's camera
    let pointer = PointerInput {
        world_pos: world.camera.screen_to_world(input.cursor),
        pressed: input.interact_held && !world.interact_was_held,
        held: input.interact_held,
    };
    world.interact_was_held = input.interact_held;
    for (id, transition) in world.blocks.update(&pointer) {
        let event = match transition {
            BlockTransition::Grabbed => Some(GameEvent::BlockGrabbed(id)),
            BlockTransition::Released => Some(GameEvent::BlockReleased(id)),
            BlockTransition::Returned => Some(GameEvent::BlockReturned(id)),
            BlockTransition::StartedReturn => None,
        };
        fx.events.extend(event);
    }

    let player_fx = world.player.update(
        &world.player_tuning,
        &world.tilemap,
        &world.blocks,
        input,
    );
    fx.events.extend(player_fx.events);
    fx.bursts.extend(player_fx.bursts);
    fx.shake = fx.shake.or(player_fx.shake);

    if world.settings.particles {
        for burst in &fx.bursts {
            world.particles.spawn_burst(&mut world.rng, burst);
        }
    }
    if let Some(shake) = fx.shake {
        if world.settings.effective_screen_shake() {
            world.camera.shake(shake.intensity, shake.duration_ticks);
        }
    }
    world.events.extend(fx.events);

    world.particles.update();
    world.camera.update(
        world.player.center(),
        world.camera_tuning.room_size,
        &mut world.rng,
    );
}

/// Accumulates frame time and hands out whole ticks
#[derive(Debug, Clone, Default)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks to run for a frame of `frame_dt` seconds
    ///
    /// Long frames are clamped so a stall cannot spiral.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }
}

/// Run every tick owed for one frame
///
/// `input` is the host's persistent pending input. Edge flags fire on the
/// first tick that runs and are cleared only then, so a press made during a
/// frame that owes no tick carries over to the next one.
pub fn run_frame(world: &mut World, stepper: &mut FixedTimestep, input: &mut TickInput, frame_dt: f32) -> u32 {
    let steps = stepper.advance(frame_dt);
    let mut events = Vec::new();
    for _ in 0..steps {
        tick(world, input);
        events.append(&mut world.events);
        // Clear one-shot inputs after processing
        input.clear_edges();
    }
    world.events = events;
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BLOCK_RETURN_TICKS, BLOCK_WAIT_TICKS, TILE_SIZE};
    use crate::sim::block::BlockState;
    use crate::sim::player::PlayerState;
    use crate::sim::tilemap::{TileKind, TileMap};

    fn level() -> TileMap {
        let mut map = TileMap::new(64, 32);
        map.fill_border(TileKind::Wall);
        for x in 0..64 {
            map.set_tile(x, 15, TileKind::Wall);
        }
        map.set_tile(3, 14, TileKind::PlayerSpawn);
        map
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed and inputs stay identical
        let mut a = World::new(level(), 99999);
        let mut b = World::new(level(), 99999);

        let inputs = [
            TickInput {
                movement: 1,
                ..Default::default()
            },
            TickInput {
                movement: 1,
                jump_pressed: true,
                jump_held: true,
                ..Default::default()
            },
            TickInput {
                dash_pressed: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player, b.player);
        assert_eq!(a.camera, b.camera);
        assert_eq!(a.particles.len(), b.particles.len());
    }

    #[test]
    fn test_player_settles_on_spawn_floor() {
        let mut world = World::new(level(), 1);
        for _ in 0..60 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.player.state, PlayerState::Idle);
        assert_eq!(world.player.pos.y, 15.0 * TILE_SIZE - world.player.size.y);
    }

    #[test]
    fn test_block_cycle_through_world() {
        let mut world = World::new(level(), 1);
        let origin = Vec2::new(40.0 * TILE_SIZE, 14.0 * TILE_SIZE);
        let id = world.add_block(origin, Vec2::splat(TILE_SIZE));

        let block_center = origin + Vec2::splat(TILE_SIZE * 0.5);
        let cursor = world.camera.world_to_screen(block_center);

        let grab = TickInput {
            interact_held: true,
            cursor,
            ..Default::default()
        };
        tick(&mut world, &grab);
        assert!(world.events.contains(&GameEvent::BlockGrabbed(id)));
        let block = world.blocks.get(id).unwrap();
        assert_eq!(block.state, BlockState::Dragging);
        assert!(!block.is_solid());

        let release = TickInput {
            cursor,
            ..Default::default()
        };
        tick(&mut world, &release);
        assert!(world.events.contains(&GameEvent::BlockReleased(id)));
        assert!(world.blocks.get(id).unwrap().is_solid());

        for _ in 0..BLOCK_WAIT_TICKS {
            tick(&mut world, &release);
        }
        assert!(matches!(
            world.blocks.get(id).unwrap().state,
            BlockState::Returning { .. }
        ));
        assert!(!world.blocks.get(id).unwrap().is_solid());

        let mut returned = false;
        for _ in 0..BLOCK_RETURN_TICKS {
            tick(&mut world, &release);
            returned |= world.events.contains(&GameEvent::BlockReturned(id));
        }
        assert!(returned);
        let block = world.blocks.get(id).unwrap();
        assert_eq!(block.state, BlockState::Idle);
        assert_eq!(block.pos, origin);
        assert!(block.is_solid());
    }

    #[test]
    fn test_holding_interact_only_grabs_on_press() {
        let mut world = World::new(level(), 1);
        let origin = Vec2::new(40.0 * TILE_SIZE, 14.0 * TILE_SIZE);
        let id = world.add_block(origin, Vec2::splat(TILE_SIZE));

        // Held before the pointer reaches the block: no press edge over it
        let away = TickInput {
            interact_held: true,
            cursor: Vec2::ZERO,
            ..Default::default()
        };
        tick(&mut world, &away);
        let over = TickInput {
            interact_held: true,
            cursor: world
                .camera
                .world_to_screen(origin + Vec2::splat(TILE_SIZE * 0.5)),
            ..Default::default()
        };
        tick(&mut world, &over);
        assert_eq!(world.blocks.get(id).unwrap().state, BlockState::Idle);
    }

    #[test]
    fn test_camera_moves_to_next_room() {
        let mut world = World::new(level(), 1);
        let room = world.camera_tuning.room_size;
        assert_eq!(world.camera.position, room * 0.5);

        // Run right until the player crosses into the second room
        let run = TickInput {
            movement: 1,
            ..Default::default()
        };
        for _ in 0..400 {
            tick(&mut world, &run);
        }
        assert!(world.player.center().x > room.x);
        assert_eq!(world.camera.target, Vec2::new(room.x * 1.5, room.y * 0.5));
        assert!(world.camera.position.x > room.x * 0.5);
    }

    #[test]
    fn test_force_respawn() {
        let mut world = World::new(level(), 1);
        let spawn = world.player.spawn;
        let run = TickInput {
            movement: 1,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut world, &run);
        }
        assert_ne!(world.player.pos, spawn);

        let respawn = TickInput {
            force_respawn: true,
            ..Default::default()
        };
        tick(&mut world, &respawn);
        assert!(world.events.contains(&GameEvent::Respawned));
        assert!(world.player.pos.distance(spawn) < 1.0);
    }

    #[test]
    fn test_hard_landing_shakes_camera_unless_reduced_motion() {
        let mut map = TileMap::new(32, 32);
        map.fill_border(TileKind::Wall);
        map.set_tile(5, 1, TileKind::PlayerSpawn);

        let mut world = World::new(map.clone(), 1);
        let mut shook = false;
        for _ in 0..120 {
            tick(&mut world, &TickInput::default());
            shook |= world.camera.is_shaking();
        }
        assert!(shook);

        let mut calm = World::new(map, 1);
        calm.settings.reduced_motion = true;
        for _ in 0..120 {
            tick(&mut calm, &TickInput::default());
            assert!(!calm.camera.is_shaking());
        }
    }

    #[test]
    fn test_fixed_timestep_counts_ticks() {
        let mut stepper = FixedTimestep::new();
        assert_eq!(stepper.advance(SIM_DT * 0.5), 0);
        assert!((stepper.alpha() - 0.5).abs() < 1e-4);
        assert_eq!(stepper.advance(SIM_DT * 0.6), 1);
        // A long stall is clamped
        assert_eq!(stepper.advance(10.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_run_frame_fires_edges_once() {
        let mut world = World::new(level(), 1);
        for _ in 0..60 {
            tick(&mut world, &TickInput::default());
        }
        let mut stepper = FixedTimestep::new();
        let mut jump = TickInput {
            jump_pressed: true,
            jump_held: true,
            ..Default::default()
        };
        let steps = run_frame(&mut world, &mut stepper, &mut jump, SIM_DT * 3.0 + 0.001);
        assert_eq!(steps, 3);
        let jumps = world
            .events
            .iter()
            .filter(|e| **e == GameEvent::Jumped)
            .count();
        assert_eq!(jumps, 1);
        assert!(!jump.jump_pressed);
        assert!(jump.jump_held);
    }

    #[test]
    fn test_press_survives_frame_without_tick() {
        let mut world = World::new(level(), 1);
        for _ in 0..60 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.player.state, PlayerState::Idle);

        // 144 Hz display: most frames owe no tick
        let frame_dt = 1.0 / 144.0;
        let mut stepper = FixedTimestep::new();
        let mut pending = TickInput::default();
        pending.latch(&TickInput {
            jump_pressed: true,
            jump_held: true,
            ..Default::default()
        });
        let steps = run_frame(&mut world, &mut stepper, &mut pending, frame_dt);
        assert_eq!(steps, 0);
        assert!(pending.jump_pressed);

        let hold = TickInput {
            jump_held: true,
            ..Default::default()
        };
        let mut jumps = 0;
        for _ in 0..10 {
            pending.latch(&hold);
            run_frame(&mut world, &mut stepper, &mut pending, frame_dt);
            jumps += world
                .events
                .iter()
                .filter(|e| **e == GameEvent::Jumped)
                .count();
        }
        assert_eq!(jumps, 1);
        assert!(!pending.jump_pressed);
    }

    #[test]
    fn test_latch_keeps_presses_and_replaces_levels() {
        let mut pending = TickInput::default();
        pending.latch(&TickInput {
            movement: 1,
            dash_pressed: true,
            ..Default::default()
        });
        pending.latch(&TickInput {
            movement: -1,
            interact_held: true,
            cursor: Vec2::new(3.0, 4.0),
            ..Default::default()
        });
        assert_eq!(pending.movement, -1);
        assert!(pending.dash_pressed);
        assert!(pending.interact_held);
        assert_eq!(pending.cursor, Vec2::new(3.0, 4.0));

        pending.clear_edges();
        assert!(!pending.dash_pressed);
        assert_eq!(pending.movement, -1);
    }
}
