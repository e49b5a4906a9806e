//! Player controller
//!
//! One call to [`Player::update`] is one tick, evaluated in a fixed order:
//! per-state input handling, gravity, horizontal move + resolve, vertical
//! move + resolve, special tiles, state re-derivation, visual decay.
//! Effects the player cannot apply itself (particles, camera shake, events)
//! are returned in [`PlayerEffects`] for the tick to dispatch.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockArena;
use super::collision::{
    Aabb, first_overlap, has_support, resolve_block_x, resolve_block_y, resolve_tiles_x,
    resolve_tiles_y, touches_wall,
};
use super::particles::{ParticleBurst, colors};
use super::state::GameEvent;
use super::tick::TickInput;
use super::tilemap::{TileKind, TileMap};
use crate::consts::*;
use crate::tuning::PlayerTuning;
use crate::world_to_cell;

/// Movement state; only `Dashing` carries data of its own
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
    WallSlide,
    Dashing {
        direction: Vec2,
        ticks_left: u32,
        /// Ticks until the next ghost sample
        ghost_ticks: u32,
    },
}

impl PlayerState {
    pub fn is_dashing(&self) -> bool {
        matches!(self, PlayerState::Dashing { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlayerState::Idle => "Idle",
            PlayerState::Run => "Run",
            PlayerState::Jump => "Jump",
            PlayerState::Fall => "Fall",
            PlayerState::WallSlide => "WallSlide",
            PlayerState::Dashing { .. } => "Dashing",
        }
    }
}

/// Past dash position, rendered with fading alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    pub pos: Vec2,
    pub alpha: f32,
    pub ticks_left: u32,
}

/// Camera shake request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeRequest {
    pub intensity: f32,
    pub duration_ticks: u32,
}

/// Side effects produced by one player tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerEffects {
    pub events: Vec<GameEvent>,
    pub bursts: Vec<ParticleBurst>,
    pub shake: Option<ShakeRequest>,
}

impl PlayerEffects {
    fn request_shake(&mut self, intensity: f32, duration_ticks: u32) {
        let stronger = self.shake.is_none_or(|s| intensity > s.intensity);
        if stronger {
            self.shake = Some(ShakeRequest {
                intensity,
                duration_ticks,
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the collision box
    pub pos: Vec2,
    pub size: Vec2,
    /// World units per tick
    pub vel: Vec2,
    pub state: PlayerState,
    /// -1.0 (left) or 1.0 (right)
    pub facing: f32,
    /// Respawn point; moved only by checkpoints
    pub spawn: Vec2,
    pub can_dash: bool,
    /// Ticks during which input does not override horizontal velocity
    pub wall_jump_lock: u32,
    /// Landed on something during the last vertical resolve
    pub grounded: bool,
    /// Squish/stretch applied when drawing
    pub render_scale: Vec2,
    pub ghosts: VecDeque<Ghost>,
    /// Standing in a level-end cell (so the event fires once per contact)
    #[serde(default)]
    in_level_end: bool,
}

impl Player {
    pub fn new(spawn: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            pos: spawn,
            size: tuning.size,
            vel: Vec2::ZERO,
            state: PlayerState::Idle,
            facing: 1.0,
            spawn,
            can_dash: true,
            wall_jump_lock: 0,
            grounded: false,
            render_scale: Vec2::ONE,
            ghosts: VecDeque::new(),
            in_level_end: false,
        }
    }

    /// Position that centers a player of `size` inside cell (x, y)
    pub fn cell_spawn(x: i32, y: i32, size: Vec2) -> Vec2 {
        Vec2::new(x as f32, y as f32) * TILE_SIZE + (Vec2::splat(TILE_SIZE) - size) * 0.5
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    fn feet(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x * 0.5, self.pos.y + self.size.y)
    }

    pub fn is_dashing(&self) -> bool {
        self.state.is_dashing()
    }

    /// Advance one tick
    pub fn update(
        &mut self,
        tuning: &PlayerTuning,
        map: &TileMap,
        blocks: &BlockArena,
        input: &TickInput,
    ) -> PlayerEffects {
        let mut fx = PlayerEffects::default();
        let solids = blocks.solid_bounds();
        let axis = input.axis();
        let began_dashing = self.is_dashing();

        let state = self.state;
        match state {
            PlayerState::Dashing { .. } => {}
            PlayerState::WallSlide => self.update_wall_slide(tuning, map, &solids, input, axis, &mut fx),
            _ => self.update_standard(tuning, input, axis, &mut fx),
        }
        if self.is_dashing() {
            self.update_dash(tuning, &mut fx);
        }

        // A tick that starts or ends a dash is gravity-free
        if !(began_dashing || self.is_dashing()) {
            self.vel.y = (self.vel.y + tuning.gravity).min(tuning.max_fall_speed);
        }

        self.move_x(map, &solids);
        self.move_y(tuning, map, &solids, &mut fx);

        if self.touch_special_tiles(map, &mut fx) {
            self.relax_visuals();
            return fx;
        }

        if !self.is_dashing() {
            self.derive_state(map, &solids, axis);
        }

        self.relax_visuals();
        fx
    }

    /// Idle / Run / Jump / Fall
    fn update_standard(
        &mut self,
        tuning: &PlayerTuning,
        input: &TickInput,
        axis: f32,
        fx: &mut PlayerEffects,
    ) {
        if self.wall_jump_lock > 0 {
            self.wall_jump_lock -= 1;
        } else if axis != 0.0 {
            self.vel.x = axis * tuning.move_speed;
            self.facing = axis;
        } else {
            let friction = if self.grounded {
                tuning.ground_friction
            } else {
                tuning.air_friction
            };
            self.vel.x *= friction;
            if self.vel.x.abs() < VELOCITY_EPSILON {
                self.vel.x = 0.0;
            }
        }

        if input.jump_pressed && self.grounded {
            self.vel.y = -tuning.jump_power;
            self.grounded = false;
            self.render_scale = Vec2::new(0.7, 1.3);
            fx.bursts.push(ParticleBurst {
                origin: self.feet(),
                count: 6,
                bias: Vec2::new(0.0, -0.5),
                spread: 0.5,
                color: colors::DUST,
            });
            fx.events.push(GameEvent::Jumped);
        }

        // Releasing jump early cuts the rise short
        if !input.jump_held && self.vel.y < 0.0 {
            self.vel.y *= 0.5;
        }

        if self.grounded {
            self.can_dash = true;
        }
        if input.dash_pressed && self.can_dash {
            self.start_dash(axis, fx);
        }
    }

    fn update_wall_slide(
        &mut self,
        tuning: &PlayerTuning,
        map: &TileMap,
        solids: &[Aabb],
        input: &TickInput,
        axis: f32,
        fx: &mut PlayerEffects,
    ) {
        self.vel.y = self.vel.y.min(tuning.wall_slide_speed);

        // Input pointing away from the wall is not applied here; state
        // re-derivation drops to Fall and the next tick's standard movement
        // carries the push.

        if input.jump_pressed {
            let bounds = self.bounds();
            let left = touches_wall(map, solids, &bounds, -1.0);
            let right = touches_wall(map, solids, &bounds, 1.0);
            if left || right {
                let away = if left { 1.0 } else { -1.0 };
                self.vel = Vec2::new(
                    away * tuning.wall_jump_force.x,
                    -tuning.wall_jump_force.y,
                );
                self.facing = away;
                self.wall_jump_lock = WALL_JUMP_LOCK_TICKS;
                self.state = PlayerState::Jump;
                self.render_scale = Vec2::new(0.7, 1.3);
                let wall_x = if left { bounds.left() } else { bounds.right() };
                fx.bursts.push(ParticleBurst {
                    origin: Vec2::new(wall_x, bounds.center().y),
                    count: 6,
                    bias: Vec2::new(away, 0.0),
                    spread: 0.5,
                    color: colors::DUST,
                });
                fx.events.push(GameEvent::WallJumped);
                log::debug!("wall jump away={}", away);
            }
        }

        if input.dash_pressed && self.can_dash {
            self.start_dash(axis, fx);
        }
    }

    fn start_dash(&mut self, axis: f32, fx: &mut PlayerEffects) {
        let dir = if axis != 0.0 { axis } else { self.facing };
        self.facing = dir;
        self.can_dash = false;
        self.state = PlayerState::Dashing {
            direction: Vec2::new(dir, 0.0),
            ticks_left: DASH_TICKS,
            ghost_ticks: 0,
        };
        fx.bursts.push(ParticleBurst {
            origin: self.center(),
            count: 5,
            bias: Vec2::new(-dir, 0.0),
            spread: 0.4,
            color: colors::SPARK,
        });
        fx.events.push(GameEvent::DashStarted);
        log::debug!("dash start dir={}", dir);
    }

    fn update_dash(&mut self, tuning: &PlayerTuning, fx: &mut PlayerEffects) {
        let PlayerState::Dashing {
            direction,
            ticks_left,
            ghost_ticks,
        } = self.state
        else {
            return;
        };

        self.vel = direction * tuning.dash_speed;

        let mut ghost_ticks = ghost_ticks;
        if ghost_ticks == 0 {
            self.ghosts.push_back(Ghost {
                pos: self.pos,
                alpha: GHOST_ALPHA,
                ticks_left: GHOST_LIFETIME_TICKS,
            });
            ghost_ticks = GHOST_INTERVAL_TICKS;
        }
        ghost_ticks -= 1;

        let ticks_left = ticks_left.saturating_sub(1);
        if ticks_left == 0 {
            // Keep some momentum out of the dash
            self.vel = direction * tuning.move_speed;
            self.state = PlayerState::Fall;
            fx.events.push(GameEvent::DashEnded);
            log::debug!("dash end vel={:?}", self.vel);
        } else {
            self.state = PlayerState::Dashing {
                direction,
                ticks_left,
                ghost_ticks,
            };
        }
    }

    fn move_x(&mut self, map: &TileMap, solids: &[Aabb]) {
        let dx = self.vel.x;
        self.pos.x += dx;

        if let Some(hit) = resolve_tiles_x(map, &self.bounds(), dx) {
            self.pos.x = hit.snapped;
            self.vel.x = 0.0;
        }
        let bounds = self.bounds();
        if let Some(hit) = first_overlap(&bounds, solids).and_then(|b| resolve_block_x(&bounds, b, dx)) {
            self.pos.x = hit.snapped;
            self.vel.x = 0.0;
        }
    }

    fn move_y(&mut self, tuning: &PlayerTuning, map: &TileMap, solids: &[Aabb], fx: &mut PlayerEffects) {
        let dy = self.vel.y;
        if dy == 0.0 {
            // Dash ticks have no vertical motion; stay grounded only while
            // something is still underfoot
            self.grounded = self.grounded && has_support(map, solids, &self.bounds());
            return;
        }
        let was_grounded = self.grounded;
        self.pos.y += dy;

        let mut landed = false;
        if let Some(hit) = resolve_tiles_y(map, &self.bounds(), dy) {
            self.pos.y = hit.snapped;
            self.vel.y = 0.0;
            landed = dy > 0.0;
        }
        let bounds = self.bounds();
        if let Some(hit) = first_overlap(&bounds, solids).and_then(|b| resolve_block_y(&bounds, b, dy)) {
            self.pos.y = hit.snapped;
            self.vel.y = 0.0;
            landed |= dy > 0.0;
        }
        self.grounded = landed;

        if landed && !was_grounded {
            self.render_scale = Vec2::new(1.3, 0.7);
            fx.bursts.push(ParticleBurst {
                origin: self.feet(),
                count: 8,
                bias: Vec2::new(0.0, -0.3),
                spread: 0.6,
                color: colors::DUST,
            });
            fx.events.push(GameEvent::Landed { impact_speed: dy });
            if dy > tuning.landing_shake_threshold {
                fx.request_shake((dy * 0.6).min(10.0), secs_to_ticks(0.2));
            }
        }
    }

    /// Returns true when the player was sent back to spawn
    fn touch_special_tiles(&mut self, map: &TileMap, fx: &mut PlayerEffects) -> bool {
        let center = self.center();
        let tile = map.get_tile_at_world(center);
        if tile != TileKind::LevelEnd {
            self.in_level_end = false;
        }

        match tile {
            TileKind::Checkpoint => {
                let cell = world_to_cell(center);
                let spawn = Self::cell_spawn(cell.x, cell.y, self.size);
                if spawn != self.spawn {
                    self.spawn = spawn;
                    fx.events.push(GameEvent::CheckpointReached { spawn });
                    log::info!("checkpoint reached at cell ({}, {})", cell.x, cell.y);
                }
                false
            }
            TileKind::KillBlock => {
                fx.events.push(GameEvent::Killed);
                self.respawn(fx);
                true
            }
            TileKind::LevelEnd => {
                if !self.in_level_end {
                    self.in_level_end = true;
                    fx.events.push(GameEvent::LevelEndReached);
                    log::info!("level end reached");
                }
                false
            }
            _ => false,
        }
    }

    fn derive_state(&mut self, map: &TileMap, solids: &[Aabb], axis: f32) {
        let next = if self.grounded {
            if axis != 0.0 { PlayerState::Run } else { PlayerState::Idle }
        } else if self.vel.y < 0.0 {
            PlayerState::Jump
        } else if self.vel.y > 0.0 {
            let bounds = self.bounds();
            let left = touches_wall(map, solids, &bounds, -1.0);
            let right = touches_wall(map, solids, &bounds, 1.0);
            if left || right {
                let away = if left { 1.0 } else { -1.0 };
                if self.state == PlayerState::WallSlide && axis == away {
                    PlayerState::Fall
                } else {
                    self.facing = away;
                    PlayerState::WallSlide
                }
            } else {
                PlayerState::Fall
            }
        } else {
            PlayerState::Fall
        };
        self.state = next;
    }

    fn relax_visuals(&mut self) {
        self.render_scale = self.render_scale.lerp(Vec2::ONE, SQUISH_RELAX);
        for ghost in self.ghosts.iter_mut() {
            ghost.ticks_left = ghost.ticks_left.saturating_sub(1);
            ghost.alpha = GHOST_ALPHA * ghost.ticks_left as f32 / GHOST_LIFETIME_TICKS as f32;
        }
        self.ghosts.retain(|g| g.ticks_left > 0);
    }

    /// Back to the last spawn point, at rest
    pub fn respawn(&mut self, fx: &mut PlayerEffects) {
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
        self.state = PlayerState::Idle;
        self.render_scale = Vec2::new(0.6, 1.4);
        fx.bursts.push(ParticleBurst {
            origin: self.center(),
            count: 10,
            bias: Vec2::ZERO,
            spread: 0.8,
            color: colors::RESPAWN,
        });
        fx.events.push(GameEvent::Respawned);
        log::debug!("respawn at {:?}", self.spawn);
    }
}
