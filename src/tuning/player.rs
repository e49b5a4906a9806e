use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Gameplay tuning for the player controller.
///
/// All speeds are world units per tick; the simulation runs at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Collision box extents.
    pub size: Vec2,

    /// Horizontal speed while input is held.
    pub move_speed: f32,

    /// Upward velocity applied on a grounded jump.
    pub jump_power: f32,

    /// Downward acceleration per tick.
    pub gravity: f32,

    /// Terminal downward velocity.
    pub max_fall_speed: f32,

    /// Horizontal velocity multiplier per tick without input, on the ground.
    pub ground_friction: f32,

    /// Horizontal velocity multiplier per tick without input, in the air.
    pub air_friction: f32,

    /// Downward velocity cap while sliding on a wall.
    pub wall_slide_speed: f32,

    /// Impulse away from the wall (x) and upward (y) on a wall jump.
    pub wall_jump_force: Vec2,

    /// Horizontal speed for the duration of a dash.
    pub dash_speed: f32,

    /// Landing speed above which a camera shake is requested.
    pub landing_shake_threshold: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(30.0, 36.0),
            move_speed: 5.0,
            jump_power: 12.0,
            gravity: 0.6,
            max_fall_speed: 15.0,
            ground_friction: 0.8,
            air_friction: 0.95,
            wall_slide_speed: 2.0,
            wall_jump_force: Vec2::new(8.0, 11.0),
            dash_speed: 15.0,
            landing_shake_threshold: 5.0,
        }
    }
}
