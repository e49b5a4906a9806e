use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Camera framing and smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Fraction of the remaining distance to the room target covered per tick.
    pub smooth_speed: f32,

    /// World-to-screen scale.
    pub zoom: f32,

    /// Size of one room in world units; the camera frames whole rooms.
    pub room_size: Vec2,

    /// Screen size in pixels.
    pub viewport: Vec2,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            smooth_speed: 0.1,
            zoom: 1.0,
            room_size: Vec2::new(1280.0, 720.0),
            viewport: Vec2::new(1280.0, 720.0),
        }
    }
}
