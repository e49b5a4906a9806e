//! Room-framing camera with screen shake
//!
//! The camera targets the center of the room the focus point is in and glides
//! there with one exponential lerp step per tick. Shake is a transient offset
//! that only enters the view transform; it is never written into `position`.

use glam::{Mat4, Vec2, Vec3};
use rand::Rng;

use crate::tuning::CameraTuning;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Smoothed world position at the screen center
    pub position: Vec2,
    /// Room center derived on the last update
    pub target: Vec2,
    pub zoom: f32,
    pub smooth_speed: f32,
    /// Screen size in pixels
    pub viewport: Vec2,
    shake_ticks: u32,
    shake_intensity: f32,
    shake_offset: Vec2,
}

impl Camera {
    pub fn new(tuning: &CameraTuning) -> Self {
        Self {
            position: Vec2::ZERO,
            target: Vec2::ZERO,
            zoom: tuning.zoom,
            smooth_speed: tuning.smooth_speed,
            viewport: tuning.viewport,
            shake_ticks: 0,
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
        }
    }

    /// Center of the room containing `focus`
    pub fn room_center(focus: Vec2, room_size: Vec2) -> Vec2 {
        (focus / room_size).floor() * room_size + room_size * 0.5
    }

    /// Jump straight to the room containing `focus` (level load, respawn)
    pub fn snap_to(&mut self, focus: Vec2, room_size: Vec2) {
        self.target = Self::room_center(focus, room_size);
        self.position = self.target;
    }

    /// Retarget and take one smoothing step; also advances the shake
    pub fn update<R: Rng + ?Sized>(&mut self, focus: Vec2, room_size: Vec2, rng: &mut R) {
        self.target = Self::room_center(focus, room_size);
        self.position = self.position.lerp(self.target, self.smooth_speed);

        if self.shake_ticks > 0 {
            self.shake_ticks -= 1;
            let i = self.shake_intensity;
            self.shake_offset = Vec2::new(rng.random_range(-i..=i), rng.random_range(-i..=i));
        } else {
            self.shake_intensity = 0.0;
            self.shake_offset = Vec2::ZERO;
        }
    }

    /// Arm a shake countdown. A running shake is only replaced, as a whole,
    /// by a stronger request (or an equally strong, longer one).
    pub fn shake(&mut self, intensity: f32, duration_ticks: u32) {
        if !intensity.is_finite() {
            return;
        }
        let intensity = intensity.max(0.0);
        let stronger = !self.is_shaking()
            || intensity > self.shake_intensity
            || (intensity == self.shake_intensity && duration_ticks > self.shake_ticks);
        if stronger {
            self.shake_intensity = intensity;
            self.shake_ticks = duration_ticks;
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_ticks > 0
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    /// Position including this tick's shake
    pub fn shaken_position(&self) -> Vec2 {
        self.position + self.shake_offset
    }

    /// World -> screen: translate by `-(position + shake)`, scale by zoom,
    /// then re-center on the viewport
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.shaken_position();
        Mat4::from_translation((self.viewport * 0.5).extend(0.0))
            * Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation((-eye).extend(0.0))
    }

    /// Forward projection matching [`Camera::view_matrix`]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.shaken_position()) * self.zoom + self.viewport * 0.5
    }

    /// Exact inverse of [`Camera::world_to_screen`]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.viewport * 0.5) / self.zoom + self.shaken_position()
    }

    /// World-space rectangle currently on screen (min, max)
    pub fn visible_world_rect(&self) -> (Vec2, Vec2) {
        let half = self.viewport * 0.5 / self.zoom;
        let center = self.shaken_position();
        (center - half, center + half)
    }
}
