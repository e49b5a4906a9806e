//! Cosmetic particle bursts
//!
//! Particles never feed back into gameplay. They draw from the world's seeded
//! RNG so that a replay spawns the same sparks, but dropping them entirely
//! leaves the simulation unchanged.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{PARTICLE_GRAVITY, PARTICLE_LIFETIME, SIM_DT};

/// Default cap on live particles
pub const MAX_PARTICLES: usize = 512;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub size: f32,
    pub color: [f32; 4],
}

impl Particle {
    /// Remaining life in [0, 1], used as render alpha
    pub fn life_fraction(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            0.0
        } else {
            (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
        }
    }
}

/// A burst request produced by gameplay and dispatched by the tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBurst {
    pub origin: Vec2,
    pub count: u32,
    /// Added to every particle's random velocity
    pub bias: Vec2,
    /// Scales the random speed
    pub spread: f32,
    pub color: [f32; 4],
}

/// Burst palettes
pub mod colors {
    pub const DUST: [f32; 4] = [0.85, 0.8, 0.7, 1.0];
    pub const SPARK: [f32; 4] = [1.0, 0.85, 0.3, 1.0];
    pub const RESPAWN: [f32; 4] = [0.5, 0.8, 1.0, 1.0];
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(MAX_PARTICLES)
    }
}

impl ParticleSystem {
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: Vec::new(),
            max_particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn set_max_particles(&mut self, max_particles: usize) {
        self.max_particles = max_particles;
        self.particles.truncate(max_particles);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Emit `count` particles at `origin` with random direction and a speed
    /// in `[1, 4) * spread`; anything past the cap is dropped
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Vec2,
        count: u32,
        bias: Vec2,
        spread: f32,
        color: [f32; 4],
    ) {
        for _ in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(1.0..4.0) * spread;
            let size = rng.random_range(2.0..5.0);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * speed + bias,
                lifetime: PARTICLE_LIFETIME,
                max_lifetime: PARTICLE_LIFETIME,
                size,
                color,
            });
        }
    }

    pub fn spawn_burst<R: Rng + ?Sized>(&mut self, rng: &mut R, burst: &ParticleBurst) {
        self.spawn(
            rng,
            burst.origin,
            burst.count,
            burst.bias,
            burst.spread,
            burst.color,
        );
    }

    /// Integrate one tick and drop expired particles
    pub fn update(&mut self) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.vel.y += PARTICLE_GRAVITY;
            p.lifetime -= SIM_DT;
        }
        self.particles.retain(|p| p.lifetime > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut system = ParticleSystem::default();
        system.spawn(&mut rng, Vec2::new(10.0, 20.0), 50, Vec2::ZERO, 2.0, colors::DUST);

        assert_eq!(system.len(), 50);
        for p in system.particles() {
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
            assert!(p.size >= 2.0 && p.size < 5.0);
            let speed = p.vel.length();
            assert!(speed >= 2.0 - 1e-4 && speed < 8.0 + 1e-4);
            assert_eq!(p.lifetime, PARTICLE_LIFETIME);
        }
    }

    #[test]
    fn test_bias_is_added() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut system = ParticleSystem::default();
        // Zero spread leaves only the bias
        system.spawn(&mut rng, Vec2::ZERO, 3, Vec2::new(0.0, -2.0), 0.0, colors::SPARK);
        for p in system.particles() {
            assert!((p.vel - Vec2::new(0.0, -2.0)).length() < 1e-6);
        }
    }

    #[test]
    fn test_particles_expire_after_lifetime() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut system = ParticleSystem::default();
        system.spawn(&mut rng, Vec2::ZERO, 10, Vec2::ZERO, 1.0, colors::DUST);

        let ticks = (PARTICLE_LIFETIME / SIM_DT).round() as usize;
        for _ in 0..ticks - 2 {
            system.update();
        }
        assert_eq!(system.len(), 10);
        for _ in 0..4 {
            system.update();
        }
        assert!(system.is_empty());
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut system = ParticleSystem::default();
        system.spawn(&mut rng, Vec2::ZERO, 1, Vec2::ZERO, 0.0, colors::DUST);
        system.update();
        system.update();
        let p = &system.particles()[0];
        assert!((p.vel.y - 2.0 * PARTICLE_GRAVITY).abs() < 1e-6);
        assert!(p.pos.y > 0.0);
    }

    #[test]
    fn test_cap_drops_excess() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut system = ParticleSystem::new(5);
        system.spawn(&mut rng, Vec2::ZERO, 20, Vec2::ZERO, 1.0, colors::DUST);
        assert_eq!(system.len(), 5);
    }

    #[test]
    fn test_same_seed_same_particles() {
        let mut a = ParticleSystem::default();
        let mut b = ParticleSystem::default();
        a.spawn(&mut Pcg32::seed_from_u64(42), Vec2::ZERO, 8, Vec2::ZERO, 1.0, colors::DUST);
        b.spawn(&mut Pcg32::seed_from_u64(42), Vec2::ZERO, 8, Vec2::ZERO, 1.0, colors::DUST);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.vel, pb.vel);
            assert_eq!(pa.size, pb.size);
        }
    }
}
