//! Ink splash descriptor
//!
//! A blob is created once by the spawner and never mutated. Everything that
//! changes over time (current radius, current center) is derived per sample
//! from `birth_time` in the field evaluator.

use glam::{Vec2, Vec3};

/// Curated vivid ink colors
pub const PALETTE: [Vec3; 8] = [
    Vec3::new(1.0, 0.0, 0.3),  // red
    Vec3::new(0.0, 0.7, 1.0),  // cyan
    Vec3::new(1.0, 0.0, 0.8),  // magenta
    Vec3::new(1.0, 0.85, 0.0), // yellow
    Vec3::new(0.2, 0.8, 0.2),  // green
    Vec3::new(0.5, 0.2, 1.0),  // purple
    Vec3::new(1.0, 0.4, 0.0),  // orange
    Vec3::new(0.0, 0.5, 1.0),  // blue
];

/// One ink splash
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    /// Spawn position, normalized 0..1 (y up)
    pub origin: Vec2,
    /// Radius at birth
    pub base_radius: f32,
    /// Growth added on top of `base_radius` as age goes to infinity
    pub spread_speed: f32,
    /// Rate at which growth saturates
    pub viscosity: f32,
    /// Edge noise amplitude
    pub wobble_strength: f32,
    pub color: Vec3,
    /// Seconds since mount
    pub birth_time: f32,
    /// Decorrelates this splash's noise from its neighbours
    pub noise_seed: Vec2,
}

impl Blob {
    /// Age in seconds at `time` (negative before birth)
    #[inline]
    pub fn age(&self, time: f32) -> f32 {
        time - self.birth_time
    }

    /// Size the splash approaches as it ages
    #[inline]
    pub fn asymptotic_radius(&self) -> f32 {
        self.base_radius + self.spread_speed
    }
}
