//! Ink Splash - procedural ink splash background animation
//!
//! Core modules:
//! - `sim`: Splash registry, seeded spawner and spawn timer
//! - `field`: Pure per-sample field math (SDF, noise, smooth-min blend, shading)
//! - `engine`: Idle/Running render loop over a `FrameSink`
//! - `renderer`: WebGPU pipeline, CPU rasterizer, uniform marshaling
//! - `platform`: Host clock and browser/headless hosts
//! - `config`: Tunable constants as a loadable config

pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::InkConfig;
pub use engine::{Engine, FrameSink};
pub use error::{ConfigError, MountError, PresentError};

use glam::Vec2;

/// Animation configuration constants
pub mod consts {
    /// Registry capacity (also the size of the uniform splash array)
    pub const MAX_SPLASHES: usize = 20;
    /// Seconds between spawns
    pub const SPAWN_INTERVAL_SECS: f32 = 3.0;
    /// Splashes older than this are pruned
    pub const MAX_AGE_SECS: f32 = 30.0;

    /// Spawn parameter ranges
    pub const MIN_RADIUS: f32 = 0.05;
    pub const MAX_RADIUS: f32 = 0.25;
    pub const MIN_VISCOSITY: f32 = 0.3; // higher = thicker
    pub const MAX_VISCOSITY: f32 = 1.5;
    pub const MIN_WOBBLE: f32 = 0.05;
    pub const MAX_WOBBLE: f32 = 0.2;
    pub const MIN_SPREAD_SPEED: f32 = 0.02;
    pub const MAX_SPREAD_SPEED: f32 = 0.08;

    /// Spawn origin ranges (normalized, y up). Splashes start near the top.
    pub const ORIGIN_X: (f32, f32) = (0.1, 0.9);
    pub const ORIGIN_Y: (f32, f32) = (0.7, 1.0);
    /// Upper bound of each noise seed component
    pub const NOISE_SEED_RANGE: f32 = 1000.0;

    /// Downward drift per second of age (normalized units)
    pub const GRAVITY_STRENGTH: f32 = 0.15;
    /// Specular highlight weight
    pub const REFLECTION_INTENSITY: f32 = 0.5;
    /// Edge wobble gain applied to the fbm perturbation
    pub const NOISE_SCALE: f32 = 0.3;

    /// Smooth-min blend radius
    pub const BLEND_SMOOTHING: f32 = 0.12;
    /// Splashes closer than this (signed distance) contribute color
    pub const COLOR_INFLUENCE: f32 = 0.3;
    /// Antialiased edge width of the ink mask
    pub const EDGE_WIDTH: f32 = 0.02;
    /// Forward-difference step for normals
    pub const NORMAL_EPSILON: f32 = 0.002;
    /// Distance reported for splashes that are not born yet
    pub const UNBORN_DISTANCE: f32 = 1000.0;

    /// Neutral off-white paper
    pub const BACKGROUND: [f32; 3] = [0.96, 0.95, 0.93];

    /// Device pixel ratio cap for the backing surface
    pub const MAX_PIXEL_RATIO: f64 = 2.0;
}

/// Hermite smoothstep, matching the shading language builtin
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Convert normalized (0..1) coordinates to aspect-corrected screen space
///
/// Screen space spans -1..1 vertically and -aspect..aspect horizontally.
#[inline]
pub fn uv_to_screen(uv: Vec2, aspect: f32) -> Vec2 {
    let p = (uv - 0.5) * 2.0;
    Vec2::new(p.x * aspect, p.y)
}
