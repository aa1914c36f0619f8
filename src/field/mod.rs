//! Ink field evaluation
//!
//! Pure functions of (sample point, splash list, time). No state, no
//! randomness: the same inputs always produce the same color, so the field
//! can run per pixel on the GPU or in parallel on the CPU.
//!
//! Sample points are in aspect-corrected screen space: y in -1..1, x in
//! -aspect..aspect.

pub mod blend;
pub mod noise;
pub mod shade;
pub mod splash;

pub use blend::{FieldSample, evaluate, field_distance, smin};
pub use shade::{Shaded, ink_mask, shade, surface_normal};
pub use splash::{current_center, current_radius, sd_splash};

use glam::Vec3;

use crate::config::InkConfig;

/// Per-frame inputs shared by every sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    /// Seconds since mount
    pub time: f32,
    /// Viewport width / height
    pub aspect: f32,
    pub gravity: f32,
    pub noise_scale: f32,
    /// Smooth-min radius
    pub smoothing: f32,
    /// Color blend cutoff distance
    pub influence: f32,
    pub edge_width: f32,
    pub reflection: f32,
    pub background: Vec3,
}

impl FieldParams {
    pub fn new(config: &InkConfig, time: f32, aspect: f32) -> Self {
        Self {
            time,
            aspect,
            gravity: config.gravity_strength,
            noise_scale: config.noise_scale,
            smoothing: config.blend_smoothing,
            influence: config.color_influence,
            edge_width: config.edge_width,
            reflection: config.reflection_intensity,
            background: Vec3::from_array(config.background),
        }
    }

    /// Default tuning at the given time and aspect
    pub fn at(time: f32, aspect: f32) -> Self {
        Self::new(&InkConfig::default(), time, aspect)
    }
}
