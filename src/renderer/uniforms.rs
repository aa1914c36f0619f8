//! Uniform data shared with `ink_shader.wgsl`
//!
//! Layouts here must match the WGSL structs byte for byte. The splash array
//! is a fixed `MAX_SPLASHES` long and is filled from a registry of the same
//! capacity, so an over-long splash list cannot be marshaled at all.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::consts::MAX_SPLASHES;
use crate::field::FieldParams;
use crate::sim::{Blob, SplashRegistry};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub resolution: [f32; 2], // offset 0
    pub time: f32,            // offset 8
    pub aspect: f32,          // offset 12
    pub splash_count: u32,    // offset 16
    pub gravity: f32,         // offset 20
    pub noise_scale: f32,     // offset 24
    pub smoothing: f32,       // offset 28
    pub influence: f32,       // offset 32
    pub edge_width: f32,      // offset 36
    pub reflection: f32,      // offset 40
    pub _pad: f32,            // offset 44 - align background to 16 bytes
    pub background: [f32; 4], // offset 48
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SplashUniform {
    pub origin: [f32; 2],
    pub base_radius: f32,
    pub spread_speed: f32,
    pub viscosity: f32,
    pub wobble_strength: f32,
    pub birth_time: f32,
    pub _pad0: f32,
    pub color: [f32; 4], // rgb + unused
    pub noise_seed: [f32; 2],
    pub _pad1: [f32; 2], // pad to 64 bytes (uniform array stride)
}

impl From<&Blob> for SplashUniform {
    fn from(blob: &Blob) -> Self {
        Self {
            origin: blob.origin.to_array(),
            base_radius: blob.base_radius,
            spread_speed: blob.spread_speed,
            viscosity: blob.viscosity,
            wobble_strength: blob.wobble_strength,
            birth_time: blob.birth_time,
            _pad0: 0.0,
            color: blob.color.extend(1.0).to_array(),
            noise_seed: blob.noise_seed.to_array(),
            _pad1: [0.0; 2],
        }
    }
}

impl From<&SplashUniform> for Blob {
    fn from(u: &SplashUniform) -> Self {
        Self {
            origin: Vec2::from_array(u.origin),
            base_radius: u.base_radius,
            spread_speed: u.spread_speed,
            viscosity: u.viscosity,
            wobble_strength: u.wobble_strength,
            color: Vec3::new(u.color[0], u.color[1], u.color[2]),
            birth_time: u.birth_time,
            noise_seed: Vec2::from_array(u.noise_seed),
        }
    }
}

/// Everything one frame needs, by value
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    pub globals: Globals,
    pub splashes: [SplashUniform; MAX_SPLASHES],
}

impl FrameUniforms {
    /// Copy the live splash set and frame parameters into uniform form
    pub fn marshal(
        registry: &SplashRegistry<MAX_SPLASHES>,
        params: &FieldParams,
        resolution: (u32, u32),
    ) -> Self {
        let mut splashes = [SplashUniform::zeroed(); MAX_SPLASHES];
        let mut count = 0u32;
        for (slot, blob) in splashes.iter_mut().zip(registry.snapshot()) {
            *slot = SplashUniform::from(blob);
            count += 1;
        }

        let globals = Globals {
            resolution: [resolution.0 as f32, resolution.1 as f32],
            time: params.time,
            aspect: params.aspect,
            splash_count: count,
            gravity: params.gravity,
            noise_scale: params.noise_scale,
            smoothing: params.smoothing,
            influence: params.influence,
            edge_width: params.edge_width,
            reflection: params.reflection,
            _pad: 0.0,
            background: params.background.extend(1.0).to_array(),
        };

        Self { globals, splashes }
    }

    /// Field parameters as the shader sees them
    pub fn field_params(&self) -> FieldParams {
        let g = &self.globals;
        FieldParams {
            time: g.time,
            aspect: g.aspect,
            gravity: g.gravity,
            noise_scale: g.noise_scale,
            smoothing: g.smoothing,
            influence: g.influence,
            edge_width: g.edge_width,
            reflection: g.reflection,
            background: Vec3::new(g.background[0], g.background[1], g.background[2]),
        }
    }

    /// The live slots of the splash array
    pub fn live_splashes(&self) -> &[SplashUniform] {
        let count = (self.globals.splash_count as usize).min(MAX_SPLASHES);
        &self.splashes[..count]
    }

    /// Decode the live slots back into splashes (CPU rendering)
    pub fn blobs(&self) -> Vec<Blob> {
        self.live_splashes().iter().map(Blob::from).collect()
    }

    pub fn resolution(&self) -> (u32, u32) {
        (
            self.globals.resolution[0] as u32,
            self.globals.resolution[1] as u32,
        )
    }
}
