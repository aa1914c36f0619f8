//! Hash-based value noise
//!
//! Mirrors the WGSL implementation in `ink_shader.wgsl` so the CPU and GPU
//! renderers draw the same edges (up to float precision of `sin`).

use glam::Vec2;

/// Pseudo-random value in [0, 1) for a lattice point
#[inline]
pub fn hash(p: Vec2) -> f32 {
    let x = p.dot(Vec2::new(12.9898, 78.233)).sin() * 43758.5453;
    x - x.floor()
}

/// Value noise with smoothstep interpolation between lattice points
pub fn smooth_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let f = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(i);
    let b = hash(i + Vec2::new(1.0, 0.0));
    let c = hash(i + Vec2::new(0.0, 1.0));
    let d = hash(i + Vec2::new(1.0, 1.0));

    let top = a + (b - a) * f.x;
    let bottom = c + (d - c) * f.x;
    top + (bottom - top) * f.y
}

/// Octaves summed by [`fbm`]
pub const FBM_OCTAVES: usize = 3;

/// Fractal Brownian motion, range [0, 0.875]
pub fn fbm(mut p: Vec2) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    for _ in 0..FBM_OCTAVES {
        value += amplitude * smooth_noise(p);
        p *= 2.0;
        amplitude *= 0.5;
    }
    value
}
