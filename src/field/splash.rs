//! Per-splash signed distance
//!
//! Growth, gravity drift and edge wobble for a single splash. All derived
//! quantities are recomputed per sample from the splash's age.

use glam::Vec2;

use super::FieldParams;
use super::noise::fbm;
use crate::consts::UNBORN_DISTANCE;
use crate::sim::Blob;
use crate::{smoothstep, uv_to_screen};

/// Radius at `age` seconds: exponential saturation toward `base + spread`
#[inline]
pub fn current_radius(blob: &Blob, age: f32) -> f32 {
    blob.base_radius + blob.spread_speed * (1.0 - (-age * blob.viscosity).exp())
}

/// Center in normalized (0..1, y up) space at `age` seconds
///
/// Constant downward drift plus a slow noise-driven sideways sway.
pub fn current_center(blob: &Blob, age: f32, gravity: f32) -> Vec2 {
    let gravity_offset = Vec2::new(0.0, -gravity * age);
    let sway = (fbm(blob.noise_seed + Vec2::new(age * 0.1, 0.0)) - 0.5) * 0.1;
    blob.origin + gravity_offset + Vec2::new(sway, 0.0)
}

/// Signed distance from screen-space point `p` to the splash edge
///
/// Negative inside. Splashes that are not born yet report a large positive
/// distance so they never win a min.
pub fn sd_splash(p: Vec2, blob: &Blob, params: &FieldParams) -> f32 {
    let age = blob.age(params.time);
    if age < 0.0 {
        return UNBORN_DISTANCE;
    }

    let center = uv_to_screen(current_center(blob, age, params.gravity), params.aspect);
    let radius = current_radius(blob, age);

    let to_center = p - center;
    let mut dist = to_center.length();

    // Wobble only in a band around the nominal edge. Noise is sampled in
    // blob-local cartesian coordinates; angle-based sampling streaks.
    let edge = smoothstep(radius * 0.8, radius * 1.2, dist);
    if edge > 0.0 {
        let coord = to_center * 8.0 + Vec2::new(age * 0.3, age * 0.2) + blob.noise_seed;
        let wobble = fbm(coord) - 0.5;
        dist += wobble * blob.wobble_strength * radius * edge * params.noise_scale;
    }

    dist - radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PALETTE;
    use proptest::prelude::*;

    fn blob(base_radius: f32, spread_speed: f32, viscosity: f32) -> Blob {
        Blob {
            origin: Vec2::new(0.5, 0.5),
            base_radius,
            spread_speed,
            viscosity,
            wobble_strength: 0.1,
            color: PALETTE[2],
            birth_time: 0.0,
            noise_seed: Vec2::new(10.0, 20.0),
        }
    }

    #[test]
    fn test_radius_asymptote() {
        let b = blob(0.1, 0.05, 1.0);
        assert!((current_radius(&b, 0.0) - 0.1).abs() < 1e-6);
        assert!((current_radius(&b, 100.0) - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_unborn_is_far() {
        let mut b = blob(0.1, 0.05, 1.0);
        b.birth_time = 5.0;
        let params = FieldParams::at(1.0, 1.0);
        assert_eq!(sd_splash(Vec2::ZERO, &b, &params), UNBORN_DISTANCE);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let b = blob(0.1, 0.05, 1.0);
        let young = current_center(&b, 0.0, 0.15);
        let old = current_center(&b, 2.0, 0.15);
        assert!((young.y - old.y - 0.3).abs() < 1e-5);
        // Sideways sway stays within +-0.05
        assert!((old.x - b.origin.x).abs() <= 0.05);
    }

    #[test]
    fn test_center_inside_edge_outside() {
        let b = blob(0.2, 0.0, 1.0);
        let params = FieldParams::at(0.0, 1.0);
        // Center at uv (0.5 + sway, 0.5) maps near the screen origin
        let center = uv_to_screen(current_center(&b, 0.0, params.gravity), params.aspect);
        assert!((sd_splash(center, &b, &params) + 0.2).abs() < 1e-5);
        assert!(sd_splash(center + Vec2::new(1.0, 0.0), &b, &params) > 0.5);
    }

    proptest! {
        #[test]
        fn prop_radius_monotonic(
            base in 0.05f32..0.25,
            spread in 0.02f32..0.08,
            viscosity in 0.3f32..1.5,
            age in 0.0f32..100.0,
            step in 0.0f32..10.0,
        ) {
            let b = blob(base, spread, viscosity);
            let r0 = current_radius(&b, age);
            let r1 = current_radius(&b, age + step);
            prop_assert!(r1 >= r0);
            prop_assert!(r1 <= b.asymptotic_radius() + 1e-6);
        }
    }
}
