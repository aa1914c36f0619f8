//! Ink mask, surface normal and lighting
//!
//! Turns the blended field into a final color: a solid fill with a short
//! antialiased edge, a normal from the field gradient, and a diffuse +
//! Blinn-Phong highlight against a fixed light.

use glam::{Vec2, Vec3};

use super::FieldParams;
use super::blend::{evaluate, field_distance};
use crate::consts::NORMAL_EPSILON;
use crate::sim::Blob;
use crate::smoothstep;

/// Below this mask value the sample is pure background
const MASK_CUTOFF: f32 = 0.001;
const SPECULAR_POWER: f32 = 50.0;

/// Fixed light, up and to the left of the viewer
#[inline]
pub fn light_dir() -> Vec3 {
    Vec3::new(-0.3, 0.7, 1.0).normalize()
}

/// Opacity of ink for a blended distance
#[inline]
pub fn ink_mask(distance: f32, edge_width: f32) -> f32 {
    (1.0 - smoothstep(0.0, edge_width, distance)).clamp(0.0, 1.0)
}

/// Surface normal from forward differences of the blended field
pub fn surface_normal(p: Vec2, center_distance: f32, blobs: &[Blob], params: &FieldParams) -> Vec3 {
    let dx = field_distance(p + Vec2::new(NORMAL_EPSILON, 0.0), blobs, params);
    let dy = field_distance(p + Vec2::new(0.0, NORMAL_EPSILON), blobs, params);
    let grad = Vec2::new(dx - center_distance, dy - center_distance) / NORMAL_EPSILON;
    Vec3::new(grad.x, grad.y, 1.0).normalize()
}

/// Fully resolved sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shaded {
    pub distance: f32,
    pub mask: f32,
    pub color: Vec3,
}

/// Final color at screen-space point `p`
pub fn shade(p: Vec2, blobs: &[Blob], params: &FieldParams) -> Shaded {
    let background = params.background;
    let field = evaluate(p, blobs, params);
    let mask = ink_mask(field.distance, params.edge_width);

    if mask < MASK_CUTOFF {
        return Shaded {
            distance: field.distance,
            mask: 0.0,
            color: background,
        };
    }

    let normal = surface_normal(p, field.distance, blobs, params);
    let light = light_dir();
    let view = Vec3::Z;

    let diffuse = normal.dot(light).clamp(0.0, 1.0);
    let half = (light + view).normalize();
    let spec = normal.dot(half).max(0.0).powf(SPECULAR_POWER);

    // Flat per-splash base, no radial gradient
    let base = field.color * (0.8 + 0.2 * diffuse);
    let ink = (base + Vec3::ONE * spec * params.reflection) * mask;

    Shaded {
        distance: field.distance,
        mask,
        color: background.lerp(ink, mask),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::splash::current_center;
    use crate::sim::PALETTE;
    use crate::config::SpawnRanges;
    use crate::consts::MAX_SPLASHES;
    use crate::sim::Spawner;
    use crate::uv_to_screen;
    use proptest::prelude::*;

    fn big_blob() -> Blob {
        Blob {
            origin: Vec2::new(0.5, 0.5),
            base_radius: 0.4,
            spread_speed: 0.0,
            viscosity: 1.0,
            wobble_strength: 0.2,
            color: PALETTE[5],
            birth_time: 0.0,
            noise_seed: Vec2::new(100.0, 200.0),
        }
    }

    #[test]
    fn test_mask_edges() {
        assert_eq!(ink_mask(0.02, 0.02), 0.0);
        assert_eq!(ink_mask(0.5, 0.02), 0.0);
        assert_eq!(ink_mask(0.0, 0.02), 1.0);
        assert_eq!(ink_mask(-0.3, 0.02), 1.0);
        let m = ink_mask(0.01, 0.02);
        assert!(m > 0.0 && m < 1.0);
    }

    #[test]
    fn test_outside_is_background() {
        let params = FieldParams::at(0.0, 1.0);
        let blob = big_blob();
        // Far corner: well outside the splash
        let shaded = shade(Vec2::new(0.99, -0.99), &[blob], &params);
        assert!(shaded.distance >= params.edge_width);
        assert_eq!(shaded.color, params.background);
        assert_eq!(shaded.mask, 0.0);
    }

    #[test]
    fn test_no_splashes_is_background() {
        let params = FieldParams::at(5.0, 1.5);
        let shaded = shade(Vec2::new(0.2, 0.3), &[], &params);
        assert_eq!(shaded.color, params.background);
    }

    #[test]
    fn test_deep_inside_is_opaque_ink() {
        let params = FieldParams::at(0.0, 1.0);
        let blob = big_blob();
        let center = uv_to_screen(current_center(&blob, 0.0, params.gravity), params.aspect);
        let shaded = shade(center, &[blob], &params);

        assert!(shaded.distance < -0.3);
        assert_eq!(shaded.mask, 1.0);
        let normal = surface_normal(center, shaded.distance, &[blob], &params);
        let diffuse = normal.dot(light_dir()).clamp(0.0, 1.0);
        let half = (light_dir() + Vec3::Z).normalize();
        let spec = normal.dot(half).max(0.0).powf(SPECULAR_POWER);
        let expected = blob.color * (0.8 + 0.2 * diffuse) + Vec3::ONE * spec * params.reflection;
        assert!((shaded.color - expected).length() < 1e-4);
    }

    #[test]
    fn test_deterministic() {
        let params = FieldParams::at(7.5, 16.0 / 9.0);
        let blobs = [big_blob(), Blob { birth_time: 3.0, origin: Vec2::new(0.3, 0.9), ..big_blob() }];
        for i in 0..50 {
            let p = Vec2::new(-1.5 + i as f32 * 0.06, 0.8 - i as f32 * 0.03);
            assert_eq!(shade(p, &blobs, &params), shade(p, &blobs, &params));
        }
    }

    fn spawned(seed: u64, count: usize) -> Vec<Blob> {
        let mut spawner = Spawner::seeded(seed, SpawnRanges::default());
        (0..count).map(|i| spawner.spawn(i as f32 * 3.0)).collect()
    }

    proptest! {
        #[test]
        fn prop_shade_deterministic_any_count(
            seed in any::<u64>(),
            count in 0usize..=MAX_SPLASHES,
            time in 0.0f32..70.0,
            x in -2.0f32..2.0,
            y in -1.0f32..1.0,
        ) {
            let blobs = spawned(seed, count);
            let again = spawned(seed, count);
            let params = FieldParams::at(time, 2.0);
            let p = Vec2::new(x, y);
            prop_assert_eq!(shade(p, &blobs, &params), shade(p, &again, &params));
        }
    }
}
