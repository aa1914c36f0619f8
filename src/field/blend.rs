//! Metaball blending of all live splashes
//!
//! Distances are merged with a polynomial smooth minimum so nearby splashes
//! fuse into one surface instead of meeting at a crease. Colors are mixed by
//! inverse distance among splashes close to the sample.

use glam::{Vec2, Vec3};

use super::FieldParams;
use super::splash::sd_splash;
use crate::consts::UNBORN_DISTANCE;
use crate::sim::Blob;

/// Added to |d| before inverting, keeps on-edge weights finite
const COLOR_WEIGHT_EPSILON: f32 = 0.01;

/// Polynomial smooth minimum with blend radius `k`
///
/// Equals `min(a, b)` once `|a - b| >= k`; at `a == b` it dips by `k / 4`.
#[inline]
pub fn smin(a: f32, b: f32, k: f32) -> f32 {
    let h = (0.5 + 0.5 * (b - a) / k).clamp(0.0, 1.0);
    // mix(b, a, h), exact at the clamped ends
    b * (1.0 - h) + a * h - k * h * (1.0 - h)
}

/// Blended field value and ink color at one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    /// Smooth-min of every splash distance (negative inside ink)
    pub distance: f32,
    /// Inverse-distance weighted splash color, black when nothing is near
    pub color: Vec3,
}

/// Blended signed distance only (used for gradients)
pub fn field_distance(p: Vec2, blobs: &[Blob], params: &FieldParams) -> f32 {
    blobs.iter().fold(UNBORN_DISTANCE, |acc, blob| {
        smin(acc, sd_splash(p, blob, params), params.smoothing)
    })
}

/// Blended signed distance and color at screen-space point `p`
pub fn evaluate(p: Vec2, blobs: &[Blob], params: &FieldParams) -> FieldSample {
    let mut distance = UNBORN_DISTANCE;
    let mut color = Vec3::ZERO;
    let mut total_weight = 0.0;

    for blob in blobs {
        let sdf = sd_splash(p, blob, params);
        distance = smin(distance, sdf, params.smoothing);

        if sdf < params.influence {
            let weight = 1.0 / (sdf.abs() + COLOR_WEIGHT_EPSILON);
            color += blob.color * weight;
            total_weight += weight;
        }
    }

    if total_weight > 0.0 {
        color /= total_weight;
    }

    FieldSample { distance, color }
}
