//! Animation configuration
//!
//! Every tunable is a named constant in [`crate::consts`]; `InkConfig` groups
//! them so hosts can override a few fields from JSON. Missing fields keep
//! their defaults.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Closed `[min, max]` range for uniform sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample. A degenerate or non-finite range always yields `min`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if !(self.min.is_finite() && self.max.is_finite()) || self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        finite(name, f64::from(self.min))?;
        finite(name, f64::from(self.max))?;
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Like `check`, and the lower bound must not be negative
    fn check_non_negative(&self, name: &'static str) -> Result<(), ConfigError> {
        self.check(name)?;
        if self.min < 0.0 {
            return Err(ConfigError::Negative {
                name,
                value: self.min,
            });
        }
        Ok(())
    }
}

/// Spawn parameter ranges
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRanges {
    pub origin_x: Range,
    pub origin_y: Range,
    pub radius: Range,
    pub spread_speed: Range,
    pub viscosity: Range,
    pub wobble: Range,
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            origin_x: Range::new(ORIGIN_X.0, ORIGIN_X.1),
            origin_y: Range::new(ORIGIN_Y.0, ORIGIN_Y.1),
            radius: Range::new(MIN_RADIUS, MAX_RADIUS),
            spread_speed: Range::new(MIN_SPREAD_SPEED, MAX_SPREAD_SPEED),
            viscosity: Range::new(MIN_VISCOSITY, MAX_VISCOSITY),
            wobble: Range::new(MIN_WOBBLE, MAX_WOBBLE),
        }
    }
}

/// Full animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InkConfig {
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Seconds a splash lives before it is pruned
    pub max_age: f32,
    pub spawn: SpawnRanges,

    // === Field ===
    pub gravity_strength: f32,
    pub noise_scale: f32,
    pub blend_smoothing: f32,
    pub color_influence: f32,

    // === Shading ===
    pub reflection_intensity: f32,
    pub edge_width: f32,
    pub background: [f32; 3],

    // === Surface ===
    /// Cap applied to the host device pixel ratio
    pub max_pixel_ratio: f64,
}

impl Default for InkConfig {
    fn default() -> Self {
        Self {
            spawn_interval: SPAWN_INTERVAL_SECS,
            max_age: MAX_AGE_SECS,
            spawn: SpawnRanges::default(),

            gravity_strength: GRAVITY_STRENGTH,
            noise_scale: NOISE_SCALE,
            blend_smoothing: BLEND_SMOOTHING,
            color_influence: COLOR_INFLUENCE,

            reflection_intensity: REFLECTION_INTENSITY,
            edge_width: EDGE_WIDTH,
            background: BACKGROUND,

            max_pixel_ratio: MAX_PIXEL_RATIO,
        }
    }
}

impl InkConfig {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.spawn;
        s.origin_x.check("spawn.origin_x")?;
        s.origin_y.check("spawn.origin_y")?;
        s.radius.check_non_negative("spawn.radius")?;
        s.spread_speed.check_non_negative("spawn.spread_speed")?;
        // exp(-age * viscosity) must decay
        s.viscosity.check_non_negative("spawn.viscosity")?;
        s.wobble.check_non_negative("spawn.wobble")?;

        positive("spawn_interval", self.spawn_interval as f64)?;
        positive("max_age", self.max_age as f64)?;
        // smin divides by k
        positive("blend_smoothing", self.blend_smoothing as f64)?;
        positive("edge_width", self.edge_width as f64)?;
        positive("max_pixel_ratio", self.max_pixel_ratio)?;

        finite("gravity_strength", f64::from(self.gravity_strength))?;
        finite("noise_scale", f64::from(self.noise_scale))?;
        finite("color_influence", f64::from(self.color_influence))?;
        finite("reflection_intensity", f64::from(self.reflection_intensity))?;
        for c in self.background {
            finite("background", f64::from(c))?;
        }
        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_default_is_valid() {
        assert!(InkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = InkConfig::from_json(r#"{ "max_age": 12.0, "spawn": { "radius": { "min": 0.1, "max": 0.2 } } }"#)
            .expect("valid config");
        assert_eq!(config.max_age, 12.0);
        assert_eq!(config.spawn.radius, Range::new(0.1, 0.2));
        assert_eq!(config.spawn.viscosity, Range::new(MIN_VISCOSITY, MAX_VISCOSITY));
        assert_eq!(config.spawn_interval, SPAWN_INTERVAL_SECS);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = InkConfig::from_json(r#"{ "spawn": { "wobble": { "min": 0.5, "max": 0.1 } } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvertedRange { name: "spawn.wobble", .. }
        ));
    }

    #[test]
    fn test_non_positive_rejected() {
        let err = InkConfig::from_json(r#"{ "blend_smoothing": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { name: "blend_smoothing", .. }));

        let err = InkConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_overflowing_bound_rejected() {
        // 1e39 does not fit in an f32 and parses as infinity
        let err = InkConfig::from_json(r#"{ "spawn": { "radius": { "min": 0.05, "max": 1e39 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonFinite { name: "spawn.radius" }));

        let err = InkConfig::from_json(r#"{ "gravity_strength": -1e39 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonFinite { name: "gravity_strength" }));
    }

    #[test]
    fn test_negative_growth_ranges_rejected() {
        let err = InkConfig::from_json(r#"{ "spawn": { "viscosity": { "min": -1.0, "max": 0.5 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Negative { name: "spawn.viscosity", .. }));

        let err = InkConfig::from_json(r#"{ "spawn": { "radius": { "min": -0.2, "max": -0.1 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Negative { name: "spawn.radius", .. }));

        // Zero is a valid lower bound
        assert!(InkConfig::from_json(r#"{ "spawn": { "wobble": { "min": 0.0, "max": 0.0 } } }"#).is_ok());
    }

    #[test]
    fn test_sample_never_panics_on_infinite_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(Range::new(0.05, f32::INFINITY).sample(&mut rng), 0.05);
        assert!(Range::new(f32::NEG_INFINITY, 1.0).sample(&mut rng).is_infinite());
    }

    #[test]
    fn test_range_sample_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let range = Range::new(0.3, 1.5);
        for _ in 0..1000 {
            assert!(range.contains(range.sample(&mut rng)));
        }
        assert_eq!(Range::new(0.4, 0.4).sample(&mut rng), 0.4);
    }
}
