//! Randomized splash creation
//!
//! All randomness in the animation flows through the spawner's single PRNG,
//! so a seeded spawner produces the exact same splash sequence every run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::blob::{Blob, PALETTE};
use super::registry::SplashRegistry;
use crate::config::SpawnRanges;
use crate::consts::NOISE_SEED_RANGE;

pub struct Spawner<R: Rng = Pcg32> {
    rng: R,
    ranges: SpawnRanges,
}

impl Spawner<Pcg32> {
    /// Spawner backed by a seeded PCG stream
    pub fn seeded(seed: u64, ranges: SpawnRanges) -> Self {
        Self::new(Pcg32::seed_from_u64(seed), ranges)
    }
}

impl<R: Rng> Spawner<R> {
    pub fn new(rng: R, ranges: SpawnRanges) -> Self {
        Self { rng, ranges }
    }

    pub fn ranges(&self) -> &SpawnRanges {
        &self.ranges
    }

    /// Create a new splash born at `birth_time` seconds
    pub fn spawn(&mut self, birth_time: f32) -> Blob {
        let r = &self.ranges;
        let origin = Vec2::new(r.origin_x.sample(&mut self.rng), r.origin_y.sample(&mut self.rng));
        let base_radius = r.radius.sample(&mut self.rng);
        let spread_speed = r.spread_speed.sample(&mut self.rng);
        let viscosity = r.viscosity.sample(&mut self.rng);
        let wobble_strength = r.wobble.sample(&mut self.rng);
        let color = PALETTE[self.rng.random_range(0..PALETTE.len())];
        let noise_seed = Vec2::new(
            self.rng.random_range(0.0..NOISE_SEED_RANGE),
            self.rng.random_range(0.0..NOISE_SEED_RANGE),
        );

        Blob {
            origin,
            base_radius,
            spread_speed,
            viscosity,
            wobble_strength,
            color,
            birth_time,
            noise_seed,
        }
    }

    /// Spawn directly into a registry, evicting the oldest splash if full
    pub fn spawn_into<const N: usize>(&mut self, registry: &mut SplashRegistry<N>, birth_time: f32) {
        let blob = self.spawn(birth_time);
        log::debug!(
            "Spawned splash at ({:.2}, {:.2}) r={:.3} t={:.2}",
            blob.origin.x,
            blob.origin.y,
            blob.base_radius,
            birth_time
        );
        if let Some(evicted) = registry.add(blob) {
            log::debug!("Evicted splash born at t={:.2}", evicted.birth_time);
        }
    }
}
