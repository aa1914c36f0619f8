//! Splash simulation state
//!
//! Everything that owns or mutates splashes lives here:
//! - Seeded RNG only (one stream, owned by the spawner)
//! - Insertion order is age order
//! - No rendering or platform dependencies

pub mod blob;
pub mod registry;
pub mod spawner;
pub mod timer;

pub use blob::{Blob, PALETTE};
pub use registry::SplashRegistry;
pub use spawner::Spawner;
pub use timer::SpawnTimer;
