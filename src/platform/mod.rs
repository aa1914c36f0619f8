//! Platform abstraction layer
//!
//! Hosts supply three things to the engine: a millisecond clock, a display
//! refresh callback and a spawn timer. The browser host wires them to
//! `requestAnimationFrame`, `setInterval` and `resize`; the headless host
//! steps a manual clock at a fixed frame rate.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{HeadlessDriver, ManualClock};

/// Monotonic host time in milliseconds
pub trait HostClock {
    fn now_ms(&self) -> f64;
}
