//! Error types
//!
//! The animation is decorative: none of these errors are allowed to reach the
//! host page. Hosts log them and carry on (or stay unmounted).

use thiserror::Error;

/// Invalid or unreadable configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("range `{name}` is inverted ({min} > {max})")]
    InvertedRange { name: &'static str, min: f32, max: f32 },

    #[error("`{name}` must be finite")]
    NonFinite { name: &'static str },

    #[error("range `{name}` must not go below zero, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("`{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
}

/// Failure to acquire a rendering surface at mount time
#[derive(Debug, Error)]
pub enum MountError {
    #[error("no browser window or document available")]
    NoWindow,

    #[error("surface has zero size ({0}x{1})")]
    EmptySurface(u32, u32),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// A single frame could not be presented
#[derive(Debug, Error)]
pub enum PresentError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("frame sink is not ready")]
    NotReady,
}
