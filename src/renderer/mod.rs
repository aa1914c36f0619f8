//! Rendering module
//!
//! The ink field is drawn entirely in a fragment shader over one fullscreen
//! triangle. A CPU rasterizer evaluates the same field for headless output.

pub mod cpu;
pub mod ink_pipeline;
pub mod uniforms;
pub mod viewport;

pub use cpu::{CpuRenderer, Framebuffer};
pub use ink_pipeline::InkRenderState;
pub use uniforms::{FrameUniforms, Globals, SplashUniform};
pub use viewport::{Projection, Viewport};
