//! Software rasterizer
//!
//! Evaluates the same field as the fragment shader, one sample per pixel
//! center. Rows are independent, so on native targets they are shaded in
//! parallel; the splash list is shared read-only.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use glam::{Vec2, Vec3};

use super::uniforms::FrameUniforms;
use crate::engine::FrameSink;
use crate::error::PresentError;
use crate::field::{FieldParams, shade};
use crate::sim::Blob;
use crate::uv_to_screen;

const CHANNELS: usize = 4;

/// Tightly packed RGBA8 image, rows top to bottom
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA of the pixel at (x, y), `None` out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let p = &self.pixels[i..i + CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Shade every pixel for the given splash set
    pub fn render(&mut self, blobs: &[Blob], params: &FieldParams) {
        let width = self.width;
        let height = self.height;
        let row_len = width as usize * CHANNELS;
        if row_len == 0 {
            return;
        }

        let shade_row = |(y, row): (usize, &mut [u8])| {
            let v = 1.0 - (y as f32 + 0.5) / height as f32;
            for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let u = (x as f32 + 0.5) / width as f32;
                let p = uv_to_screen(Vec2::new(u, v), params.aspect);
                let color = shade(p, blobs, params).color;
                px.copy_from_slice(&to_rgba8(color));
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.pixels.par_chunks_mut(row_len).enumerate().for_each(shade_row);

        #[cfg(target_arch = "wasm32")]
        self.pixels.chunks_mut(row_len).enumerate().for_each(shade_row);
    }
}

#[inline]
fn to_rgba8(color: Vec3) -> [u8; 4] {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

/// Frame sink that rasterizes into an owned framebuffer
#[derive(Debug, Clone)]
pub struct CpuRenderer {
    framebuffer: Framebuffer,
}

impl CpuRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            framebuffer: Framebuffer::new(width, height),
        }
    }

    /// Last presented frame
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }
}

impl FrameSink for CpuRenderer {
    fn size(&self) -> (u32, u32) {
        (self.framebuffer.width, self.framebuffer.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.framebuffer = Framebuffer::new(width, height);
    }

    fn present(&mut self, frame: &FrameUniforms) -> Result<(), PresentError> {
        if frame.resolution() != self.size() {
            return Err(PresentError::NotReady);
        }
        let blobs = frame.blobs();
        let params = frame.field_params();
        self.framebuffer.render(&blobs, &params);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnRanges;
    use crate::consts::{BACKGROUND, MAX_SPLASHES};
    use crate::sim::{PALETTE, Spawner};
    use proptest::prelude::*;

    fn center_blob() -> Blob {
        Blob {
            origin: Vec2::new(0.5, 0.5),
            base_radius: 0.3,
            spread_speed: 0.0,
            viscosity: 1.0,
            wobble_strength: 0.1,
            color: PALETTE[0],
            birth_time: 0.0,
            noise_seed: Vec2::new(1.0, 1.0),
        }
    }

    #[test]
    fn test_empty_frame_is_background() {
        let mut fb = Framebuffer::new(16, 9);
        fb.render(&[], &FieldParams::at(0.0, 16.0 / 9.0));
        let bg = to_rgba8(Vec3::from_array(BACKGROUND));
        assert!(fb.pixels().chunks_exact(4).all(|p| p == bg));
    }

    #[test]
    fn test_center_inked_corner_clear() {
        let mut fb = Framebuffer::new(64, 64);
        fb.render(&[center_blob()], &FieldParams::at(0.0, 1.0));

        let bg = to_rgba8(Vec3::from_array(BACKGROUND));
        assert_ne!(fb.pixel(32, 32), Some(bg));
        assert_eq!(fb.pixel(0, 0), Some(bg));
        assert_eq!(fb.pixel(63, 63), Some(bg));
        assert_eq!(fb.pixel(64, 0), None);
    }

    #[test]
    fn test_render_is_deterministic() {
        let blobs = [center_blob(), Blob { birth_time: 1.0, origin: Vec2::new(0.2, 0.9), ..center_blob() }];
        let params = FieldParams::at(4.0, 1.5);
        let mut a = Framebuffer::new(48, 32);
        let mut b = Framebuffer::new(48, 32);
        a.render(&blobs, &params);
        b.render(&blobs, &params);
        assert_eq!(a.pixels(), b.pixels());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_render_deterministic_any_count(
            seed in any::<u64>(),
            count in 0usize..=MAX_SPLASHES,
            time in 0.0f32..70.0,
        ) {
            let render = || {
                let mut spawner = Spawner::seeded(seed, SpawnRanges::default());
                let blobs: Vec<Blob> = (0..count).map(|i| spawner.spawn(i as f32 * 3.0)).collect();
                let mut fb = Framebuffer::new(24, 16);
                fb.render(&blobs, &FieldParams::at(time, 1.5));
                fb.into_pixels()
            };
            prop_assert_eq!(render(), render());
        }
    }

    #[test]
    fn test_present_rejects_stale_size() {
        use crate::renderer::FrameUniforms;
        use crate::sim::SplashRegistry;

        let registry: SplashRegistry = SplashRegistry::new();
        let frame = FrameUniforms::marshal(&registry, &FieldParams::at(0.0, 1.0), (32, 32));
        let mut sink = CpuRenderer::new(16, 16);
        assert!(sink.present(&frame).is_err());
        sink.resize(32, 32);
        assert!(sink.present(&frame).is_ok());
    }
}
