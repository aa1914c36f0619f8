//! Ink Splash entry point
//!
//! On the web the library's `InkBackground` handle is the entry point and
//! this binary is empty. Natively it renders the animation offline to a
//! numbered PNG sequence with the CPU rasterizer.

#[cfg(not(target_arch = "wasm32"))]
mod offline {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use ink_splash::platform::HeadlessDriver;
    use ink_splash::renderer::{CpuRenderer, Viewport};
    use ink_splash::{Engine, InkConfig};

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Render the ink splash animation to PNG frames", long_about = None)]
    pub struct Args {
        /// RNG seed (same seed, same animation)
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Width in CSS pixels
        #[arg(long, default_value_t = 640)]
        width: u32,
        /// Height in CSS pixels
        #[arg(long, default_value_t = 360)]
        height: u32,
        /// Device pixel ratio, capped by the config
        #[arg(long, default_value_t = 1.0)]
        pixel_ratio: f64,
        #[arg(long, default_value_t = 30)]
        fps: u32,
        #[arg(long, default_value_t = 90)]
        frames: u32,
        /// Seconds to run before the first written frame
        #[arg(long, default_value_t = 0.0)]
        start: f32,
        #[arg(long, default_value = "frames")]
        out_dir: PathBuf,
        /// JSON config overriding the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let config = match &args.config {
            Some(path) => {
                let json = fs::read_to_string(path).with_context(|| format!("read config {:?}", path))?;
                InkConfig::from_json(&json).with_context(|| format!("parse config {:?}", path))?
            }
            None => InkConfig::default(),
        };
        if args.fps == 0 {
            anyhow::bail!("--fps must be at least 1");
        }

        let viewport = Viewport::from_css(
            f64::from(args.width),
            f64::from(args.height),
            args.pixel_ratio,
            config.max_pixel_ratio,
        );
        fs::create_dir_all(&args.out_dir).with_context(|| format!("create {:?}", args.out_dir))?;

        log::info!(
            "Rendering {} frames at {}x{} ({} fps, seed {})",
            args.frames,
            viewport.width,
            viewport.height,
            args.fps,
            args.seed
        );

        let mut driver = HeadlessDriver::new(Engine::new(config, args.seed), args.fps);
        driver.start(CpuRenderer::new(viewport.width, viewport.height));
        if args.start > 0.0 {
            driver.skip_to(args.start);
        }

        for index in 0..args.frames {
            if !driver.step() {
                log::warn!("Frame {index} was not presented");
                continue;
            }
            let Some(framebuffer) = driver.engine().sink().map(CpuRenderer::framebuffer) else {
                anyhow::bail!("renderer detached");
            };

            let image = image::RgbaImage::from_raw(
                framebuffer.width(),
                framebuffer.height(),
                framebuffer.pixels().to_vec(),
            )
            .context("framebuffer size mismatch")?;
            let path = args.out_dir.join(format!("frame_{index:04}.png"));
            image.save(&path).with_context(|| format!("write {:?}", path))?;
        }

        log::info!(
            "Wrote {} frames to {:?} ({} splashes live)",
            args.frames,
            args.out_dir,
            driver.engine().registry().len()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    offline::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page drives the library's `InkBackground` export
}
