//! Animation lifecycle and per-frame loop
//!
//! The engine is a two-state machine. While `Idle` there is no surface and
//! every callback is a no-op. `mount` moves it to `Running`, which owns the
//! frame sink for as long as the animation is attached; `unmount` hands the
//! sink back so the host can release it after its callbacks are cancelled.

use crate::config::InkConfig;
use crate::error::PresentError;
use crate::field::FieldParams;
use crate::renderer::{FrameUniforms, Viewport};
use crate::sim::{SplashRegistry, Spawner};

/// A drawable surface the engine presents frames to
pub trait FrameSink {
    /// Current size in physical pixels
    fn size(&self) -> (u32, u32);

    /// Reconfigure for a new size (never called with a zero dimension)
    fn resize(&mut self, width: u32, height: u32);

    /// Evaluate the field over the whole surface and show it
    fn present(&mut self, frame: &FrameUniforms) -> Result<(), PresentError>;
}

struct Running<S> {
    sink: S,
    /// Host clock reading at mount (ms)
    start_ms: f64,
    viewport: Viewport,
    frames: u64,
}

enum Phase<S> {
    Idle,
    Running(Running<S>),
}

pub struct Engine<S: FrameSink> {
    config: InkConfig,
    spawner: Spawner,
    registry: SplashRegistry,
    phase: Phase<S>,
}

impl<S: FrameSink> Engine<S> {
    pub fn new(config: InkConfig, seed: u64) -> Self {
        let spawner = Spawner::seeded(seed, config.spawn.clone());
        Self::with_spawner(config, spawner)
    }

    /// Engine with a caller-provided spawner (tests inject fixed ranges)
    pub fn with_spawner(config: InkConfig, spawner: Spawner) -> Self {
        Self {
            config,
            spawner,
            registry: SplashRegistry::new(),
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &InkConfig {
        &self.config
    }

    pub fn registry(&self) -> &SplashRegistry {
        &self.registry
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn viewport(&self) -> Option<Viewport> {
        match &self.phase {
            Phase::Running(r) => Some(r.viewport),
            Phase::Idle => None,
        }
    }

    pub fn sink(&self) -> Option<&S> {
        match &self.phase {
            Phase::Running(r) => Some(&r.sink),
            Phase::Idle => None,
        }
    }

    /// Frames presented since mount
    pub fn frame_count(&self) -> u64 {
        match &self.phase {
            Phase::Running(r) => r.frames,
            Phase::Idle => 0,
        }
    }

    /// Seconds since mount, or `None` while idle
    pub fn elapsed(&self, now_ms: f64) -> Option<f32> {
        match &self.phase {
            Phase::Running(r) => Some((((now_ms - r.start_ms) / 1000.0).max(0.0)) as f32),
            Phase::Idle => None,
        }
    }

    /// Attach a surface and start the animation
    ///
    /// Spawns the first splash immediately. Returns `false` (and drops the
    /// new sink) if already running.
    pub fn mount(&mut self, mut sink: S, now_ms: f64) -> bool {
        if self.is_running() {
            log::warn!("Ink animation already mounted");
            return false;
        }

        let (width, height) = sink.size();
        let viewport = Viewport::new(width, height);
        if (viewport.width, viewport.height) != (width, height) {
            // Degenerate sink; grow it to the smallest drawable size
            sink.resize(viewport.width, viewport.height);
        }
        self.registry.clear();
        self.phase = Phase::Running(Running {
            sink,
            start_ms: now_ms,
            viewport,
            frames: 0,
        });
        self.spawner.spawn_into(&mut self.registry, 0.0);

        log::info!("Ink animation mounted at {}x{}", viewport.width, viewport.height);
        true
    }

    /// Spawn-timer callback
    pub fn spawn(&mut self, now_ms: f64) {
        if let Some(elapsed) = self.elapsed(now_ms) {
            self.spawner.spawn_into(&mut self.registry, elapsed);
        }
    }

    /// Display-refresh callback: prune, marshal, present
    ///
    /// Returns whether a frame was presented. A failed present is logged
    /// and skipped; the next frame starts from scratch.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let Some(elapsed) = self.elapsed(now_ms) else {
            return false;
        };

        let pruned = self.registry.prune_expired(elapsed, self.config.max_age);
        if pruned > 0 {
            log::debug!("Pruned {pruned} expired splashes at t={elapsed:.2}");
        }

        let Phase::Running(running) = &mut self.phase else {
            return false;
        };
        let params = FieldParams::new(&self.config, elapsed, running.viewport.aspect());
        let uniforms = FrameUniforms::marshal(
            &self.registry,
            &params,
            (running.viewport.width, running.viewport.height),
        );

        match running.sink.present(&uniforms) {
            Ok(()) => {
                running.frames += 1;
                true
            }
            Err(e) => {
                log::warn!("Frame skipped: {e}");
                false
            }
        }
    }

    /// Viewport resize: new aspect ratio and projection, nothing else
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Phase::Running(running) = &mut self.phase {
            if running.viewport.resize(width, height) {
                running.sink.resize(width, height);
                let proj = running.viewport.projection();
                log::info!(
                    "Resized to {width}x{height} (x {:.2}..{:.2})",
                    proj.left,
                    proj.right
                );
            }
        }
    }

    /// Stop the animation and hand the sink back for release
    pub fn unmount(&mut self) -> Option<S> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Running(running) => {
                self.registry.clear();
                log::info!("Ink animation unmounted after {} frames", running.frames);
                Some(running.sink)
            }
            Phase::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_SPLASHES;
    use crate::renderer::CpuRenderer;

    /// Records every frame it is asked to present
    struct RecordingSink {
        size: (u32, u32),
        frames: Vec<FrameUniforms>,
        resizes: Vec<(u32, u32)>,
        fail_next: bool,
    }

    impl RecordingSink {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                frames: Vec::new(),
                resizes: Vec::new(),
                fail_next: false,
            }
        }
    }

    impl FrameSink for RecordingSink {
        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.resizes.push((width, height));
        }

        fn present(&mut self, frame: &FrameUniforms) -> Result<(), PresentError> {
            if std::mem::take(&mut self.fail_next) {
                return Err(PresentError::NotReady);
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn engine() -> Engine<RecordingSink> {
        Engine::new(InkConfig::default(), 12345)
    }

    #[test]
    fn test_idle_is_noop() {
        let mut engine = engine();
        assert!(!engine.is_running());
        engine.spawn(1000.0);
        assert!(!engine.frame(1000.0));
        engine.resize(100, 100);
        assert!(engine.registry().is_empty());
        assert!(engine.unmount().is_none());
    }

    #[test]
    fn test_mount_spawns_eagerly() {
        let mut engine = engine();
        assert!(engine.mount(RecordingSink::new(800, 600), 5000.0));
        assert!(engine.is_running());
        assert_eq!(engine.registry().len(), 1);
        assert_eq!(engine.registry().snapshot()[0].birth_time, 0.0);
        assert_eq!(engine.elapsed(6500.0), Some(1.5));

        // Second mount is refused
        assert!(!engine.mount(RecordingSink::new(10, 10), 6000.0));
        assert_eq!(engine.viewport(), Some(Viewport::new(800, 600)));
    }

    #[test]
    fn test_frame_marshals_live_set() {
        let mut engine = engine();
        engine.mount(RecordingSink::new(800, 400), 0.0);
        engine.spawn(3000.0);
        engine.spawn(6000.0);
        assert!(engine.frame(7000.0));

        let sink = engine.sink().expect("running");
        let frame = &sink.frames[0];
        assert_eq!(frame.globals.splash_count, 3);
        assert_eq!(frame.globals.time, 7.0);
        assert_eq!(frame.globals.aspect, 2.0);
        assert_eq!(frame.splashes[1].birth_time, 3.0);
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn test_frame_prunes_expired() {
        let mut engine = engine();
        engine.mount(RecordingSink::new(100, 100), 0.0);
        engine.spawn(10_000.0);
        // Splash born at 0 is 31s old, the one born at 10 is 21s old
        engine.frame(31_000.0);
        assert_eq!(engine.registry().len(), 1);
        assert_eq!(engine.registry().snapshot()[0].birth_time, 10.0);
        let sink = engine.sink().expect("running");
        assert_eq!(sink.frames[0].globals.splash_count, 1);
    }

    #[test]
    fn test_capacity_holds_over_many_spawns() {
        let mut engine = engine();
        engine.mount(RecordingSink::new(100, 100), 0.0);
        for i in 1..100 {
            engine.spawn(i as f64 * 100.0);
        }
        assert_eq!(engine.registry().len(), MAX_SPLASHES);
        assert!(engine.frame(10_000.0));
    }

    #[test]
    fn test_present_failure_skips_frame() {
        let mut engine = engine();
        let mut sink = RecordingSink::new(100, 100);
        sink.fail_next = true;
        engine.mount(sink, 0.0);
        assert!(!engine.frame(16.0));
        assert!(engine.frame(32.0));
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut engine = engine();
        engine.mount(RecordingSink::new(100, 100), 0.0);
        engine.resize(0, 50);
        engine.resize(300, 100);
        engine.frame(16.0);

        let sink = engine.sink().expect("running");
        assert_eq!(sink.resizes, vec![(300, 100)]);
        assert_eq!(sink.frames[0].globals.aspect, 3.0);
        assert_eq!(sink.frames[0].resolution(), (300, 100));
    }

    #[test]
    fn test_zero_size_sink_is_grown_at_mount() {
        let mut engine = engine();
        engine.mount(RecordingSink::new(0, 0), 0.0);
        assert_eq!(engine.viewport(), Some(Viewport::new(1, 1)));
        assert!(engine.frame(16.0));

        let sink = engine.sink().expect("running");
        assert_eq!(sink.resizes, vec![(1, 1)]);
        assert_eq!(sink.frames[0].resolution(), (1, 1));
    }

    #[test]
    fn test_zero_size_cpu_renderer_presents() {
        let mut engine: Engine<CpuRenderer> = Engine::new(InkConfig::default(), 5);
        engine.mount(CpuRenderer::new(0, 0), 0.0);
        assert!(engine.frame(16.0));
        assert!(engine.frame(32.0));
        assert_eq!(engine.sink().map(|s| s.size()), Some((1, 1)));
    }

    #[test]
    fn test_unmount_releases_sink_and_resets() {
        let mut engine = engine();
        engine.mount(RecordingSink::new(100, 100), 0.0);
        engine.frame(16.0);

        let sink = engine.unmount().expect("sink returned");
        assert_eq!(sink.frames.len(), 1);
        assert!(!engine.is_running());
        assert!(engine.registry().is_empty());

        // Remount starts a fresh clock
        assert!(engine.mount(RecordingSink::new(100, 100), 50_000.0));
        assert_eq!(engine.elapsed(50_000.0), Some(0.0));
        assert_eq!(engine.registry().len(), 1);
    }
}
