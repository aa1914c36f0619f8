//! Headless host: manual clock and a fixed-rate frame driver

use super::HostClock;
use crate::engine::{Engine, FrameSink};
use crate::sim::SpawnTimer;

/// Clock that only moves when told to
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now_ms: f64,
}

impl ManualClock {
    pub fn new(now_ms: f64) -> Self {
        Self { now_ms }
    }

    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms.max(0.0);
    }

    pub fn set(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl HostClock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// Drives an engine frame by frame without a display
///
/// Each `step` fires every spawn tick due at the current time (at its exact
/// due time, not the frame time), renders one frame, then advances the clock
/// by one frame period.
pub struct HeadlessDriver<S: FrameSink> {
    engine: Engine<S>,
    clock: ManualClock,
    timer: SpawnTimer,
    start_ms: f64,
    frame_ms: f64,
}

impl<S: FrameSink> HeadlessDriver<S> {
    pub fn new(engine: Engine<S>, fps: u32) -> Self {
        let timer = SpawnTimer::new(engine.config().spawn_interval);
        Self {
            engine,
            clock: ManualClock::default(),
            timer,
            start_ms: 0.0,
            frame_ms: 1000.0 / f64::from(fps.max(1)),
        }
    }

    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Seconds since start
    pub fn elapsed(&self) -> f32 {
        self.engine.elapsed(self.clock.now_ms()).unwrap_or(0.0)
    }

    /// Mount the sink and start the clock at zero
    pub fn start(&mut self, sink: S) -> bool {
        self.start_ms = self.clock.now_ms();
        self.timer.reset();
        self.engine.mount(sink, self.start_ms)
    }

    /// Run the animation forward without rendering
    pub fn skip_to(&mut self, seconds: f32) {
        self.clock.set(self.start_ms + f64::from(seconds) * 1000.0);
        self.fire_due_spawns();
    }

    /// Spawn, render one frame, advance. Returns whether it was presented.
    pub fn step(&mut self) -> bool {
        self.fire_due_spawns();
        let presented = self.engine.frame(self.clock.now_ms());
        self.clock.advance(self.frame_ms);
        presented
    }

    /// Stop and return the sink
    pub fn finish(mut self) -> Option<S> {
        self.engine.unmount()
    }

    fn fire_due_spawns(&mut self) {
        let elapsed = self.elapsed();
        while let Some(due) = self.timer.pop_due(elapsed) {
            self.engine.spawn(self.start_ms + f64::from(due) * 1000.0);
        }
    }
}
