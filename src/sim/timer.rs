//! Fixed-interval spawn timer
//!
//! Browsers drive spawning with `setInterval`. Hosts without an interval
//! primitive (the headless renderer, tests) poll this timer instead and get
//! the exact due times back, so spawns land on the same schedule either way.

#[derive(Debug, Clone)]
pub struct SpawnTimer {
    interval: f32,
    next_due: f32,
}

impl SpawnTimer {
    /// The first periodic tick is due one interval after start; the eager
    /// spawn at t=0 is the caller's job.
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            next_due: interval,
        }
    }

    #[inline]
    pub fn interval(&self) -> f32 {
        self.interval
    }

    #[inline]
    pub fn next_due(&self) -> f32 {
        self.next_due
    }

    /// Pop the next tick if it is due at or before `elapsed`
    ///
    /// Call in a loop to catch up after a long frame.
    pub fn pop_due(&mut self, elapsed: f32) -> Option<f32> {
        if self.interval > 0.0 && self.next_due <= elapsed {
            let due = self.next_due;
            self.next_due += self.interval;
            Some(due)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.next_due = self.interval;
    }
}
