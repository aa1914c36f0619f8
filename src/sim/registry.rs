//! Bounded, time-ordered splash collection
//!
//! Insertion order is age order: index 0 is always the oldest surviving
//! splash. The capacity is a const generic so the uniform array that mirrors
//! it can be sized at compile time.

use super::blob::Blob;
use crate::consts::MAX_SPLASHES;

#[derive(Debug, Clone)]
pub struct SplashRegistry<const N: usize = MAX_SPLASHES> {
    blobs: Vec<Blob>,
}

impl<const N: usize> Default for SplashRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SplashRegistry<N> {
    pub const CAPACITY: usize = N;

    pub fn new() -> Self {
        Self {
            blobs: Vec::with_capacity(N),
        }
    }

    /// Append a splash, evicting the oldest first when full
    ///
    /// Returns the evicted splash, if any.
    pub fn add(&mut self, blob: Blob) -> Option<Blob> {
        debug_assert!(
            self.blobs
                .last()
                .is_none_or(|last| last.birth_time <= blob.birth_time),
            "splashes must be added in birth order"
        );
        if N == 0 {
            return Some(blob);
        }
        let evicted = if self.blobs.len() >= N {
            Some(self.blobs.remove(0))
        } else {
            None
        };
        self.blobs.push(blob);
        evicted
    }

    /// Drop every splash whose age exceeds `max_age`
    ///
    /// Survivors keep their relative order. Returns how many were removed.
    pub fn prune_expired(&mut self, now: f32, max_age: f32) -> usize {
        let before = self.blobs.len();
        self.blobs.retain(|b| now - b.birth_time <= max_age);
        before - self.blobs.len()
    }

    /// Current splashes, oldest first
    #[inline]
    pub fn snapshot(&self) -> &[Blob] {
        &self.blobs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.blobs.clear();
    }
}
