//! Gesture samples and the fixed-capacity window that collects them.

use serde::{Deserialize, Serialize};

/// One observation of the gesture joint while a gesture is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// Capture time in milliseconds.
    pub timestamp_ms: f64,
    /// Height of the gesture joint in meters.
    pub vertical_position_m: f64,
}

impl Sample {
    pub fn new(timestamp_ms: f64, vertical_position_m: f64) -> Self {
        Self {
            timestamp_ms,
            vertical_position_m,
        }
    }
}

/// Pre-sized sample buffer with an explicit fill index.
///
/// Slots past the fill index hold stale samples from earlier windows. They
/// are never read: a window is only consumed once every slot has been
/// rewritten.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: Vec<Sample>,
    fill: usize,
}

impl SampleWindow {
    /// Allocate a window holding `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![Sample::default(); capacity],
            fill: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples collected in the current window.
    pub fn len(&self) -> usize {
        self.fill
    }

    pub fn is_empty(&self) -> bool {
        self.fill == 0
    }

    pub fn is_full(&self) -> bool {
        self.fill == self.samples.len()
    }

    /// Append a sample at the fill index.
    ///
    /// Returns `false` without writing anything if the window is full.
    pub fn push(&mut self, sample: Sample) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples[self.fill] = sample;
        self.fill += 1;
        true
    }

    /// Samples collected so far, oldest first.
    pub fn as_slice(&self) -> &[Sample] {
        &self.samples[..self.fill]
    }

    /// Start a new window. Buffer contents are left in place.
    pub fn reset(&mut self) {
        self.fill = 0;
    }
}
