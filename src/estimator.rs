//! Hand-raise gesture speed estimator.
//!
//! The estimator follows one joint (the right hand by default) relative to a
//! reference joint (the head). While the hand is above the head, one sample
//! per frame is collected into a fixed-size window. The first raised frame
//! after the window has filled completes the gesture: the average upward
//! speed is computed from the window and the window starts over. The
//! completing frame's own sample is not recorded.
//!
//! The window size trades accuracy against latency. At 30 fps a hand moving
//! at up to 3 m/s covers roughly 10 cm per frame, so a 30 cm raise spans
//! about 3 frames, which is the default capacity.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sample::{Sample, SampleWindow};
use crate::skeleton::{JointId, JointPositions, SkeletonFrame};
use crate::speed::{average_interval_speed, TimingPolicy};
use crate::utils::{validate_finite, warn_once};
use crate::{Error, Result};

/// Samples per gesture window for a 30 fps sensor.
pub const DEFAULT_CAPACITY: usize = 3;

/// Largest accepted window size, about 34 seconds of frames at 30 fps.
pub const MAX_CAPACITY: usize = 1024;

/// What happens to a partially filled window when the gesture joint drops
/// to or below the reference joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReleasePolicy {
    /// Keep the partial window; the next raise continues filling it.
    #[default]
    Retain,
    /// Drop the partial window; the next raise starts a fresh one. A full
    /// window is kept and completes on the next raised frame.
    Abandon,
}

/// Configuration for the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Samples collected per gesture window, in `2..=MAX_CAPACITY`.
    pub capacity: usize,

    /// Joint whose upward speed is measured.
    pub gesture_joint: JointId,

    /// Joint the gesture joint must be above for a frame to be accepted.
    pub reference_joint: JointId,

    /// Handling of degenerate sample intervals.
    pub timing_policy: TimingPolicy,

    /// Handling of partial windows when the gesture is released.
    pub release_policy: ReleasePolicy,
}

impl EstimatorConfig {
    /// Create a right-hand-over-head configuration with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            gesture_joint: JointId::HandRight,
            reference_joint: JointId::Head,
            timing_policy: TimingPolicy::default(),
            release_policy: ReleasePolicy::default(),
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("failed to parse estimator config: {}", e)))
    }

    /// Read a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!(
                    "failed to read estimator config '{}': {}",
                    path.as_ref().display(),
                    e
                ),
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Check the configuration without building an estimator.
    pub fn validate(&self) -> Result<()> {
        if self.capacity <= 1 {
            return Err(Error::InvalidConfig(format!(
                "capacity must be greater than 1, got {}",
                self.capacity
            )));
        }

        if self.capacity > MAX_CAPACITY {
            return Err(Error::InvalidConfig(format!(
                "capacity must be at most {}, got {}",
                MAX_CAPACITY, self.capacity
            )));
        }

        if self.gesture_joint == self.reference_joint {
            return Err(Error::InvalidConfig(format!(
                "gesture joint and reference joint must differ, both are {:?}",
                self.gesture_joint
            )));
        }

        Ok(())
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Where the estimator is in its gesture window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Fewer than `capacity` samples collected.
    Collecting { filled: usize },
    /// Every slot is filled; the next accepted frame completes the gesture.
    Full,
}

/// A completed hand raise.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureResult {
    /// Mean interval speed in meters per second. Positive is upward.
    pub average_speed_mps: f64,

    /// Interval speeds that went into the average, oldest first.
    pub interval_speeds: Vec<f64>,

    /// Degenerate intervals left out of the average.
    pub excluded_intervals: usize,

    /// Timestamp of the first sample in the window.
    pub window_start_ms: f64,

    /// Timestamp of the last sample in the window.
    pub window_end_ms: f64,

    /// Timestamp of the frame that completed the gesture.
    pub completed_at_ms: f64,
}

impl GestureResult {
    /// Time spanned by the window's samples.
    pub fn window_duration_ms(&self) -> f64 {
        self.window_end_ms - self.window_start_ms
    }
}

impl fmt::Display for GestureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hand raise speed (meters per second): {:.6}",
            self.average_speed_mps
        )
    }
}

/// Stateful hand-raise speed estimator.
///
/// Feed it once per sensor frame through [`process`](Self::process) or
/// [`process_frame`](Self::process_frame). Use one estimator per tracked
/// subject; instances share no state.
#[derive(Debug, Clone)]
pub struct GestureSpeedEstimator {
    config: EstimatorConfig,
    window: SampleWindow,
    /// Interval speed work buffer, `capacity - 1` long.
    speeds: Vec<f64>,
}

impl GestureSpeedEstimator {
    /// Create an estimator with the default joints and policies.
    ///
    /// # Errors
    /// `Error::InvalidConfig` if `capacity <= 1` or `capacity > MAX_CAPACITY`.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(EstimatorConfig::new(capacity))
    }

    /// Create an estimator from a full configuration.
    pub fn with_config(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            window: SampleWindow::new(config.capacity),
            speeds: Vec::with_capacity(config.capacity - 1),
            config,
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Number of samples collected in the current window.
    pub fn fill_index(&self) -> usize {
        self.window.len()
    }

    /// Samples collected in the current window, oldest first.
    pub fn samples(&self) -> &[Sample] {
        self.window.as_slice()
    }

    pub fn state(&self) -> WindowState {
        if self.window.is_full() {
            WindowState::Full
        } else {
            WindowState::Collecting {
                filled: self.window.len(),
            }
        }
    }

    /// Start a new window. Buffer contents are overwritten as it refills.
    pub fn reset(&mut self) {
        self.window.reset();
    }

    /// Process one frame of joint data.
    ///
    /// # Arguments
    /// * `joint_positions` - Joints of the tracked subject, or `None` if no
    ///   subject is tracked this frame
    /// * `reference_y` - Height of the reference joint in meters
    /// * `timestamp_ms` - Capture time of the frame
    ///
    /// # Returns
    /// The completed gesture when this frame closes a full window.
    ///
    /// # Errors
    /// * `Error::MissingJoint` if the subject lacks the gesture joint
    /// * `Error::InvalidSample` on non-finite input
    /// * `Error::DegenerateTiming` per the configured timing policy; the
    ///   window is consumed either way
    pub fn process(
        &mut self,
        joint_positions: Option<&JointPositions>,
        reference_y: f64,
        timestamp_ms: f64,
    ) -> Result<Option<GestureResult>> {
        let Some(joints) = joint_positions else {
            return Ok(None);
        };

        let gesture_joint = self.config.gesture_joint;
        let gesture_y = joints
            .get(&gesture_joint)
            .map(|p| p.y)
            .ok_or(Error::MissingJoint(gesture_joint))?;
        let gesture_y = validate_finite("gesture joint height", gesture_y)?;
        let reference_y = validate_finite("reference joint height", reference_y)?;
        let timestamp_ms = validate_finite("timestamp", timestamp_ms)?;

        if gesture_y <= reference_y {
            self.release();
            return Ok(None);
        }

        match self.state() {
            WindowState::Collecting { filled } => {
                self.window.push(Sample::new(timestamp_ms, gesture_y));
                log::trace!(
                    "gesture sample {}/{}: y={:.4} m at {} ms",
                    filled + 1,
                    self.capacity(),
                    gesture_y,
                    timestamp_ms
                );
                Ok(None)
            }
            WindowState::Full => self.complete(timestamp_ms).map(Some),
        }
    }

    /// Process a sensor frame, following its first tracked skeleton.
    ///
    /// Frames without a tracked skeleton are ignored.
    pub fn process_frame(&mut self, frame: Option<&SkeletonFrame>) -> Result<Option<GestureResult>> {
        let Some(frame) = frame else {
            return Ok(None);
        };
        let Some(subject) = frame.first_tracked() else {
            return Ok(None);
        };

        let reference_joint = self.config.reference_joint;
        let reference_y = subject
            .joint_height(reference_joint)
            .ok_or(Error::MissingJoint(reference_joint))?;

        self.process(Some(&subject.joints), reference_y, frame.timestamp_ms)
    }

    /// Replay a sequence of frames, collecting every completed gesture.
    ///
    /// Stops at the first error.
    pub fn process_frames<'a, I>(&mut self, frames: I) -> Result<Vec<GestureResult>>
    where
        I: IntoIterator<Item = &'a SkeletonFrame>,
    {
        let mut results = Vec::new();
        for frame in frames {
            if let Some(result) = self.process_frame(Some(frame))? {
                results.push(result);
            }
        }
        Ok(results)
    }

    fn release(&mut self) {
        if self.config.release_policy == ReleasePolicy::Abandon
            && !self.window.is_empty()
            && !self.window.is_full()
        {
            log::debug!(
                "gesture released, abandoning window with {}/{} samples",
                self.window.len(),
                self.capacity()
            );
            self.window.reset();
        }
    }

    fn complete(&mut self, completed_at_ms: f64) -> Result<GestureResult> {
        let samples = self.window.as_slice();
        let window_start_ms = samples.first().map_or(completed_at_ms, |s| s.timestamp_ms);
        let window_end_ms = samples.last().map_or(completed_at_ms, |s| s.timestamp_ms);

        let outcome = average_interval_speed(samples, self.config.timing_policy, &mut self.speeds);
        self.window.reset();

        let speed = match outcome {
            Ok(speed) => speed,
            Err(e) => {
                log::debug!("gesture window discarded: {}", e);
                return Err(e);
            }
        };

        if speed.excluded > 0 {
            warn_once("degenerate sample intervals excluded from hand raise speed");
        }

        let result = GestureResult {
            average_speed_mps: speed.average_mps,
            interval_speeds: self.speeds.clone(),
            excluded_intervals: speed.excluded,
            window_start_ms,
            window_end_ms,
            completed_at_ms,
        };
        log::debug!("{} ({} ms window)", result, result.window_duration_ms());

        Ok(result)
    }
}
