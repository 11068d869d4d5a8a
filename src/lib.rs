//! # hand-raise-rs - Hand-Raise Speed Estimation
//!
//! Estimates how fast a tracked subject raises a hand from skeletal joint
//! frames delivered by a depth sensor.
//!
//! While the hand is above the head, the hand height is sampled once per
//! frame into a fixed-size window. When the window is full, the next raised
//! frame completes the gesture and the average upward speed over the
//! window's intervals is reported.
//!
//! ## Features
//!
//! - Fixed-capacity sample window with an explicit two-state lifecycle
//! - Interval-averaged speed to smooth per-frame position jitter
//! - Configurable handling of duplicate timestamps and released gestures
//! - Sensor-frame entry point that follows the first tracked skeleton
//!
//! ## Example
//!
//! ```rust
//! use hand_raise_rs::{GestureSpeedEstimator, JointId, Skeleton, SkeletonFrame};
//!
//! let mut estimator = GestureSpeedEstimator::new(3).unwrap();
//!
//! let mut completed = None;
//! for (i, hand_y) in [1.6, 1.7, 1.8, 1.9].into_iter().enumerate() {
//!     let skeleton = Skeleton::from_joints([
//!         (JointId::Head, [0.0, 1.5, 2.0]),
//!         (JointId::HandRight, [0.2, hand_y, 2.0]),
//!     ]);
//!     let frame = SkeletonFrame::new(i as f64 * 100.0, vec![skeleton]);
//!     completed = estimator.process_frame(Some(&frame)).unwrap();
//! }
//!
//! let result = completed.unwrap();
//! assert!((result.average_speed_mps - 1.0).abs() < 1e-9);
//! ```

// Public modules
pub mod skeleton;
pub mod sample;
pub mod speed;
pub mod estimator;
pub mod utils;

// Re-exports for convenience
pub use skeleton::{JointId, JointPositions, Skeleton, SkeletonFrame, TrackingState};
pub use sample::{Sample, SampleWindow};
pub use speed::{TimingPolicy, WindowSpeed};
pub use estimator::{
    EstimatorConfig, GestureResult, GestureSpeedEstimator, ReleasePolicy, WindowState,
    DEFAULT_CAPACITY, MAX_CAPACITY,
};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    use crate::skeleton::JointId;

    /// Errors that can occur in the hand-raise library
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Degenerate timing: interval {interval} spans {elapsed_ms} ms")]
        DegenerateTiming { interval: usize, elapsed_ms: f64 },

        #[error("Missing joint: {0:?}")]
        MissingJoint(JointId),

        #[error("Invalid sample: {0}")]
        InvalidSample(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for hand-raise operations
    pub type Result<T> = std::result::Result<T, Error>;
}
