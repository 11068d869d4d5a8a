//! Skeleton frame types supplied by the depth sensor.
//!
//! Positions are in meters in the sensor's skeleton space: Y is vertical and
//! a larger Y is higher.

use std::collections::HashMap;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Joint positions of a single subject, keyed by joint.
pub type JointPositions = HashMap<JointId, Point3<f64>>;

/// Joints reported by the sensor skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointId {
    HipCenter,
    Spine,
    ShoulderCenter,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
}

/// How well the sensor is following a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingState {
    #[default]
    NotTracked,
    /// Only the subject's overall position is known; joints are unreliable.
    PositionOnly,
    Tracked,
}

/// One subject's skeleton in a frame.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    pub tracking_state: TrackingState,
    pub joints: JointPositions,
}

impl Skeleton {
    /// Create a fully tracked skeleton from joint positions.
    pub fn tracked(joints: JointPositions) -> Self {
        Self {
            tracking_state: TrackingState::Tracked,
            joints,
        }
    }

    /// Create a tracked skeleton from `(joint, [x, y, z])` pairs.
    pub fn from_joints<I>(joints: I) -> Self
    where
        I: IntoIterator<Item = (JointId, [f64; 3])>,
    {
        Self::tracked(
            joints
                .into_iter()
                .map(|(id, [x, y, z])| (id, Point3::new(x, y, z)))
                .collect(),
        )
    }

    pub fn is_tracked(&self) -> bool {
        self.tracking_state == TrackingState::Tracked
    }

    /// Position of a joint, if reported.
    pub fn joint(&self, id: JointId) -> Option<&Point3<f64>> {
        self.joints.get(&id)
    }

    /// Vertical (Y) coordinate of a joint, if reported.
    pub fn joint_height(&self, id: JointId) -> Option<f64> {
        self.joint(id).map(|p| p.y)
    }
}

/// All skeletons delivered by the sensor for one capture.
#[derive(Debug, Clone, Default)]
pub struct SkeletonFrame {
    /// Capture time in milliseconds.
    pub timestamp_ms: f64,
    pub skeletons: Vec<Skeleton>,
}

impl SkeletonFrame {
    pub fn new(timestamp_ms: f64, skeletons: Vec<Skeleton>) -> Self {
        Self {
            timestamp_ms,
            skeletons,
        }
    }

    /// The first fully tracked skeleton, which is the subject followed
    /// by the gesture estimator.
    pub fn first_tracked(&self) -> Option<&Skeleton> {
        self.skeletons.iter().find(|s| s.is_tracked())
    }
}
