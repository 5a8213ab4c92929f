//! Input and output messages exchanged with the host
//!
//! All geometry is expressed in one planar frame; no transforms happen here.

pub mod path;
pub mod trajectory;
pub mod vehicle;
pub mod perception;

pub use path::{CorridorPath, PathPoint};
pub use trajectory::{Trajectory, TrajectoryPoint};
pub use vehicle::{AccelerationSample, Odometry, Twist2D};
pub use perception::{ObjectShape, PredictedObject, PredictedObjects};

/// Message header: stamp in seconds plus the frame the data is expressed in
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    pub stamp: f64,
    pub frame_id: String,
}

impl Header {
    pub fn new(stamp: f64, frame_id: &str) -> Self {
        Self {
            stamp,
            frame_id: frame_id.to_string(),
        }
    }
}
