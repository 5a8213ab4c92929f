//! Trajectory handed to the downstream controller

use crate::common::Pose2D;
use crate::messages::{CorridorPath, Header, PathPoint};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrajectoryPoint {
    pub time_from_start: f64,
    pub pose: Pose2D,
    pub longitudinal_velocity_mps: f64,
    pub lateral_velocity_mps: f64,
    pub acceleration_mps2: f64,
    pub heading_rate_rps: f64,
}

impl From<&PathPoint> for TrajectoryPoint {
    fn from(p: &PathPoint) -> Self {
        Self {
            time_from_start: p.time_from_start,
            pose: p.pose,
            longitudinal_velocity_mps: p.longitudinal_velocity_mps,
            lateral_velocity_mps: p.lateral_velocity_mps,
            acceleration_mps2: p.acceleration_mps2,
            heading_rate_rps: p.heading_rate_rps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    pub header: Header,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new(header: Header, points: Vec<TrajectoryPoint>) -> Self {
        Self { header, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<&CorridorPath> for Trajectory {
    /// 1:1 conversion, header and longitudinal profile carried over unchanged.
    fn from(path: &CorridorPath) -> Self {
        Self {
            header: path.header.clone(),
            points: path.points.iter().map(TrajectoryPoint::from).collect(),
        }
    }
}
