//! Corridor path produced by the upstream behavior planner

use crate::common::{Point2D, Pose2D};
use crate::messages::Header;

/// One point of the reference path
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathPoint {
    pub pose: Pose2D,
    /// Longitudinal velocity [m/s]
    pub longitudinal_velocity_mps: f64,
    /// Lateral velocity [m/s]
    pub lateral_velocity_mps: f64,
    /// Heading rate [rad/s]
    pub heading_rate_rps: f64,
    /// Longitudinal acceleration [m/s^2]
    pub acceleration_mps2: f64,
    /// Time offset from the path start [s]
    pub time_from_start: f64,
}

impl PathPoint {
    pub fn new(pose: Pose2D, longitudinal_velocity_mps: f64) -> Self {
        Self {
            pose,
            longitudinal_velocity_mps,
            ..Self::default()
        }
    }
}

/// Reference path plus the drivable corridor around it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorridorPath {
    pub header: Header,
    pub points: Vec<PathPoint>,
    pub left_bound: Vec<Point2D>,
    pub right_bound: Vec<Point2D>,
}

impl CorridorPath {
    pub fn new(
        header: Header,
        points: Vec<PathPoint>,
        left_bound: Vec<Point2D>,
        right_bound: Vec<Point2D>,
    ) -> Self {
        Self {
            header,
            points,
            left_bound,
            right_bound,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.points.iter().map(|p| p.pose.position())
    }
}
