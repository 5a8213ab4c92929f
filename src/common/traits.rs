//! Common traits defining the planner's seams with its host

use crate::common::error::PlannerError;
use crate::common::types::*;
use crate::crank_driving::{BoundaryPolyline, SegmentBounds};
use crate::messages::{CorridorPath, Odometry, Trajectory};

/// Source of the current time, in seconds on a monotonic base
pub trait Clock {
    fn now(&self) -> f64;
}

/// Read-only snapshot handed to a visualization sink once per ready cycle
#[derive(Debug, Clone, Copy)]
pub struct VisualizationFrame<'a> {
    pub ego_pose: &'a Pose2D,
    pub object_footprints: Option<&'a [Polygon]>,
    pub left_bound: &'a BoundaryPolyline,
    pub right_bound: &'a BoundaryPolyline,
    pub segment: SegmentBounds,
    pub path: &'a CorridorPath,
}

/// Consumer of planner state for rendering
///
/// Sinks only ever see shared borrows, so rendering cannot feed back into planning.
pub trait VisualizationSink {
    fn render(&mut self, frame: &VisualizationFrame<'_>);
}

/// Obstacle-aware velocity-space search (dynamic window style)
///
/// Not driven by the crank planner loop; hosts may plug one in alongside it.
pub trait VelocitySpacePlanner {
    /// Produce a candidate trajectory from the current vehicle state
    fn plan(&self, current: &Odometry, obstacles: &[Polygon]) -> Result<Trajectory, PlannerError>;
}
