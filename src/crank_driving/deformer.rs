//! Trajectory deformer
//!
//! Converts the reference path into a trajectory and pushes the points
//! behind the vehicle's nearest path point sideways, with the shift growing
//! linearly away from the vehicle.
//!
//! The shift is applied along the global `y` axis rather than a locally
//! derived lane normal, which is only lateral where the corridor runs along
//! global `x`.

use itertools::Itertools;
use log::info;
use ordered_float::OrderedFloat;

use crate::common::{Point2D, Pose2D};
use crate::crank_driving::config::DeformerConfig;
use crate::messages::{CorridorPath, Trajectory};

#[derive(Debug, Clone)]
pub struct TrajectoryDeformer {
    config: DeformerConfig,
}

impl TrajectoryDeformer {
    pub fn new(config: DeformerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(DeformerConfig::default())
    }

    /// Index of the path point closest to `ego`, `None` for an empty path
    pub fn nearest_index(path: &CorridorPath, ego: &Point2D) -> Option<usize> {
        path.positions()
            .position_min_by_key(|p| OrderedFloat(p.distance(ego)))
    }

    /// Offset applied `step` points behind the nearest one
    pub fn offset_at(&self, step: usize) -> f64 {
        self.config.initial_offset + self.config.offset_increment * step as f64
    }

    pub fn deform(&self, reference: &CorridorPath, ego_pose: &Pose2D) -> Trajectory {
        let mut trajectory = Trajectory::from(reference);

        let nearest = match Self::nearest_index(reference, &ego_pose.position()) {
            Some(i) => i,
            None => return trajectory,
        };
        info!(
            "Deforming {} points, nearest index {}",
            trajectory.len(),
            nearest
        );

        // steps reaching before the path start are dropped
        for step in 0..self.config.steps.min(nearest + 1) {
            trajectory.points[nearest - step].pose.y -= self.offset_at(step);
        }
        trajectory
    }
}
