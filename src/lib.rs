//! crank_driving_planner - local maneuver planning for crank corridors
//!
//! This crate gates on live inputs, tracks progress along a dual-boundary
//! corridor, and decides when to deform the reference path laterally so a
//! stalled vehicle can make progress through tight offset turns.

// Core modules
pub mod common;
pub mod messages;

// Planner
pub mod crank_driving;

// Re-export common types for convenience
pub use common::{Point2D, Pose2D, Polygon};
pub use common::{Clock, ManualClock, SystemClock, VelocitySpacePlanner, VisualizationFrame, VisualizationSink};
pub use common::{PlannerError, PlannerResult};
pub use crank_driving::{CrankDrivingPlanner, CycleOutput, PlannerConfig, VehicleState};
