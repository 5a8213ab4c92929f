//! Crank Driving Planner Module
//!
//! Local maneuver planner for narrow crank (offset / S-shaped) corridors.
//! While the vehicle makes progress the reference path is forwarded as is;
//! once it has been stationary long enough, one trajectory with a lateral
//! offset behind the vehicle is emitted, followed by a cooldown.
//!
//! # Components
//!
//! - `readiness`: tracks which inputs have been observed
//! - `progress_tracker`: active segment along the left/right boundaries
//! - `maneuver`: drive / stop / planning state machine with its timers
//! - `deformer`: builds the laterally shifted trajectory
//! - `planner`: owns the components and exposes one handler per input
//!
//! # Example
//!
//! ```no_run
//! use crank_driving_planner::crank_driving::{CrankDrivingPlanner, CycleOutput};
//! use crank_driving_planner::common::SystemClock;
//! use crank_driving_planner::messages::CorridorPath;
//!
//! let mut planner = CrankDrivingPlanner::with_defaults(SystemClock::new());
//! match planner.on_corridor_path(CorridorPath::default()) {
//!     CycleOutput::Path(path) => println!("forward {} points", path.len()),
//!     CycleOutput::Trajectory(traj) => println!("publish {} points", traj.len()),
//!     CycleOutput::Idle => {}
//! }
//! ```

pub mod config;
pub mod readiness;
pub mod progress_tracker;
pub mod maneuver;
pub mod deformer;
pub mod planner;

// Re-exports
pub use config::{DeformerConfig, ManeuverConfig, PlannerConfig, StopTimerMode, TrackerConfig};
pub use readiness::{InputKind, ReadinessGate};
pub use progress_tracker::{BoundaryPolyline, ProgressTracker, SegmentBounds};
pub use maneuver::{ManeuverDecision, ManeuverStateMachine, VehicleState};
pub use deformer::TrajectoryDeformer;
pub use planner::{CrankDrivingPlanner, CycleOutput};
