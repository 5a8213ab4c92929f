//! Crank driving planner
//!
//! Owns the readiness gate, progress tracker, maneuver state machine and
//! trajectory deformer, and exposes one handler per input channel. Handlers
//! take `&mut self` and run to completion. The planner is `Send` whenever its
//! clock is, so hosts that dispatch from several threads can share it behind
//! a `Mutex`.

use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::common::{Clock, PlannerResult, Polygon, Pose2D, VisualizationFrame, VisualizationSink};
use crate::crank_driving::config::PlannerConfig;
use crate::crank_driving::deformer::TrajectoryDeformer;
use crate::crank_driving::maneuver::{ManeuverDecision, ManeuverStateMachine, VehicleState};
use crate::crank_driving::progress_tracker::{ProgressTracker, SegmentBounds};
use crate::crank_driving::readiness::{InputKind, ReadinessGate};
use crate::messages::{AccelerationSample, CorridorPath, Odometry, PredictedObjects, Trajectory};

/// Result of one corridor-path cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutput {
    /// Reference path forwarded unchanged
    Path(CorridorPath),
    /// Deformed trajectory, once per stall episode
    Trajectory(Trajectory),
    /// Nothing to publish this cycle
    Idle,
}

pub struct CrankDrivingPlanner<C: Clock> {
    clock: C,
    gate: ReadinessGate,
    tracker: ProgressTracker,
    maneuver: ManeuverStateMachine,
    deformer: TrajectoryDeformer,
    ego_pose: Option<Pose2D>,
    acceleration: Option<Vector3<f64>>,
    object_footprints: Option<Vec<Polygon>>,
    segment: Option<SegmentBounds>,
    sink: Option<Box<dyn VisualizationSink + Send>>,
}

impl<C: Clock> CrankDrivingPlanner<C> {
    pub fn new(config: PlannerConfig, clock: C) -> PlannerResult<Self> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    /// Planner with the default tuning
    pub fn with_defaults(clock: C) -> Self {
        Self::build(PlannerConfig::default(), clock)
    }

    fn build(config: PlannerConfig, clock: C) -> Self {
        info!("Start crank driving planner");
        Self {
            clock,
            gate: ReadinessGate::new(config.require_objects),
            tracker: ProgressTracker::new(config.tracker),
            maneuver: ManeuverStateMachine::new(config.maneuver),
            deformer: TrajectoryDeformer::new(config.deformer),
            ego_pose: None,
            acceleration: None,
            object_footprints: None,
            segment: None,
            sink: None,
        }
    }

    pub fn set_visualization_sink(&mut self, sink: Box<dyn VisualizationSink + Send>) {
        self.sink = Some(sink);
    }

    pub fn state(&self) -> VehicleState {
        self.maneuver.state()
    }

    pub fn stop_time(&self) -> f64 {
        self.maneuver.stop_time()
    }

    pub fn progress_index(&self) -> Option<usize> {
        self.tracker.index()
    }

    /// Segment reported by the last ready cycle
    pub fn segment(&self) -> Option<SegmentBounds> {
        self.segment
    }

    pub fn ego_pose(&self) -> Option<Pose2D> {
        self.ego_pose
    }

    /// Latest linear acceleration
    pub fn acceleration(&self) -> Option<Vector3<f64>> {
        self.acceleration
    }

    /// Inputs that still have to arrive before a cycle can plan
    pub fn missing(&self) -> Vec<InputKind> {
        self.gate.missing()
    }

    pub fn is_ready(&self) -> bool {
        self.gate.missing().is_empty()
    }

    pub fn on_odometry(&mut self, odometry: Odometry) {
        let now = self.clock.now();
        self.maneuver.on_motion(odometry.longitudinal_velocity(), now);
        self.ego_pose = Some(odometry.pose);
        self.gate.mark_received(InputKind::Odometry);
    }

    pub fn on_acceleration(&mut self, sample: AccelerationSample) {
        debug!(
            "Acceleration [{:.3}, {:.3}, {:.3}]",
            sample.linear.x, sample.linear.y, sample.linear.z
        );
        self.acceleration = Some(sample.linear);
        self.gate.mark_received(InputKind::Acceleration);
    }

    pub fn on_predicted_objects(&mut self, objects: PredictedObjects) {
        debug!("Objects num {}", objects.objects.len());
        self.object_footprints = Some(objects.footprints());
        self.gate.mark_received(InputKind::PredictedObjects);
    }

    /// Run one planning cycle for a new reference path
    pub fn on_corridor_path(&mut self, path: CorridorPath) -> CycleOutput {
        debug!("Vehicle state is {}", self.maneuver.state());
        self.gate.mark_received(InputKind::CorridorPath);

        if !self.gate.is_ready() {
            info!("Not ready, forwarding reference path");
            return CycleOutput::Path(path);
        }
        let ego_pose = match self.ego_pose {
            Some(pose) => pose,
            None => return CycleOutput::Path(path),
        };

        if let Err(e) = self.tracker.set_boundaries_once(&path.left_bound, &path.right_bound) {
            warn!("{}, forwarding reference path", e);
            return CycleOutput::Path(path);
        }
        self.segment = self.tracker.update(&ego_pose.position());
        self.render(&ego_pose, &path);

        match self.maneuver.on_trigger(self.clock.now()) {
            ManeuverDecision::PassThrough => CycleOutput::Path(path),
            ManeuverDecision::Deform => {
                info!("Publish deformed trajectory");
                CycleOutput::Trajectory(self.deformer.deform(&path, &ego_pose))
            }
            ManeuverDecision::Await { .. } | ManeuverDecision::CooldownExpired => CycleOutput::Idle,
        }
    }

    fn render(&mut self, ego_pose: &Pose2D, path: &CorridorPath) {
        let sink = match self.sink.as_mut() {
            Some(sink) => sink,
            None => return,
        };
        if let (Some(left_bound), Some(right_bound), Some(segment)) =
            (self.tracker.left_bound(), self.tracker.right_bound(), self.segment)
        {
            sink.render(&VisualizationFrame {
                ego_pose,
                object_footprints: self.object_footprints.as_deref(),
                left_bound,
                right_bound,
                segment,
                path,
            });
        }
    }

    /// Forget all inputs and start a new approach
    pub fn reset(&mut self) {
        info!("Resetting crank driving planner");
        self.gate.clear();
        self.tracker.reset();
        self.maneuver.reset();
        self.ego_pose = None;
        self.acceleration = None;
        self.object_footprints = None;
        self.segment = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ManualClock, Point2D, PlannerError, SystemClock};
    use crate::crank_driving::config::StopTimerMode;
    use crate::messages::{Header, ObjectShape, PathPoint, PredictedObject};
    use std::sync::{Arc, Mutex};

    fn corridor_path() -> CorridorPath {
        let points = (0..100)
            .map(|i| PathPoint::new(Pose2D::new(i as f64, 0.0, 0.0), 2.0))
            .collect();
        let left = (0..21).map(|i| Point2D::new(i as f64 * 5.0, 2.0)).collect();
        let right = (0..21).map(|i| Point2D::new(i as f64 * 5.0, -2.0)).collect();
        CorridorPath::new(Header::new(0.0, "map"), points, left, right)
    }

    fn odometry(x: f64, v: f64) -> Odometry {
        Odometry::new(Header::default(), Pose2D::new(x, 0.0, 0.0), v)
    }

    fn ready_planner() -> (CrankDrivingPlanner<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0.0);
        let mut planner = CrankDrivingPlanner::with_defaults(clock.clone());
        planner.on_acceleration(AccelerationSample::new(Header::default(), 0.0, 0.0, 0.0));
        planner.on_odometry(odometry(40.0, 1.0));
        (planner, clock)
    }

    /// Hold the vehicle still at `x` until the stall is declared
    fn stall(planner: &mut CrankDrivingPlanner<ManualClock>, clock: &ManualClock, x: f64) {
        for _ in 0..301 {
            clock.advance(0.1);
            planner.on_odometry(odometry(x, 0.0));
        }
        assert_eq!(planner.state(), VehicleState::Stop);
    }

    #[test]
    fn test_passthrough_until_ready() {
        let clock = ManualClock::new(0.0);
        let mut planner = CrankDrivingPlanner::with_defaults(clock.clone());
        let path = corridor_path();

        assert_eq!(planner.on_corridor_path(path.clone()), CycleOutput::Path(path.clone()));
        planner.on_odometry(odometry(0.0, 0.0));
        assert_eq!(planner.on_corridor_path(path.clone()), CycleOutput::Path(path.clone()));
        assert!(planner.progress_index().is_none());
        assert!(planner.segment().is_none());

        planner.on_acceleration(AccelerationSample::new(Header::default(), 0.1, 0.0, 0.0));
        assert!(planner.is_ready());
    }

    #[test]
    fn test_passthrough_even_when_stalled_but_not_ready() {
        let clock = ManualClock::new(0.0);
        let mut planner = CrankDrivingPlanner::with_defaults(clock.clone());
        stall(&mut planner, &clock, 10.0);
        let path = corridor_path();
        // no acceleration sample yet
        assert_eq!(planner.on_corridor_path(path.clone()), CycleOutput::Path(path));
        assert_eq!(planner.state(), VehicleState::Stop);
    }

    #[test]
    fn test_driving_passes_reference_through() {
        let (mut planner, _clock) = ready_planner();
        let path = corridor_path();
        assert_eq!(planner.on_corridor_path(path.clone()), CycleOutput::Path(path));
        assert_eq!(planner.segment(), Some(SegmentBounds { start: 8, end: 9 }));
    }

    #[test]
    fn test_stall_episode() {
        let (mut planner, clock) = ready_planner();
        let path = corridor_path();
        planner.on_corridor_path(path.clone());
        stall(&mut planner, &clock, 40.0);

        let trajectory = match planner.on_corridor_path(path.clone()) {
            CycleOutput::Trajectory(t) => t,
            other => panic!("expected trajectory, got {:?}", other),
        };
        assert_eq!(trajectory.len(), path.len());
        assert!((path.points[40].pose.y - trajectory.points[40].pose.y - 0.2).abs() < 1e-10);
        assert!((path.points[21].pose.y - trajectory.points[21].pose.y - 4.95).abs() < 1e-10);
        assert_eq!(planner.state(), VehicleState::Planning);

        // latched: motion does not leave Planning
        clock.advance(0.1);
        planner.on_odometry(odometry(40.0, 2.0));
        assert_eq!(planner.state(), VehicleState::Planning);

        clock.advance(9.8);
        assert_eq!(planner.on_corridor_path(path.clone()), CycleOutput::Idle);
        assert_eq!(planner.state(), VehicleState::Planning);

        clock.advance(0.2);
        assert_eq!(planner.on_corridor_path(path.clone()), CycleOutput::Idle);
        assert_eq!(planner.state(), VehicleState::Drive);
        assert_eq!(planner.stop_time(), 0.0);

        assert_eq!(planner.on_corridor_path(path.clone()), CycleOutput::Path(path));
    }

    #[test]
    fn test_one_trajectory_per_episode() {
        let (mut planner, clock) = ready_planner();
        let path = corridor_path();
        stall(&mut planner, &clock, 40.0);

        let mut trajectories = 0;
        for _ in 0..50 {
            clock.advance(0.1);
            planner.on_odometry(odometry(40.0, 0.0));
            if let CycleOutput::Trajectory(_) = planner.on_corridor_path(path.clone()) {
                trajectories += 1;
            }
        }
        assert_eq!(trajectories, 1);
    }

    #[test]
    fn test_progress_monotonic_while_driving() {
        let (mut planner, clock) = ready_planner();
        let path = corridor_path();
        let mut last = 0;
        for step in 0..120 {
            clock.advance(0.1);
            planner.on_odometry(odometry(40.0 + step as f64 * 0.5, 5.0));
            planner.on_corridor_path(path.clone());
            let index = planner.progress_index().unwrap();
            assert!(index >= last);
            last = index;
        }
        assert_eq!(last, 19);
    }

    #[test]
    fn test_degenerate_corridor_is_not_fatal() {
        let (mut planner, _clock) = ready_planner();
        let mut bad = corridor_path();
        bad.right_bound.truncate(1);
        assert_eq!(planner.on_corridor_path(bad.clone()), CycleOutput::Path(bad));
        assert!(planner.progress_index().is_none());

        let good = corridor_path();
        assert_eq!(planner.on_corridor_path(good.clone()), CycleOutput::Path(good));
        assert!(planner.progress_index().is_some());
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Rendered {
        segment: SegmentBounds,
        footprints: Option<usize>,
        path_len: usize,
        left_len: usize,
    }

    struct RecordingSink(Arc<Mutex<Vec<Rendered>>>);

    impl VisualizationSink for RecordingSink {
        fn render(&mut self, frame: &VisualizationFrame<'_>) {
            self.0.lock().unwrap().push(Rendered {
                segment: frame.segment,
                footprints: frame.object_footprints.map(|f| f.len()),
                path_len: frame.path.len(),
                left_len: frame.left_bound.len(),
            });
        }
    }

    #[test]
    fn test_visualization_sink_receives_frames() {
        let (mut planner, _clock) = ready_planner();
        let frames = Arc::new(Mutex::new(Vec::new()));
        planner.set_visualization_sink(Box::new(RecordingSink(frames.clone())));
        let path = corridor_path();

        planner.on_corridor_path(path.clone());
        planner.on_predicted_objects(PredictedObjects::new(
            Header::default(),
            vec![PredictedObject::new(
                7,
                Pose2D::new(45.0, 0.0, 0.0),
                ObjectShape::BoundingBox { length: 4.0, width: 1.8 },
            )],
        ));
        planner.on_corridor_path(path);

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].footprints, None);
        assert_eq!(frames[1].footprints, Some(1));
        assert_eq!(frames[1].path_len, 100);
        assert_eq!(frames[1].left_len, 21);
        assert_eq!(planner.state(), VehicleState::Drive);
    }

    #[test]
    fn test_requires_objects_when_configured() {
        let config = PlannerConfig {
            require_objects: true,
            ..PlannerConfig::default()
        };
        let mut planner = CrankDrivingPlanner::new(config, ManualClock::new(0.0)).unwrap();
        planner.on_acceleration(AccelerationSample::new(Header::default(), 0.0, 0.0, 0.0));
        planner.on_odometry(odometry(40.0, 1.0));
        let path = corridor_path();
        assert_eq!(planner.on_corridor_path(path.clone()), CycleOutput::Path(path.clone()));
        assert_eq!(planner.missing(), vec![InputKind::PredictedObjects]);
        assert!(!planner.is_ready());
        assert!(planner.progress_index().is_none());

        planner.on_predicted_objects(PredictedObjects::default());
        assert!(planner.is_ready());
        planner.on_corridor_path(path);
        assert!(planner.progress_index().is_some());
    }

    #[test]
    fn test_missing_inputs_reported_in_order() {
        let mut planner = CrankDrivingPlanner::with_defaults(ManualClock::new(0.0));
        assert_eq!(
            planner.missing(),
            vec![InputKind::CorridorPath, InputKind::Acceleration, InputKind::Odometry]
        );
        planner.on_acceleration(AccelerationSample::new(Header::default(), 0.5, -0.1, 9.8));
        assert_eq!(planner.missing(), vec![InputKind::CorridorPath, InputKind::Odometry]);
        assert_eq!(planner.acceleration().map(|a| a.x), Some(0.5));
        // querying readiness has no side effects
        assert!(!planner.is_ready());
        assert!(!planner.is_ready());
        assert_eq!(planner.missing().len(), 2);
    }

    #[test]
    fn test_defaults_match_default_config() {
        let clock = ManualClock::new(0.0);
        let mut from_defaults = CrankDrivingPlanner::with_defaults(clock.clone());
        let mut from_config = CrankDrivingPlanner::new(PlannerConfig::default(), clock.clone()).unwrap();
        let path = corridor_path();
        for planner in [&mut from_defaults, &mut from_config].iter_mut() {
            planner.on_acceleration(AccelerationSample::new(Header::default(), 0.0, 0.0, 0.0));
            planner.on_odometry(odometry(40.0, 1.0));
            planner.on_corridor_path(path.clone());
        }
        assert_eq!(from_defaults.segment(), from_config.segment());
        assert_eq!(from_defaults.missing(), from_config.missing());
    }

    #[test]
    fn test_planner_is_send_with_system_clock() {
        fn assert_send<T: Send>() {}
        assert_send::<CrankDrivingPlanner<SystemClock>>();

        let planner = Mutex::new(CrankDrivingPlanner::with_defaults(SystemClock::new()));
        let frames = Arc::new(Mutex::new(Vec::new()));
        let handle = std::thread::spawn(move || {
            let mut planner = planner.lock().unwrap();
            planner.set_visualization_sink(Box::new(RecordingSink(frames.clone())));
            planner.on_acceleration(AccelerationSample::new(Header::default(), 0.0, 0.0, 0.0));
            planner.on_odometry(odometry(40.0, 1.0));
            planner.on_corridor_path(corridor_path());
            frames.lock().unwrap().len()
        });
        assert_eq!(handle.join().unwrap(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PlannerConfig::default();
        config.maneuver.wait_duration = -1.0;
        let result = CrankDrivingPlanner::new(config, ManualClock::new(0.0));
        assert!(matches!(result, Err(PlannerError::InvalidParameter(_))));
    }

    #[test]
    fn test_fixed_tick_mode_counts_samples() {
        let mut config = PlannerConfig::default();
        config.maneuver.stop_timer = StopTimerMode::FixedTick;
        let clock = ManualClock::new(0.0);
        let mut planner = CrankDrivingPlanner::new(config, clock.clone()).unwrap();
        // clock never moves: only the sample count matters
        for _ in 0..301 {
            planner.on_odometry(odometry(0.0, 0.0));
        }
        assert_eq!(planner.state(), VehicleState::Stop);
    }

    #[test]
    fn test_reset() {
        let (mut planner, clock) = ready_planner();
        planner.on_corridor_path(corridor_path());
        stall(&mut planner, &clock, 40.0);
        planner.reset();

        assert_eq!(planner.state(), VehicleState::Drive);
        assert!(planner.progress_index().is_none());
        assert!(planner.ego_pose().is_none());
        assert!(planner.acceleration().is_none());
        let path = corridor_path();
        assert_eq!(planner.on_corridor_path(path.clone()), CycleOutput::Path(path));
    }
}
