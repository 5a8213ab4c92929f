// Crank driving planner simulation.
//
// A vehicle follows an S-shaped crank corridor, gets stuck before the
// offset, and the planner emits one deformed trajectory after the stall.
// Odometry arrives with a jittered period; the final planning frame and the
// deformed trajectory are saved to img/crank_driving/crank_demo.png.
//
// usage: crank_demo [config.toml]
use std::error::Error;
use std::sync::{Arc, Mutex};

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};
use log::{info, LevelFilter};
use rand_distr::{Distribution, Normal};

use crank_driving_planner::common::{Clock, ManualClock, Point2D, Polygon, Pose2D, VisualizationFrame, VisualizationSink};
use crank_driving_planner::crank_driving::{CrankDrivingPlanner, CycleOutput, PlannerConfig, SegmentBounds};
use crank_driving_planner::messages::{
    AccelerationSample, CorridorPath, Header, ObjectShape, Odometry, PathPoint, PredictedObject,
    PredictedObjects, Trajectory,
};

const BLOCKED_AT_X: f64 = 24.0;
const SIM_TIME: f64 = 70.0;

/// Owned copy of the last frame the planner rendered
#[derive(Debug, Clone)]
struct Snapshot {
    ego: Pose2D,
    footprints: Vec<Polygon>,
    left: Vec<Point2D>,
    right: Vec<Point2D>,
    segment: SegmentBounds,
    path: Vec<Point2D>,
}

struct SnapshotSink(Arc<Mutex<Option<Snapshot>>>);

impl VisualizationSink for SnapshotSink {
    fn render(&mut self, frame: &VisualizationFrame<'_>) {
        let mut slot = match self.0.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(Snapshot {
            ego: *frame.ego_pose,
            footprints: frame.object_footprints.map(|f| f.to_vec()).unwrap_or_default(),
            left: frame.left_bound.points().to_vec(),
            right: frame.right_bound.points().to_vec(),
            segment: frame.segment,
            path: frame.path.positions().collect(),
        });
    }
}

/// Lateral centre line of the crank: straight, S-bend between x = 20 and 30, straight
fn crank_center(x: f64) -> f64 {
    let offset = 3.0;
    if x < 20.0 {
        0.0
    } else if x > 30.0 {
        offset
    } else {
        let s = (x - 20.0) / 10.0;
        offset * (3.0 * s.powi(2) - 2.0 * s.powi(3))
    }
}

fn crank_corridor(stamp: f64) -> CorridorPath {
    let points = (0..=120)
        .map(|i| {
            let x = i as f64 * 0.5;
            PathPoint::new(Pose2D::new(x, crank_center(x), 0.0), 10.0 / 3.6)
        })
        .collect();
    let left = (0..=30)
        .map(|i| {
            let x = i as f64 * 2.0;
            Point2D::new(x, crank_center(x) + 1.8)
        })
        .collect();
    let right = (0..=30)
        .map(|i| {
            let x = i as f64 * 2.0;
            Point2D::new(x, crank_center(x) - 1.8)
        })
        .collect();
    CorridorPath::new(Header::new(stamp, "map"), points, left, right)
}

fn xy(points: &[Point2D]) -> (Vec<f64>, Vec<f64>) {
    (points.iter().map(|p| p.x).collect(), points.iter().map(|p| p.y).collect())
}

fn plot(snapshot: &Snapshot, trajectory: Option<&Trajectory>, filename: &str) -> Result<(), String> {
    let mut fg = Figure::new();
    {
        let axes = fg
            .axes2d()
            .set_title("Crank Driving Planner", &[])
            .set_x_label("x [m]", &[])
            .set_y_label("y [m]", &[])
            .set_aspect_ratio(AutoOption::Fix(1.0));

        let (lx, ly) = xy(&snapshot.left);
        let (rx, ry) = xy(&snapshot.right);
        axes.lines(&lx, &ly, &[Caption("Left bound"), Color("black")]);
        axes.lines(&rx, &ry, &[Caption("Right bound"), Color("black")]);

        let seg = snapshot.segment;
        let active = [
            snapshot.left[seg.start],
            snapshot.left[seg.end],
            snapshot.right[seg.end],
            snapshot.right[seg.start],
        ];
        let (ax, ay) = xy(&active);
        axes.points(&ax, &ay, &[Caption("Active segment"), Color("orange"), PointSymbol('S'), PointSize(1.5)]);

        let (px, py) = xy(&snapshot.path);
        axes.lines(&px, &py, &[Caption("Reference path"), Color("blue")]);

        if let Some(traj) = trajectory {
            let points: Vec<Point2D> = traj.points.iter().map(|p| p.pose.position()).collect();
            let (tx, ty) = xy(&points);
            axes.lines(&tx, &ty, &[Caption("Deformed trajectory"), Color("red"), LineWidth(2.0)]);
        }

        for footprint in &snapshot.footprints {
            let mut closed = footprint.clone();
            if let Some(first) = footprint.first() {
                closed.push(*first);
            }
            let (ox, oy) = xy(&closed);
            axes.lines(&ox, &oy, &[Color("gray")]);
        }

        axes.points(&[snapshot.ego.x], &[snapshot.ego.y], &[Caption("Ego"), Color("cyan"), PointSymbol('O'), PointSize(2.0)]);
    }

    let output_path = format!("img/crank_driving/{}", filename);
    fg.save_to_png(&output_path, 1200, 600).map_err(|e| e.to_string())?;
    println!("Crank driving visualization saved to: {}", output_path);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    fast_log::init(fast_log::config::Config::new().console().level(LevelFilter::Info))?;

    let config = match std::env::args().nth(1) {
        Some(path) => PlannerConfig::from_file(path)?,
        None => PlannerConfig::default(),
    };

    let clock = ManualClock::new(0.0);
    let mut planner = CrankDrivingPlanner::new(config, clock.clone())?;
    let snapshot = Arc::new(Mutex::new(None));
    planner.set_visualization_sink(Box::new(SnapshotSink(snapshot.clone())));

    let blocker = PredictedObjects::new(
        Header::new(0.0, "map"),
        vec![PredictedObject::new(
            1,
            Pose2D::new(BLOCKED_AT_X + 4.0, crank_center(BLOCKED_AT_X + 4.0) + 1.0, 0.3),
            ObjectShape::BoundingBox { length: 4.5, width: 1.8 },
        )],
    );
    planner.on_predicted_objects(blocker);

    let period: Normal<f64> = Normal::new(0.1, 0.01)?;
    let mut rng = rand::thread_rng();
    let speed = 10.0 / 3.6;
    let mut x = 0.0;
    let mut tick = 0usize;
    let mut deformed = None;

    while clock.now() < SIM_TIME {
        let dt = period.sample(&mut rng).max(0.02);
        clock.advance(dt);
        let now = clock.now();

        let v = if x < BLOCKED_AT_X { speed } else { 0.0 };
        x = (x + v * dt).min(BLOCKED_AT_X);
        let pose = Pose2D::new(x, crank_center(x), 0.0);

        planner.on_acceleration(AccelerationSample::new(Header::new(now, "base_link"), 0.0, 0.0, 9.81));
        planner.on_odometry(Odometry::new(Header::new(now, "map"), pose, v));

        if tick % 5 == 0 {
            match planner.on_corridor_path(crank_corridor(now)) {
                CycleOutput::Trajectory(traj) => {
                    info!("t={:.1}s trajectory with {} points", now, traj.len());
                    deformed = Some(traj);
                }
                CycleOutput::Path(_) | CycleOutput::Idle => {}
            }
        }
        tick += 1;
    }

    info!(
        "Simulation finished: state {}, progress index {:?}",
        planner.state(),
        planner.progress_index()
    );
    log::logger().flush();

    std::fs::create_dir_all("img/crank_driving")?;
    let last = snapshot.lock().map_err(|e| e.to_string())?.clone();
    if let Some(snap) = last {
        plot(&snap, deformed.as_ref(), "crank_demo.png")?;
    }
    Ok(())
}
