//! Vehicle odometry and acceleration samples

use nalgebra::Vector3;

use crate::common::Pose2D;
use crate::messages::Header;

/// Planar twist in the vehicle body frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Twist2D {
    /// Longitudinal velocity [m/s]
    pub vx: f64,
    /// Lateral velocity [m/s]
    pub vy: f64,
    /// Yaw rate [rad/s]
    pub yaw_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Odometry {
    pub header: Header,
    pub pose: Pose2D,
    pub twist: Twist2D,
}

impl Odometry {
    pub fn new(header: Header, pose: Pose2D, longitudinal_velocity: f64) -> Self {
        Self {
            header,
            pose,
            twist: Twist2D {
                vx: longitudinal_velocity,
                ..Twist2D::default()
            },
        }
    }

    pub fn longitudinal_velocity(&self) -> f64 {
        self.twist.vx
    }
}

/// Linear acceleration [m/s^2], x/y/z
#[derive(Debug, Clone, PartialEq)]
pub struct AccelerationSample {
    pub header: Header,
    pub linear: Vector3<f64>,
}

impl AccelerationSample {
    pub fn new(header: Header, ax: f64, ay: f64, az: f64) -> Self {
        Self {
            header,
            linear: Vector3::new(ax, ay, az),
        }
    }
}
