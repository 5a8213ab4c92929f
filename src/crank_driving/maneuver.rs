//! Maneuver state machine
//!
//! Decides per planning cycle whether the reference path passes through,
//! a deformation is triggered, or a cooldown is still running.
//!
//! ```text
//!   Drive --(stationary > stop_duration)--> Stop
//!   Stop  --(v > 0)-----------------------> Drive
//!   Stop  --(path trigger, deform)--------> Planning
//!   Planning --(trigger after wait_duration)--> Drive
//! ```
//!
//! While in `Planning` odometry does not move the machine.

use std::fmt;

use log::{debug, info};

use crate::crank_driving::config::{ManeuverConfig, StopTimerMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    Drive,
    Stop,
    Planning,
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleState::Drive => "drive",
            VehicleState::Stop => "stop",
            VehicleState::Planning => "planning",
        };
        write!(f, "{}", name)
    }
}

/// What the current path-trigger cycle should do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManeuverDecision {
    /// Forward the reference path unchanged
    PassThrough,
    /// Emit one deformed trajectory
    Deform,
    /// Cooldown running, emit nothing
    Await { remaining: f64 },
    /// Cooldown just ended, back to driving, emit nothing
    CooldownExpired,
}

#[derive(Debug, Clone)]
pub struct ManeuverStateMachine {
    config: ManeuverConfig,
    state: VehicleState,
    stop_time: f64,
    trigger_time: Option<f64>,
    /// Stamp of the previous odometry sample and whether it was stationary
    last_motion: Option<(f64, bool)>,
}

impl ManeuverStateMachine {
    pub fn new(config: ManeuverConfig) -> Self {
        Self {
            config,
            state: VehicleState::Drive,
            stop_time: 0.0,
            trigger_time: None,
            last_motion: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ManeuverConfig::default())
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Seconds accumulated while stationary
    pub fn stop_time(&self) -> f64 {
        self.stop_time
    }

    /// Clock time of the last deformation
    pub fn trigger_time(&self) -> Option<f64> {
        self.trigger_time
    }

    fn transition(&mut self, to: VehicleState) {
        if self.state != to {
            info!("Vehicle state {} -> {}", self.state, to);
            self.state = to;
        }
    }

    /// Stationary time contributed by a sample at `now`.
    ///
    /// A measured gap only counts when the previous sample was stationary too.
    fn tick(&self, now: f64) -> f64 {
        match (self.config.stop_timer, self.last_motion) {
            (StopTimerMode::Measured, Some((prev, true))) => (now - prev).max(0.0),
            _ => self.config.nominal_tick,
        }
    }

    /// Feed one odometry sample
    pub fn on_motion(&mut self, longitudinal_velocity: f64, now: f64) {
        let dt = self.tick(now);
        self.last_motion = Some((now, longitudinal_velocity <= 0.0));

        if self.state == VehicleState::Planning {
            return;
        }

        if longitudinal_velocity > 0.0 {
            self.transition(VehicleState::Drive);
            self.stop_time = 0.0;
        } else {
            self.stop_time += dt;
        }

        if self.stop_time > self.config.stop_duration {
            self.transition(VehicleState::Stop);
        }
    }

    /// Feed one path-trigger event
    pub fn on_trigger(&mut self, now: f64) -> ManeuverDecision {
        match self.state {
            VehicleState::Drive => ManeuverDecision::PassThrough,
            VehicleState::Stop => {
                self.trigger_time = Some(now);
                self.transition(VehicleState::Planning);
                ManeuverDecision::Deform
            }
            VehicleState::Planning => {
                let elapsed = self.trigger_time.map_or(f64::INFINITY, |t| now - t);
                if elapsed < self.config.wait_duration {
                    let remaining = self.config.wait_duration - elapsed;
                    debug!("Remaining wait time {:.2}", remaining);
                    ManeuverDecision::Await { remaining }
                } else {
                    self.transition(VehicleState::Drive);
                    self.stop_time = 0.0;
                    ManeuverDecision::CooldownExpired
                }
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}
