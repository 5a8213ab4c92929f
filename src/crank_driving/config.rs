//! Planner configuration
//!
//! Defaults reproduce the tuning used on the crank course. Every table and
//! field is optional in TOML; missing values fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{PlannerError, PlannerResult};

/// How stationary time is accumulated between odometry samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopTimerMode {
    /// Add the measured gap between consecutive odometry samples
    Measured,
    /// Add `nominal_tick` per sample, assuming a constant input rate
    FixedTick,
}

impl Default for StopTimerMode {
    fn default() -> Self {
        StopTimerMode::Measured
    }
}

/// Corridor progress tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Distance to the next boundary point that counts as reaching it [m]
    pub advance_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            advance_threshold: 3.0,
        }
    }
}

/// Maneuver state machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuverConfig {
    /// Stationary time after which the vehicle counts as stalled [s]
    pub stop_duration: f64,
    /// Cooldown after a deformation before motion is tracked again [s]
    pub wait_duration: f64,
    /// Nominal odometry period [s]
    pub nominal_tick: f64,
    pub stop_timer: StopTimerMode,
}

impl Default for ManeuverConfig {
    fn default() -> Self {
        Self {
            stop_duration: 30.0,
            wait_duration: 10.0,
            nominal_tick: 0.1,
            stop_timer: StopTimerMode::Measured,
        }
    }
}

/// Trajectory deformer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeformerConfig {
    /// Number of points behind the nearest one that get shifted
    pub steps: usize,
    /// Offset applied at the nearest point [m]
    pub initial_offset: f64,
    /// Offset growth per step away from the nearest point [m]
    pub offset_increment: f64,
}

impl Default for DeformerConfig {
    fn default() -> Self {
        Self {
            steps: 20,
            initial_offset: 0.2,
            offset_increment: 0.25,
        }
    }
}

/// Top-level planner configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Also wait for a predicted-object set before planning
    pub require_objects: bool,
    pub tracker: TrackerConfig,
    pub maneuver: ManeuverConfig,
    pub deformer: DeformerConfig,
}

impl PlannerConfig {
    pub fn from_toml_str(content: &str) -> PlannerResult<Self> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        let positive = [
            ("tracker.advance_threshold", self.tracker.advance_threshold),
            ("maneuver.stop_duration", self.maneuver.stop_duration),
            ("maneuver.wait_duration", self.maneuver.wait_duration),
            ("maneuver.nominal_tick", self.maneuver.nominal_tick),
        ];
        for (name, value) in positive.iter() {
            if !(value.is_finite() && *value > 0.0) {
                return Err(PlannerError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        let d = &self.deformer;
        if !(d.initial_offset.is_finite() && d.offset_increment.is_finite()) {
            return Err(PlannerError::InvalidParameter(
                "deformer offsets must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
