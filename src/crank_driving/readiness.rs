//! Readiness gate
//!
//! Remembers which input channels have delivered at least one sample and
//! answers whether enough has been observed to plan. A missing input is
//! never an error: the caller forwards the reference path untouched until the gate opens.

use std::fmt;

use log::warn;

/// Input channel category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    CorridorPath,
    Acceleration,
    Odometry,
    PredictedObjects,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputKind::CorridorPath => "reference path",
            InputKind::Acceleration => "acceleration",
            InputKind::Odometry => "odometry",
            InputKind::PredictedObjects => "predicted objects",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadinessGate {
    require_objects: bool,
    path: bool,
    acceleration: bool,
    odometry: bool,
    objects: bool,
}

impl ReadinessGate {
    pub fn new(require_objects: bool) -> Self {
        Self {
            require_objects,
            ..Self::default()
        }
    }

    /// Note that at least one sample of `kind` has arrived
    pub fn mark_received(&mut self, kind: InputKind) {
        match kind {
            InputKind::CorridorPath => self.path = true,
            InputKind::Acceleration => self.acceleration = true,
            InputKind::Odometry => self.odometry = true,
            InputKind::PredictedObjects => self.objects = true,
        }
    }

    /// Input categories that have never been received
    pub fn missing(&self) -> Vec<InputKind> {
        [
            (InputKind::CorridorPath, self.path),
            (InputKind::Acceleration, self.acceleration),
            (InputKind::Odometry, self.odometry),
            (InputKind::PredictedObjects, self.objects || !self.require_objects),
        ]
        .iter()
        .filter(|(_, received)| !received)
        .map(|(kind, _)| *kind)
        .collect()
    }

    /// True once every required input has been seen; warns once per missing category
    pub fn is_ready(&self) -> bool {
        let missing = self.missing();
        for kind in &missing {
            warn!("The {} data has not been received yet", kind);
        }
        missing.is_empty()
    }

    /// Forget every received input
    pub fn clear(&mut self) {
        *self = Self::new(self.require_objects);
    }
}
