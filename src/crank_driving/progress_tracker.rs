//! Corridor progress tracker
//!
//! Keeps an index into the left/right boundary polylines marking the last
//! segment the vehicle is known to have entered. The index only moves
//! forward and is clamped so that `index + 1` always addresses a valid point
//! on both sides.

use itertools::Itertools;
use log::{debug, info};
use ordered_float::OrderedFloat;

use crate::common::{PlannerError, PlannerResult, Point2D};
use crate::crank_driving::config::TrackerConfig;

/// One side of the drivable corridor, at least two points long
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolyline {
    points: Vec<Point2D>,
}

impl BoundaryPolyline {
    pub fn new(side: &'static str, points: Vec<Point2D>) -> PlannerResult<Self> {
        if points.len() < 2 {
            return Err(PlannerError::DegenerateBoundary {
                side,
                points: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the point closest to `target`, first one on ties
    pub fn nearest_index(&self, target: &Point2D) -> usize {
        self.points
            .iter()
            .position_min_by_key(|p| OrderedFloat(p.distance(target)))
            .unwrap_or(0)
    }
}

/// Active corridor segment, `end == start + 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBounds {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    config: TrackerConfig,
    bounds: Option<(BoundaryPolyline, BoundaryPolyline)>,
    index: Option<usize>,
}

impl ProgressTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            bounds: None,
            index: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(TrackerConfig::default())
    }

    /// Store the corridor boundaries unless they are already set.
    ///
    /// Returns `Ok(true)` when the boundaries were stored by this call.
    pub fn set_boundaries_once(&mut self, left: &[Point2D], right: &[Point2D]) -> PlannerResult<bool> {
        if self.bounds.is_some() {
            return Ok(false);
        }
        let left = BoundaryPolyline::new("left", left.to_vec())?;
        let right = BoundaryPolyline::new("right", right.to_vec())?;
        info!(
            "Corridor boundaries set: {} left / {} right points",
            left.len(),
            right.len()
        );
        self.bounds = Some((left, right));
        Ok(true)
    }

    pub fn left_bound(&self) -> Option<&BoundaryPolyline> {
        self.bounds.as_ref().map(|(l, _)| l)
    }

    pub fn right_bound(&self) -> Option<&BoundaryPolyline> {
        self.bounds.as_ref().map(|(_, r)| r)
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Largest index whose successor exists on both sides
    pub fn last_segment_start(&self) -> Option<usize> {
        self.bounds
            .as_ref()
            .map(|(l, r)| l.len().min(r.len()) - 2)
    }

    /// Report the active segment and decide whether the next cycle moves on.
    ///
    /// The first call seeds the index from the boundary points nearest to
    /// `ego`. Returns `None` while no boundaries are set.
    pub fn update(&mut self, ego: &Point2D) -> Option<SegmentBounds> {
        let (left, right) = self.bounds.as_ref()?;
        let last_start = left.len().min(right.len()) - 2;

        let current = match self.index {
            Some(i) => i,
            None => {
                // Both sides are searched independently; if they are not
                // index-aligned the min may pair mismatched points.
                let i = left
                    .nearest_index(ego)
                    .min(right.nearest_index(ego))
                    .min(last_start);
                debug!("Progress index initialized to {}", i);
                i
            }
        };

        let next = current + 1;
        let threshold = self.config.advance_threshold;
        let reached = ego.distance(&left.points()[next]) < threshold
            || ego.distance(&right.points()[next]) < threshold;

        self.index = Some(if reached && next <= last_start {
            debug!("Advancing progress index to {}", next);
            next
        } else {
            current
        });

        Some(SegmentBounds {
            start: current,
            end: next,
        })
    }

    /// Drop boundaries and index, ready for a new approach
    pub fn reset(&mut self) {
        self.bounds = None;
        self.index = None;
    }
}
