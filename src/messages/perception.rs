//! Predicted objects from the perception stack
//!
//! Only footprints are derived here; the planner never plans against them.

use crate::common::{Point2D, Polygon, Pose2D};
use crate::messages::{Header, Twist2D};

/// Object extent in its own body frame
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    /// Box centred on the object pose, length along its heading [m]
    BoundingBox { length: f64, width: f64 },
    /// Outline relative to the object pose
    Polygon(Polygon),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictedObject {
    pub object_id: u64,
    pub pose: Pose2D,
    pub shape: ObjectShape,
    pub twist: Twist2D,
}

impl PredictedObject {
    pub fn new(object_id: u64, pose: Pose2D, shape: ObjectShape) -> Self {
        Self {
            object_id,
            pose,
            shape,
            twist: Twist2D::default(),
        }
    }

    /// Outline in the planar frame
    ///
    /// Boxes come out front-left, rear-left, rear-right, front-right.
    pub fn footprint(&self) -> Polygon {
        match &self.shape {
            ObjectShape::BoundingBox { length, width } => {
                let (hl, hw) = (length / 2.0, width / 2.0);
                [(hl, hw), (-hl, hw), (-hl, -hw), (hl, -hw)]
                    .iter()
                    .map(|&corner| self.pose.transform_point(&Point2D::from(corner)))
                    .collect()
            }
            ObjectShape::Polygon(outline) => outline
                .iter()
                .map(|p| self.pose.transform_point(p))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictedObjects {
    pub header: Header,
    pub objects: Vec<PredictedObject>,
}

impl PredictedObjects {
    pub fn new(header: Header, objects: Vec<PredictedObject>) -> Self {
        Self { header, objects }
    }

    pub fn footprints(&self) -> Vec<Polygon> {
        self.objects.iter().map(PredictedObject::footprint).collect()
    }
}
