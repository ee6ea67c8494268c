// src/geometry.rs - Joint angle estimation from three 2D landmarks
use crate::error::FrameError;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized image coordinates, both axes in [0, 1].
pub type Point2D = Point2<f64>;

/// Segments shorter than this are treated as zero-length.
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Joint angle in whole degrees, always in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(u16);

impl Angle {
    pub const fn new(degrees: u16) -> Self {
        Self(degrees % 360)
    }

    pub const fn degrees(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// The three points around the measured joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointTriple {
    pub proximal: Point2D,
    pub vertex: Point2D,
    pub distal: Point2D,
}

impl JointTriple {
    pub fn new(proximal: Point2D, vertex: Point2D, distal: Point2D) -> Self {
        Self { proximal, vertex, distal }
    }

    pub fn angle(&self) -> Result<Angle, FrameError> {
        compute_angle(self.proximal, self.vertex, self.distal)
    }
}

/// Angle at vertex `b` swept from ray b→a to ray b→c.
///
/// Uses the difference of the two ray headings, so the result is signed before
/// normalization: negative values are wrapped by adding 360 and the result is
/// rounded to the nearest degree. A zero-length ray has no heading and yields
/// `FrameError::DegenerateGeometry` rather than NaN.
pub fn compute_angle(a: Point2D, b: Point2D, c: Point2D) -> Result<Angle, FrameError> {
    let ba: Vector2<f64> = a - b;
    let bc: Vector2<f64> = c - b;

    if !ba.iter().chain(bc.iter()).all(|v| v.is_finite()) {
        return Err(FrameError::DegenerateGeometry);
    }
    if ba.norm() < MIN_SEGMENT_LENGTH || bc.norm() < MIN_SEGMENT_LENGTH {
        return Err(FrameError::DegenerateGeometry);
    }

    let mut degrees = (bc.y.atan2(bc.x) - ba.y.atan2(ba.x)).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }

    // Rounding 359.5.. up lands on 360, which wraps to 0.
    Ok(Angle::new(degrees.round() as u16))
}
