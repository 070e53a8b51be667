mod arc;
mod line;

pub use arc::Arc;
pub use line::LineSegment;

use crate::error::Result;
use crate::math::{Aabb, Point3, Vector3};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }
}

/// Closest point on a curve to a query point, measured in plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveProjection {
    /// Arc-length parameter of the closest point, clamped to the domain.
    pub parameter: f64,
    /// Plan distance from the query point to the closest point.
    pub distance: f64,
}

/// Trait for bounded, arc-length parameterized plan curves.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the unit tangent vector at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns the curve length.
    fn length(&self) -> f64;

    /// Projects a point onto the curve in plan.
    fn project(&self, point: &Point3) -> CurveProjection;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;
}

/// A boundary curve: either a straight segment or a circular arc.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryCurve {
    Line(LineSegment),
    Arc(Arc),
}

impl BoundaryCurve {
    /// Convenience constructor for a straight segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn line(start: Point3, end: Point3) -> Result<Self> {
        LineSegment::new(start, end).map(Self::Line)
    }

    #[must_use]
    pub fn start(&self) -> Point3 {
        match self {
            Self::Line(l) => *l.start(),
            Self::Arc(a) => a.start(),
        }
    }

    #[must_use]
    pub fn end(&self) -> Point3 {
        match self {
            Self::Line(l) => *l.end(),
            Self::Arc(a) => a.end(),
        }
    }

    /// Elevation of the curve's plane.
    #[must_use]
    pub fn elevation(&self) -> f64 {
        self.start().z
    }

    /// Offsets the curve to the left of its direction of travel.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset collapses the curve.
    pub fn offset(&self, distance: f64) -> Result<Self> {
        match self {
            Self::Line(l) => l.offset(distance).map(Self::Line),
            Self::Arc(a) => a.offset(distance).map(Self::Arc),
        }
    }

    /// Returns the portion of the curve between arc-length parameters `t0 < t1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is invalid.
    pub fn sub_curve(&self, t0: f64, t1: f64) -> Result<Self> {
        match self {
            Self::Line(l) => l.sub_segment(t0, t1).map(Self::Line),
            Self::Arc(a) => a.sub_arc(t0, t1).map(Self::Arc),
        }
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.reversed()),
            Self::Arc(a) => Self::Arc(a.reversed()),
        }
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Self::Line(l) => l.bounding_box(),
            Self::Arc(a) => a.bounding_box(),
        }
    }

    /// Plan distance from `point` to the curve's carrier: the infinite line
    /// through a segment, or the full circle of an arc.
    #[must_use]
    pub fn carrier_distance(&self, point: &Point3) -> f64 {
        match self {
            Self::Line(l) => {
                let d = point - l.start();
                let dir = l.direction();
                (d.x * dir.y - d.y * dir.x).abs()
            }
            Self::Arc(a) => {
                let d = point - a.center();
                (d.x.hypot(d.y) - a.radius()).abs()
            }
        }
    }

    /// This curve's contribution to the signed area of a loop it belongs to.
    #[must_use]
    pub fn area_term(&self) -> f64 {
        let chord = crate::math::polygon_2d::edge_area_term(&self.start(), &self.end());
        match self {
            Self::Line(_) => chord,
            Self::Arc(a) => chord + a.segment_area(),
        }
    }

    /// Returns the curve with every point lifted to elevation `z`.
    ///
    /// # Errors
    ///
    /// Never fails for a valid curve.
    pub fn at_elevation(&self, z: f64) -> Result<Self> {
        match self {
            Self::Line(l) => {
                let lift = |p: &Point3| Point3::new(p.x, p.y, z);
                Self::line(lift(l.start()), lift(l.end()))
            }
            Self::Arc(a) => {
                let c = a.center();
                Arc::new(Point3::new(c.x, c.y, z), a.radius(), a.start_angle(), a.sweep())
                    .map(Self::Arc)
            }
        }
    }
}

impl Curve for BoundaryCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        match self {
            Self::Line(l) => l.evaluate(t),
            Self::Arc(a) => a.evaluate(t),
        }
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        match self {
            Self::Line(l) => l.tangent(t),
            Self::Arc(a) => a.tangent(t),
        }
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.length())
    }

    fn length(&self) -> f64 {
        match self {
            Self::Line(l) => l.length(),
            Self::Arc(a) => a.length(),
        }
    }

    fn project(&self, point: &Point3) -> CurveProjection {
        match self {
            Self::Line(l) => l.project(point),
            Self::Arc(a) => a.project(point),
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            Self::Line(l) => l.is_closed(),
            Self::Arc(a) => a.is_closed(),
        }
    }
}
