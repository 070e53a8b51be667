use crate::error::{GeometryError, Result};
use crate::math::distance_2d::project_to_segment;
use crate::math::polygon_2d::left_normal;
use crate::math::{Aabb, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain, CurveProjection};

/// A bounded line segment from `start` to `end`.
///
/// The parametric form is arc-length based: `P(t) = start + t * direction`
/// for `t` in `[0, length]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    start: Point3,
    end: Point3,
    direction: Vector3,
    length: f64,
}

impl LineSegment {
    /// Creates a new segment between two points.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateCurve` if the points coincide.
    pub fn new(start: Point3, end: Point3) -> Result<Self> {
        let d = end - start;
        let length = d.norm();
        if length < TOLERANCE {
            return Err(GeometryError::DegenerateCurve(format!(
                "zero-length line at ({:.4}, {:.4})",
                start.x, start.y
            ))
            .into());
        }
        Ok(Self {
            start,
            end,
            direction: d / length,
            length,
        })
    }

    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> &Point3 {
        &self.end
    }

    /// Returns the unit direction vector of the segment.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Returns the segment translated by `distance` to the left of its direction.
    ///
    /// # Errors
    ///
    /// Never fails for a valid segment; the signature matches [`super::Arc::offset`].
    pub fn offset(&self, distance: f64) -> Result<Self> {
        let shift = left_normal(self.direction) * distance;
        Self::new(self.start + shift, self.end + shift)
    }

    /// Returns the sub-segment between arc-length parameters `t0 < t1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are out of range or too close together.
    pub fn sub_segment(&self, t0: f64, t1: f64) -> Result<Self> {
        check_range(t0, t1, self.length)?;
        Self::new(
            self.start + self.direction * t0,
            self.start + self.direction * t1,
        )
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            direction: -self.direction,
            length: self.length,
        }
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::new(self.start, self.end)
    }
}

impl Curve for LineSegment {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.start + self.direction * t)
    }

    fn tangent(&self, _t: f64) -> Result<Vector3> {
        Ok(self.direction)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.length)
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn project(&self, point: &Point3) -> CurveProjection {
        let (t, distance) = project_to_segment(point, &self.start, &self.end);
        CurveProjection {
            parameter: t * self.length,
            distance,
        }
    }

    fn is_closed(&self) -> bool {
        false
    }
}

pub(super) fn check_range(t0: f64, t1: f64, length: f64) -> Result<()> {
    for (parameter, value) in [("t0", t0), ("t1", t1)] {
        if value < -TOLERANCE || value > length + TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter,
                value,
                min: 0.0,
                max: length,
            }
            .into());
        }
    }
    if t1 - t0 < TOLERANCE {
        return Err(GeometryError::DegenerateCurve(format!(
            "empty parameter range [{t0}, {t1}]"
        ))
        .into());
    }
    Ok(())
}
