use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::{GeometryError, Result};
use crate::math::distance_2d::{angle_in_arc_range, project_to_arc};
use crate::math::polygon_2d::arc_segment_area;
use crate::math::{Aabb, Point3, Vector3, TOLERANCE};

use super::line::check_range;
use super::{Curve, CurveDomain, CurveProjection};

/// A circular arc lying in a horizontal plane.
///
/// Sweeps from `start_angle` by the signed angle `sweep` (positive is
/// counter-clockwise seen from above). Parameterized by arc length, so the
/// domain is `[0, radius * |sweep|]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    center: Point3,
    radius: f64,
    start_angle: f64,
    sweep: f64,
}

impl Arc {
    /// Creates a new arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or sweep is zero, or the sweep exceeds a
    /// full turn.
    pub fn new(center: Point3, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::DegenerateCurve("arc radius must be positive".into()).into());
        }
        if sweep.abs() < TOLERANCE {
            return Err(GeometryError::DegenerateCurve("arc sweep must be non-zero".into()).into());
        }
        if sweep.abs() > TAU + TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "sweep",
                value: sweep,
                min: -TAU,
                max: TAU,
            }
            .into());
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Signed sweep angle in radians.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    /// Normal of the arc plane: `+Z` for counter-clockwise arcs, `-Z` otherwise.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        Vector3::new(0.0, 0.0, self.sweep.signum())
    }

    #[must_use]
    pub fn start(&self) -> Point3 {
        self.point_at_angle(self.start_angle)
    }

    #[must_use]
    pub fn end(&self) -> Point3 {
        self.point_at_angle(self.start_angle + self.sweep)
    }

    fn point_at_angle(&self, angle: f64) -> Point3 {
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.center.z,
        )
    }

    fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + self.sweep.signum() * t / self.radius
    }

    /// Returns the concentric arc shifted by `distance` to the left of the
    /// direction of travel.
    ///
    /// Left of a counter-clockwise arc points at the centre, so the radius
    /// shrinks; a clockwise arc grows.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateCurve` if the offset collapses the radius.
    pub fn offset(&self, distance: f64) -> Result<Self> {
        let radius = self.radius - self.sweep.signum() * distance;
        if radius < TOLERANCE {
            return Err(GeometryError::DegenerateCurve(format!(
                "offset {distance} collapses arc of radius {}",
                self.radius
            ))
            .into());
        }
        Self::new(self.center, radius, self.start_angle, self.sweep)
    }

    /// Returns the sub-arc between arc-length parameters `t0 < t1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are out of range or too close together.
    pub fn sub_arc(&self, t0: f64, t1: f64) -> Result<Self> {
        check_range(t0, t1, self.length())?;
        Self::new(
            self.center,
            self.radius,
            self.angle_at(t0),
            self.sweep.signum() * (t1 - t0) / self.radius,
        )
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            center: self.center,
            radius: self.radius,
            start_angle: self.start_angle + self.sweep,
            sweep: -self.sweep,
        }
    }

    /// Bounding box from the endpoints plus every axis extreme inside the sweep.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let mut bb = Aabb::new(self.start(), self.end());
        for k in 0..4 {
            let angle = f64::from(k) * FRAC_PI_2 - PI;
            if angle_in_arc_range(angle, self.start_angle, self.sweep) {
                bb.include(&self.point_at_angle(angle));
            }
        }
        bb
    }

    /// Signed area between the arc and its chord.
    #[must_use]
    pub fn segment_area(&self) -> f64 {
        arc_segment_area(self.radius, self.sweep)
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.point_at_angle(self.angle_at(t)))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let a = self.angle_at(t);
        Ok(Vector3::new(-a.sin(), a.cos(), 0.0) * self.sweep.signum())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.length())
    }

    fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    fn project(&self, point: &Point3) -> CurveProjection {
        let (fraction, distance) =
            project_to_arc(point, &self.center, self.radius, self.start_angle, self.sweep);
        CurveProjection {
            parameter: fraction * self.length(),
            distance,
        }
    }

    fn is_closed(&self) -> bool {
        (self.sweep.abs() - TAU).abs() < TOLERANCE
    }
}
