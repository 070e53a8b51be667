use crate::document::HostRef;
use crate::error::{GeometryError, Result};
use crate::math::{Aabb, Point3, SHORT_CURVE_TOLERANCE, TOLERANCE};

use super::curve::{BoundaryCurve, Curve};

/// A single boundary curve plus a back-reference to the host element that
/// produced it, if any. The reference is not ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySegment {
    pub curve: BoundaryCurve,
    pub host: Option<HostRef>,
}

impl BoundarySegment {
    #[must_use]
    pub fn new(curve: BoundaryCurve, host: Option<HostRef>) -> Self {
        Self { curve, host }
    }
}

/// A closed, end-to-end contiguous sequence of boundary segments.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLoop {
    segments: Vec<BoundarySegment>,
}

impl BoundaryLoop {
    /// Creates a loop, checking that consecutive segments meet and the last
    /// one returns to the start of the first.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateLoop` for an empty segment list, or
    /// `GeometryError::OpenLoop` when two consecutive endpoints are further
    /// apart than the host's short-curve tolerance.
    pub fn new(segments: Vec<BoundarySegment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(GeometryError::DegenerateLoop("loop has no segments".into()).into());
        }
        let n = segments.len();
        for (index, seg) in segments.iter().enumerate() {
            let next = &segments[(index + 1) % n];
            let gap = (seg.curve.end() - next.curve.start()).norm();
            if gap > SHORT_CURVE_TOLERANCE {
                return Err(GeometryError::OpenLoop { index, gap }.into());
            }
        }
        Ok(Self { segments })
    }

    /// Builds a loop of straight segments through `points`, closing back to
    /// the first point. All segments share the same host reference.
    ///
    /// # Errors
    ///
    /// Returns an error if two consecutive points coincide.
    pub fn polygon(points: &[Point3], host: Option<HostRef>) -> Result<Self> {
        let n = points.len();
        let segments = (0..n)
            .map(|i| {
                BoundaryCurve::line(points[i], points[(i + 1) % n])
                    .map(|curve| BoundarySegment::new(curve, host))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[BoundarySegment] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total length of all segments.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.segments.iter().map(|s| s.curve.length()).sum()
    }

    /// Signed enclosed area, exact for arcs. Positive for counter-clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        self.segments.iter().map(|s| s.curve.area_term()).sum()
    }

    #[must_use]
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Elevation of the loop's plane, taken from its first segment.
    #[must_use]
    pub fn elevation(&self) -> f64 {
        self.segments
            .first()
            .map_or(0.0, |s| s.curve.elevation())
    }

    /// Returns the loop traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .rev()
                .map(|s| BoundarySegment::new(s.curve.reversed(), s.host))
                .collect(),
        }
    }

    /// Returns the loop traversed counter-clockwise when `ccw` is `true`,
    /// clockwise otherwise.
    #[must_use]
    pub fn oriented(self, ccw: bool) -> Self {
        if self.is_counter_clockwise() == ccw {
            self
        } else {
            self.reversed()
        }
    }

    /// Returns the loop with every curve lifted to elevation `z`.
    ///
    /// # Errors
    ///
    /// Propagates curve reconstruction errors.
    pub fn at_elevation(&self, z: f64) -> Result<Self> {
        let segments = self
            .segments
            .iter()
            .map(|s| s.curve.at_elevation(z).map(|c| BoundarySegment::new(c, s.host)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.segments
            .iter()
            .map(|s| s.curve.bounding_box())
            .reduce(|a, b| a.union(&b))
    }

    /// Checks that the loop can bound a planar element.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateLoop` when the loop has fewer than
    /// three segments, no length, or encloses no area.
    pub fn validate_for_surface(&self) -> Result<()> {
        if self.segments.len() < 3 {
            return Err(GeometryError::DegenerateLoop(format!(
                "{} segments, at least 3 required",
                self.segments.len()
            ))
            .into());
        }
        if self.perimeter() < SHORT_CURVE_TOLERANCE {
            return Err(GeometryError::DegenerateLoop("zero net length".into()).into());
        }
        if self.signed_area().abs() < TOLERANCE {
            return Err(GeometryError::DegenerateLoop("encloses no area".into()).into());
        }
        Ok(())
    }
}

/// One outer loop plus zero or more hole loops, all in one level plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    outer: BoundaryLoop,
    holes: Vec<BoundaryLoop>,
}

impl Boundary {
    #[must_use]
    pub fn new(outer: BoundaryLoop, holes: Vec<BoundaryLoop>) -> Self {
        Self { outer, holes }
    }

    #[must_use]
    pub fn outer(&self) -> &BoundaryLoop {
        &self.outer
    }

    #[must_use]
    pub fn holes(&self) -> &[BoundaryLoop] {
        &self.holes
    }

    /// Outer loop first, then holes.
    pub fn loops(&self) -> impl Iterator<Item = &BoundaryLoop> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Every segment of every loop, outer loop first.
    pub fn segments(&self) -> impl Iterator<Item = &BoundarySegment> {
        self.loops().flat_map(|l| l.segments().iter())
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.loops().map(BoundaryLoop::len).sum()
    }

    /// Outer area minus hole areas.
    #[must_use]
    pub fn net_area(&self) -> f64 {
        self.outer.signed_area().abs()
            - self
                .holes
                .iter()
                .map(|h| h.signed_area().abs())
                .sum::<f64>()
    }

    /// Total length of all loops.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.loops().map(BoundaryLoop::perimeter).sum()
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.outer.bounding_box()
    }

    /// Returns the boundary with every loop lifted to elevation `z`.
    ///
    /// # Errors
    ///
    /// Propagates curve reconstruction errors.
    pub fn at_elevation(&self, z: f64) -> Result<Self> {
        Ok(Self {
            outer: self.outer.at_elevation(z)?,
            holes: self
                .holes
                .iter()
                .map(|h| h.at_elevation(z))
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> BoundaryLoop {
        BoundaryLoop::polygon(
            &[
                Point3::new(x0, y0, 0.0),
                Point3::new(x1, y0, 0.0),
                Point3::new(x1, y1, 0.0),
                Point3::new(x0, y1, 0.0),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn open_loop_is_rejected() {
        let a = BoundaryCurve::line(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)).unwrap();
        let b = BoundaryCurve::line(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0)).unwrap();
        let err = BoundaryLoop::new(vec![
            BoundarySegment::new(a, None),
            BoundarySegment::new(b, None),
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn rectangle_metrics() {
        let l = rect(0.0, 0.0, 4.0, 3.0);
        assert_eq!(l.len(), 4);
        assert_relative_eq!(l.perimeter(), 14.0);
        assert_relative_eq!(l.signed_area(), 12.0);
        assert!(l.is_counter_clockwise());
        assert!(l.validate_for_surface().is_ok());
    }

    #[test]
    fn reversed_flips_orientation_only() {
        let l = rect(0.0, 0.0, 4.0, 3.0);
        let r = l.reversed();
        assert_relative_eq!(r.signed_area(), -12.0);
        assert_relative_eq!(r.perimeter(), 14.0);
        assert_eq!(r.clone().oriented(true), l);
        let again = BoundaryLoop::new(r.segments().to_vec());
        assert!(again.is_ok());
    }

    #[test]
    fn net_area_subtracts_holes() {
        let b = Boundary::new(rect(0.0, 0.0, 10.0, 10.0), vec![rect(2.0, 2.0, 4.0, 5.0).reversed()]);
        assert_relative_eq!(b.net_area(), 94.0);
        assert_eq!(b.segment_count(), 8);
        assert_relative_eq!(b.perimeter(), 50.0);
    }

    #[test]
    fn two_segment_loop_is_degenerate_for_surfaces() {
        use crate::geometry::curve::Arc;
        use std::f64::consts::PI;
        let upper = BoundaryCurve::Arc(Arc::new(Point3::origin(), 1.0, 0.0, PI).unwrap());
        let lower = BoundaryCurve::Arc(Arc::new(Point3::origin(), 1.0, PI, PI).unwrap());
        let l = BoundaryLoop::new(vec![
            BoundarySegment::new(upper, None),
            BoundarySegment::new(lower, None),
        ])
        .unwrap();
        assert_relative_eq!(l.signed_area(), PI, epsilon = 1e-12);
        assert!(l.validate_for_surface().is_err());
    }
}
