use super::{Point3, Vector3};

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Shoelace contribution of a single directed edge `a -> b`.
#[must_use]
pub fn edge_area_term(a: &Point3, b: &Point3) -> f64 {
    0.5 * (a.x * b.y - b.x * a.y)
}

/// Signed area between a circular arc and its chord.
///
/// `sweep` is signed (positive = counter-clockwise), so an arc bulging to the
/// left of its chord adds area to a counter-clockwise loop.
#[must_use]
pub fn arc_segment_area(radius: f64, sweep: f64) -> f64 {
    0.5 * radius * radius * (sweep - sweep.sin())
}

/// Returns the left-pointing normal of a direction vector in the XY plane.
#[must_use]
pub fn left_normal(dir: Vector3) -> Vector3 {
    Vector3::new(-dir.y, dir.x, 0.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;
    use std::f64::consts::PI;

    fn unit_square() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area_2d(&unit_square()) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = unit_square();
        pts.reverse();
        assert!((signed_area_2d(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!((signed_area_2d(&[Point3::new(0.0, 0.0, 0.0)])).abs() < TOLERANCE);
        assert!((signed_area_2d(&[])).abs() < TOLERANCE);
    }

    #[test]
    fn edge_terms_sum_to_area() {
        let pts = unit_square();
        let sum: f64 = (0..4).map(|i| edge_area_term(&pts[i], &pts[(i + 1) % 4])).sum();
        assert!((sum - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn semicircle_segment_area() {
        // Upper half of the unit circle swept counter-clockwise.
        assert!((arc_segment_area(1.0, PI) - PI / 2.0).abs() < 1e-12);
        assert!((arc_segment_area(1.0, -PI) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn left_normal_basic() {
        let n = left_normal(Vector3::new(1.0, 0.0, 0.0));
        assert!((n.x).abs() < TOLERANCE);
        assert!((n.y - 1.0).abs() < TOLERANCE);
    }
}
