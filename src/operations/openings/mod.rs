mod cut;
mod floor;
mod intersect;

pub use cut::{CutAtOpenings, CutOutcome};
pub use floor::{CutFloorAtOpenings, FloorCutOutcome};
pub use intersect::{FindIntersections, OpeningIntersections};

use std::f64::consts::FRAC_1_SQRT_2;

use crate::document::DoorGeometry;
use crate::geometry::{BoundaryCurve, Curve};
use crate::math::interval::Interval;

/// Projects a door's jambs onto `curve`, returning the covered parameter
/// range.
///
/// Returns `None` when the door runs across the curve rather than along
/// it (more than 45 degrees off), when its centre is further than
/// `max_distance` from the curve's carrier line or circle, or when the
/// footprint misses the curve's extent. The centre itself may lie past
/// either end of the curve.
pub(crate) fn door_footprint(
    curve: &BoundaryCurve,
    door: &DoorGeometry,
    max_distance: f64,
) -> Option<Interval> {
    if curve.carrier_distance(&door.center) > max_distance {
        return None;
    }
    let centre = curve.project(&door.center);
    let tangent = curve.tangent(centre.parameter).ok()?;
    if door.hand.dot(&tangent).abs() < FRAC_1_SQRT_2 {
        return None;
    }
    let a = curve.project(&door.left_edge()).parameter;
    let b = curve.project(&door.right_edge()).parameter;
    Interval::new(a, b).clip(0.0, curve.length())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use approx::assert_relative_eq;

    fn door(x: f64, y: f64, hand: Vector3) -> DoorGeometry {
        DoorGeometry {
            center: Point3::new(x, y, 0.0),
            hand,
            width: 3.0,
            depth: 0.5,
            sill: 0.0,
            head: 7.0,
        }
    }

    #[test]
    fn footprint_along_reversed_curve() {
        let curve = BoundaryCurve::line(Point3::new(10.0, 0.0, 0.0), Point3::origin()).unwrap();
        let fp = door_footprint(&curve, &door(4.0, -0.25, Vector3::x()), 1.0).unwrap();
        assert_relative_eq!(fp.lo, 4.5);
        assert_relative_eq!(fp.hi, 7.5);
    }

    #[test]
    fn far_or_perpendicular_doors_are_rejected() {
        let curve = BoundaryCurve::line(Point3::origin(), Point3::new(10.0, 0.0, 0.0)).unwrap();
        assert!(door_footprint(&curve, &door(5.0, 3.0, Vector3::x()), 1.0).is_none());
        assert!(door_footprint(&curve, &door(5.0, 0.0, Vector3::y()), 1.0).is_none());
    }

    #[test]
    fn door_centred_past_the_end_still_overlaps() {
        let curve = BoundaryCurve::line(Point3::origin(), Point3::new(5.0, 0.0, 0.0)).unwrap();
        let fp = door_footprint(&curve, &door(6.2, -0.25, Vector3::x()), 1.0).unwrap();
        assert_relative_eq!(fp.lo, 4.7, epsilon = 1e-12);
        assert_relative_eq!(fp.hi, 5.0, epsilon = 1e-12);
        assert!(door_footprint(&curve, &door(9.0, -0.25, Vector3::x()), 1.0).is_none());
    }

    #[test]
    fn footprint_is_clipped_to_curve() {
        let curve = BoundaryCurve::line(Point3::origin(), Point3::new(10.0, 0.0, 0.0)).unwrap();
        let fp = door_footprint(&curve, &door(0.5, 0.0, Vector3::x()), 1.0).unwrap();
        assert_relative_eq!(fp.lo, 0.0);
        assert_relative_eq!(fp.hi, 2.0);
    }
}
