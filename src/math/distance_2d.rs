use std::f64::consts::TAU;

use super::Point3;

/// Projects point `p` onto the segment `a -> b` in the XY plane.
///
/// Returns `(t, distance)` where `t` in `[0, 1]` is the clamped position of
/// the closest point along the segment.
#[must_use]
pub fn project_to_segment(p: &Point3, a: &Point3, b: &Point3) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (0.0, ((p.x - a.x).powi(2) + (p.y - a.y).powi(2)).sqrt());
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = a.x + t * dx;
    let cy = a.y + t * dy;
    (t, ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
}

/// Projects point `p` onto a circular arc in the XY plane.
///
/// The arc is defined by `center`, `radius`, `start_angle` and signed `sweep`.
/// Returns `(fraction, distance)` where `fraction` in `[0, 1]` is the position
/// of the closest arc point measured from the start of the sweep.
#[must_use]
pub fn project_to_arc(
    p: &Point3,
    center: &Point3,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> (f64, f64) {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    let dist_to_center = (dx * dx + dy * dy).sqrt();

    if sweep.abs() > 1e-12 && dist_to_center > 1e-12 {
        if let Some(delta) = angle_offset_in_arc(dy.atan2(dx), start_angle, sweep) {
            return (delta / sweep, (dist_to_center - radius).abs());
        }
    }

    // Outside the angular range: closest endpoint wins.
    let end_angle = start_angle + sweep;
    let d0 = ((p.x - center.x - radius * start_angle.cos()).powi(2)
        + (p.y - center.y - radius * start_angle.sin()).powi(2))
    .sqrt();
    let d1 = ((p.x - center.x - radius * end_angle.cos()).powi(2)
        + (p.y - center.y - radius * end_angle.sin()).powi(2))
    .sqrt();
    if d0 <= d1 {
        (0.0, d0)
    } else {
        (1.0, d1)
    }
}

/// Returns whether `angle` lies within the arc's angular range.
#[must_use]
pub fn angle_in_arc_range(angle: f64, start_angle: f64, sweep: f64) -> bool {
    angle_offset_in_arc(angle, start_angle, sweep).is_some()
}

/// Signed angular offset of `angle` from `start_angle`, measured in the
/// direction of `sweep`, if it falls inside the sweep.
fn angle_offset_in_arc(angle: f64, start_angle: f64, sweep: f64) -> Option<f64> {
    let eps = 1e-10;
    let mut delta = angle - start_angle;

    if sweep > 0.0 {
        while delta < -eps {
            delta += TAU;
        }
        while delta > TAU + eps {
            delta -= TAU;
        }
        (delta >= -eps && delta <= sweep + eps).then(|| delta.clamp(0.0, sweep))
    } else {
        while delta > eps {
            delta -= TAU;
        }
        while delta < -TAU - eps {
            delta += TAU;
        }
        (delta <= eps && delta >= sweep - eps).then(|| delta.clamp(sweep, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-10;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn segment_perpendicular_projection() {
        let (t, d) = project_to_segment(&p(1.0, 1.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert!((t - 0.5).abs() < TOL, "t={t}");
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_endpoint_closest() {
        let (t, d) = project_to_segment(&p(-1.0, 0.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert!(t.abs() < TOL);
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_degenerate() {
        let (_, d) = project_to_segment(&p(3.0, 4.0), &p(0.0, 0.0), &p(0.0, 0.0));
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn arc_in_range() {
        // Point above a CCW upper semicircle: closest at the apex, halfway along.
        let (f, d) = project_to_arc(&p(0.0, 2.0), &p(0.0, 0.0), 1.0, 0.0, PI);
        assert!((f - 0.5).abs() < TOL, "f={f}");
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn arc_clockwise_in_range() {
        // Same semicircle traversed clockwise from (-1, 0).
        let (f, _) = project_to_arc(&p(-1.0, 1.0), &p(0.0, 0.0), 1.0, PI, -PI);
        assert!((f - 0.25).abs() < 1e-9, "f={f}");
    }

    #[test]
    fn arc_outside_range() {
        let (f, d) = project_to_arc(&p(2.0, -0.1), &p(0.0, 0.0), 1.0, 0.0, PI);
        assert!(f.abs() < TOL);
        assert!((d - (1.0_f64 + 0.01).sqrt()).abs() < 1e-9, "d={d}");
    }

    #[test]
    fn angle_range_wraps() {
        assert!(angle_in_arc_range(-0.1, 3.0 * PI / 2.0, PI));
        assert!(!angle_in_arc_range(PI, -PI / 4.0, PI / 2.0));
    }
}
