use tracing::{debug, warn};

use crate::config::FloorCutPolicy;
use crate::document::{
    DoorGeometry, DoorId, ElementId, GeneratedElement, MarkerId, Surface, SurfaceKind,
    ThresholdMarker, Transaction,
};
use crate::error::{OperationError, Result};
use crate::geometry::{Boundary, BoundaryCurve, BoundaryLoop, BoundarySegment, Curve, LineSegment};
use crate::math::interval::Interval;
use crate::math::polygon_2d::left_normal;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::door_footprint;

/// What happened to a floor at its doors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloorCutOutcome {
    /// Replacement floor when the outline was rerouted.
    pub replaced_by: Option<ElementId>,
    pub markers: Vec<MarkerId>,
}

/// One door opening assigned to a boundary segment.
#[derive(Debug, Clone, Copy)]
struct Notch {
    loop_index: usize,
    segment_index: usize,
    door: DoorId,
    span: Interval,
    depth: f64,
}

/// Extends a floor into its door openings.
///
/// Each door is matched to the parallel boundary line it sits in. With
/// [`FloorCutPolicy::Reclip`] that line is rerouted outward around the
/// opening, to a depth of the cut fraction times half the host wall
/// thickness, and the floor is replaced. With
/// [`FloorCutPolicy::MarkerOnly`] the floor is kept and a threshold line
/// is recorded at the same depth. Arc segments cannot be rerouted and get
/// a marker instead.
pub struct CutFloorAtOpenings {
    element: ElementId,
    doors: Vec<DoorId>,
    policy: FloorCutPolicy,
    depth_factor: f64,
}

impl CutFloorAtOpenings {
    #[must_use]
    pub fn new(
        element: ElementId,
        doors: Vec<DoorId>,
        policy: FloorCutPolicy,
        depth_factor: f64,
    ) -> Self {
        Self {
            element,
            doors,
            policy,
            depth_factor,
        }
    }

    /// Executes the operation inside `txn`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the element is not a
    /// floor, or a geometry error if the rerouted outline does not close.
    pub fn execute(&self, txn: &mut Transaction<'_>) -> Result<FloorCutOutcome> {
        let surface = match txn.element(self.element)? {
            GeneratedElement::Surface(s) if s.kind == SurfaceKind::Floor => s.clone(),
            _ => {
                return Err(
                    OperationError::InvalidInput("only floors are cut at door openings".into())
                        .into(),
                )
            }
        };
        let mut outcome = FloorCutOutcome::default();
        if self.policy == FloorCutPolicy::None || self.depth_factor <= 0.0 {
            return Ok(outcome);
        }

        let notches = self.notches(txn, &surface.boundary);
        let (lines, arcs): (Vec<Notch>, Vec<Notch>) = notches.into_iter().partition(|n| {
            matches!(
                segment_at(&surface.boundary, n.loop_index, n.segment_index).curve,
                BoundaryCurve::Line(_)
            )
        });
        for n in &arcs {
            warn!(door = ?n.door, "opening in a curved floor edge; drawing a threshold instead");
        }

        let (to_mark, to_reclip) = match self.policy {
            FloorCutPolicy::Reclip => (arcs, lines),
            _ => (lines.into_iter().chain(arcs).collect(), Vec::new()),
        };

        let mut floor = self.element;
        if !to_reclip.is_empty() {
            let boundary = reclip(&surface.boundary, &to_reclip)?;
            let id = txn.insert_element(GeneratedElement::Surface(Surface {
                boundary,
                ..surface.clone()
            }));
            txn.remove_element(self.element)?;
            debug!(old = ?self.element, new = ?id, openings = to_reclip.len(), "floor reclipped");
            outcome.replaced_by = Some(id);
            floor = id;
        }
        for n in &to_mark {
            let segment = segment_at(&surface.boundary, n.loop_index, n.segment_index);
            let Some(line) = threshold_line(&segment.curve, n) else {
                continue;
            };
            outcome.markers.push(txn.insert_marker(ThresholdMarker {
                floor,
                door: n.door,
                line,
            }));
        }
        Ok(outcome)
    }

    /// Matches every door to the closest parallel boundary segment within
    /// half a wall thickness.
    fn notches(&self, txn: &Transaction<'_>, boundary: &Boundary) -> Vec<Notch> {
        let mut notches = Vec::new();
        for &door in &self.doors {
            let geometry: DoorGeometry = match txn.door_geometry(door) {
                Ok(g) => g,
                Err(e) => {
                    warn!(?door, error = %e, "door skipped");
                    continue;
                }
            };
            let reach = geometry.depth / 2.0 + TOLERANCE.sqrt();
            let best = boundary
                .loops()
                .enumerate()
                .flat_map(|(li, l)| {
                    l.segments()
                        .iter()
                        .enumerate()
                        .map(move |(si, s)| (li, si, s))
                })
                .filter_map(|(li, si, s)| {
                    let span = door_footprint(&s.curve, &geometry, reach)?;
                    Some((li, si, span, s.curve.project(&geometry.center).distance))
                })
                .min_by(|a, b| a.3.total_cmp(&b.3));
            match best {
                Some((loop_index, segment_index, span, _)) => notches.push(Notch {
                    loop_index,
                    segment_index,
                    door,
                    span,
                    depth: self.depth_factor * geometry.depth / 2.0,
                }),
                None => debug!(?door, "door is not on the floor outline"),
            }
        }
        notches
    }
}

fn segment_at(boundary: &Boundary, loop_index: usize, segment_index: usize) -> &BoundarySegment {
    let l = if loop_index == 0 {
        boundary.outer()
    } else {
        &boundary.holes()[loop_index - 1]
    };
    &l.segments()[segment_index]
}

/// Outward unit normal of a line, away from the room on its left.
fn outward(line: &LineSegment) -> Vector3 {
    -left_normal(*line.direction())
}

/// The outer edge of a notch: the opening span pushed outward by its depth.
fn threshold_line(curve: &BoundaryCurve, notch: &Notch) -> Option<LineSegment> {
    if notch.depth <= TOLERANCE {
        return None;
    }
    let a = curve.evaluate(notch.span.lo).ok()?;
    let b = curve.evaluate(notch.span.hi).ok()?;
    let shift = match curve {
        BoundaryCurve::Line(l) => outward(l),
        BoundaryCurve::Arc(_) => {
            let t = curve.tangent(0.5 * (notch.span.lo + notch.span.hi)).ok()?;
            -left_normal(t)
        }
    } * notch.depth;
    LineSegment::new(a + shift, b + shift).ok()
}

/// Rebuilds the outline with every notched line routed around its openings.
fn reclip(boundary: &Boundary, notches: &[Notch]) -> Result<Boundary> {
    let mut loops = Vec::with_capacity(1 + boundary.holes().len());
    for (li, l) in boundary.loops().enumerate() {
        let mut segments = Vec::with_capacity(l.len());
        for (si, segment) in l.segments().iter().enumerate() {
            let mut spans: Vec<(Interval, f64)> = notches
                .iter()
                .filter(|n| n.loop_index == li && n.segment_index == si && n.depth > TOLERANCE)
                .map(|n| (n.span, n.depth))
                .collect();
            match &segment.curve {
                BoundaryCurve::Line(line) if !spans.is_empty() => {
                    spans.sort_by(|a, b| a.0.lo.total_cmp(&b.0.lo));
                    segments.extend(notched_line(line, segment, &merge_spans(spans))?);
                }
                _ => segments.push(segment.clone()),
            }
        }
        loops.push(BoundaryLoop::new(segments)?);
    }
    let mut loops = loops.into_iter();
    let outer = loops
        .next()
        .ok_or_else(|| OperationError::Failed("floor outline vanished".into()))?;
    Ok(Boundary::new(outer, loops.collect()))
}

/// Merges overlapping spans, keeping the deepest depth of each group.
fn merge_spans(sorted: Vec<(Interval, f64)>) -> Vec<(Interval, f64)> {
    let mut merged: Vec<(Interval, f64)> = Vec::with_capacity(sorted.len());
    for (span, depth) in sorted {
        match merged.last_mut() {
            Some((last, d)) if span.lo <= last.hi + TOLERANCE => {
                last.hi = last.hi.max(span.hi);
                *d = d.max(depth);
            }
            _ => merged.push((span, depth)),
        }
    }
    merged
}

/// Replaces one straight edge by the same edge with rectangular detours
/// outward at each span.
fn notched_line(
    line: &LineSegment,
    original: &BoundarySegment,
    spans: &[(Interval, f64)],
) -> Result<Vec<BoundarySegment>> {
    let normal = outward(line);
    let at = |t: f64| -> Point3 { *line.start() + *line.direction() * t };
    let mut out = Vec::new();
    let mut push = |a: Point3, b: Point3, keep_host: bool| -> Result<()> {
        if (b - a).norm() > TOLERANCE.sqrt() {
            let host = if keep_host { original.host } else { None };
            out.push(BoundarySegment::new(BoundaryCurve::line(a, b)?, host));
        }
        Ok(())
    };

    let mut cursor = 0.0;
    for (span, depth) in spans {
        let shift = normal * *depth;
        let (p0, p1) = (at(span.lo), at(span.hi));
        push(at(cursor), p0, true)?;
        push(p0, p0 + shift, false)?;
        push(p0 + shift, p1 + shift, false)?;
        push(p1 + shift, p1, false)?;
        cursor = span.hi;
    }
    push(at(cursor), *line.end(), true)?;
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{run_in_transaction, MetadataField};
    use crate::operations::generation::{CreateSurface, RoomStamp};
    use crate::operations::query::ExtractBoundary;
    use crate::testing::{RoomFixture, HOST_WALL_WIDTH};
    use approx::assert_relative_eq;

    fn floor(fx: &mut RoomFixture) -> ElementId {
        let boundary = ExtractBoundary::new(fx.room).execute(&fx.doc).unwrap();
        let stamp = RoomStamp::for_room(&fx.doc, fx.room).unwrap();
        let op = CreateSurface::new(boundary, fx.floor_type, fx.level, 0.0, stamp);
        run_in_transaction(&mut fx.doc, "floors", |txn| op.execute(txn)).unwrap()
    }

    fn cut(
        fx: &mut RoomFixture,
        floor: ElementId,
        doors: Vec<DoorId>,
        policy: FloorCutPolicy,
        factor: f64,
    ) -> FloorCutOutcome {
        let op = CutFloorAtOpenings::new(floor, doors, policy, factor);
        run_in_transaction(&mut fx.doc, "floor cut", |txn| op.execute(txn)).unwrap()
    }

    #[test]
    fn reclip_adds_the_threshold_area() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let door = fx.add_south_door(5.0, 3.0);
        let id = floor(&mut fx);
        let outcome = cut(&mut fx, id, vec![door], FloorCutPolicy::Reclip, 1.0);
        let new_id = outcome.replaced_by.unwrap();
        assert!(fx.doc.element(id).is_err());

        let surface = fx.doc.element(new_id).unwrap().as_surface().unwrap();
        let depth = HOST_WALL_WIDTH / 2.0;
        assert_relative_eq!(surface.boundary.net_area(), 80.0 + 3.0 * depth, epsilon = 1e-9);
        assert_eq!(surface.boundary.outer().len(), 4 + 4);
        assert_eq!(surface.metadata.get(MetadataField::RoomNumber), Some("101"));
        assert!(outcome.markers.is_empty());
    }

    #[test]
    fn half_depth_uses_a_quarter_of_the_wall() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let door = fx.add_south_door(5.0, 3.0);
        let id = floor(&mut fx);
        let outcome = cut(&mut fx, id, vec![door], FloorCutPolicy::Reclip, 0.5);
        let surface = fx.doc.element(outcome.replaced_by.unwrap()).unwrap().as_surface().unwrap();
        assert_relative_eq!(
            surface.boundary.net_area(),
            80.0 + 3.0 * HOST_WALL_WIDTH / 4.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn marker_only_keeps_the_floor() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let door = fx.add_south_door(5.0, 3.0);
        let id = floor(&mut fx);
        let outcome = cut(&mut fx, id, vec![door], FloorCutPolicy::MarkerOnly, 1.0);
        assert!(outcome.replaced_by.is_none());
        assert_eq!(outcome.markers.len(), 1);
        let (_, marker) = fx.doc.markers().next().unwrap();
        assert_eq!(marker.floor, id);
        assert_relative_eq!(marker.line.length(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(marker.line.start().y, -HOST_WALL_WIDTH / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_depth_or_no_policy_is_a_no_op() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let door = fx.add_south_door(5.0, 3.0);
        let id = floor(&mut fx);
        assert_eq!(cut(&mut fx, id, vec![door], FloorCutPolicy::Reclip, 0.0), FloorCutOutcome::default());
        assert_eq!(cut(&mut fx, id, vec![door], FloorCutPolicy::None, 1.0), FloorCutOutcome::default());
        assert!(fx.doc.element(id).is_ok());
    }

    #[test]
    fn door_at_a_corner_keeps_the_outline_closed() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let door = fx.add_south_door(1.5, 3.0);
        let id = floor(&mut fx);
        let outcome = cut(&mut fx, id, vec![door], FloorCutPolicy::Reclip, 1.0);
        let surface = fx.doc.element(outcome.replaced_by.unwrap()).unwrap().as_surface().unwrap();
        assert_eq!(surface.boundary.outer().len(), 4 + 3);
        assert_relative_eq!(surface.boundary.net_area(), 80.0 + 3.0 * 0.25, epsilon = 1e-9);
    }
}
