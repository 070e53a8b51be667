use tracing::{debug, warn};

use crate::document::{Document, RoomId};
use crate::error::{DocumentError, Result};
use crate::geometry::{Boundary, BoundaryLoop};

/// Reads a room's boundary as one counter-clockwise outer loop and
/// clockwise hole loops.
pub struct ExtractBoundary {
    room: RoomId,
}

impl ExtractBoundary {
    /// Creates a new `ExtractBoundary` query measuring to finish faces.
    #[must_use]
    pub fn new(room: RoomId) -> Self {
        Self { room }
    }

    /// Executes the query.
    ///
    /// The first loop reported by the room is the outer contour. When another
    /// loop encloses more area the first is not the outline, so the largest
    /// loop is promoted instead.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NoBoundaryFound` for an unplaced or unbounded
    /// room, or a geometry error when a loop is not closed.
    pub fn execute(&self, doc: &Document) -> Result<Boundary> {
        let room = doc.room(self.room)?;
        let mut loops = room
            .finish_loops
            .iter()
            .filter(|segments| !segments.is_empty())
            .map(|segments| BoundaryLoop::new(segments.clone()))
            .collect::<Result<Vec<_>>>()?;
        if loops.is_empty() {
            return Err(DocumentError::NoBoundaryFound {
                room: room.number.clone(),
            }
            .into());
        }

        let largest = loops
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.signed_area().abs().total_cmp(&b.signed_area().abs()))
            .map_or(0, |(i, _)| i);
        if largest != 0 && loops[largest].signed_area().abs() > loops[0].signed_area().abs() {
            warn!(
                room = %room.number,
                loop_index = largest,
                "first boundary loop is not the outline; using the largest loop"
            );
            loops.swap(0, largest);
        }

        let mut loops = loops.into_iter();
        let outer = loops
            .next()
            .ok_or_else(|| DocumentError::NoBoundaryFound {
                room: room.number.clone(),
            })?
            .oriented(true);
        let holes: Vec<_> = loops.map(|l| l.oriented(false)).collect();
        debug!(room = %room.number, holes = holes.len(), "extracted boundary");
        Ok(Boundary::new(outer, holes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{LevelData, RoomData};
    use crate::error::FinishError;
    use crate::geometry::BoundarySegment;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<BoundarySegment> {
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
        .segments()
        .to_vec()
    }

    #[test]
    fn unbounded_room_is_reported() {
        let mut doc = Document::new();
        let level = doc.add_level(LevelData::new("L_01", 0.0));
        let room = doc.add_room(RoomData::new("Store", "007", level));
        let err = ExtractBoundary::new(room).execute(&doc).unwrap_err();
        assert!(matches!(
            err,
            FinishError::Document(DocumentError::NoBoundaryFound { .. })
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn outer_ccw_holes_cw() {
        let mut doc = Document::new();
        let level = doc.add_level(LevelData::new("L_01", 0.0));
        let outer_cw = BoundaryLoop::new(rect(0.0, 0.0, 10.0, 8.0))
            .unwrap()
            .reversed()
            .segments()
            .to_vec();
        let room = doc.add_room(
            RoomData::new("Hall", "101", level)
                .with_finish_loops(vec![outer_cw, rect(4.0, 4.0, 5.0, 5.0)]),
        );
        let b = ExtractBoundary::new(room).execute(&doc).unwrap();
        assert!(b.outer().is_counter_clockwise());
        assert!(!b.holes()[0].is_counter_clockwise());
        assert_relative_eq!(b.net_area(), 79.0);
    }

    #[test]
    fn largest_loop_becomes_outer() {
        let mut doc = Document::new();
        let level = doc.add_level(LevelData::new("L_01", 0.0));
        let room = doc.add_room(
            RoomData::new("Hall", "101", level)
                .with_finish_loops(vec![rect(4.0, 4.0, 5.0, 5.0), rect(0.0, 0.0, 10.0, 8.0)]),
        );
        let b = ExtractBoundary::new(room).execute(&doc).unwrap();
        assert_relative_eq!(b.outer().signed_area(), 80.0);
        assert_eq!(b.holes().len(), 1);
    }
}
