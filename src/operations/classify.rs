use tracing::debug;

use crate::document::{ElementId, StripTag, Transaction};
use crate::error::Result;
use crate::math::units::mm_to_internal;
use crate::math::Aabb;

/// Retags short strips that wrap structural columns.
///
/// A wall or column strip becomes a column strip when it is no longer than
/// the threshold and its padded bounding box touches a column; otherwise it
/// becomes a wall strip. The tag is derived from geometry alone, so running
/// the operation twice changes nothing the second time. Skirts are left
/// alone.
pub struct ClassifyColumns {
    strips: Vec<ElementId>,
    max_length_mm: f64,
    clearance_mm: f64,
}

impl ClassifyColumns {
    /// Creates a new `ClassifyColumns` operation with an 800 mm length limit
    /// and 20 mm of padding.
    #[must_use]
    pub fn new(strips: Vec<ElementId>) -> Self {
        Self {
            strips,
            max_length_mm: 800.0,
            clearance_mm: 20.0,
        }
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length_mm: f64) -> Self {
        self.max_length_mm = max_length_mm;
        self
    }

    #[must_use]
    pub fn with_clearance(mut self, clearance_mm: f64) -> Self {
        self.clearance_mm = clearance_mm;
        self
    }

    /// Executes the operation inside `txn` and returns how many tags changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a strip or its type is not found in the document.
    pub fn execute(&self, txn: &mut Transaction<'_>) -> Result<usize> {
        let columns: Vec<Aabb> = txn.columns().map(|(_, c)| c.bounding_box).collect();
        let max_length = mm_to_internal(self.max_length_mm);
        let clearance = mm_to_internal(self.clearance_mm);

        let mut changed = 0;
        for &id in &self.strips {
            let Some(strip) = txn.element(id)?.as_strip() else {
                continue;
            };
            if strip.tag == StripTag::Skirt {
                continue;
            }
            let thickness = txn.element_type(strip.type_id)?.width;
            let padded = strip.bounding_box(thickness).padded(clearance);
            let is_column = strip.length() <= max_length
                && columns.iter().any(|column| column.overlaps(&padded));
            let tag = if is_column {
                StripTag::Column
            } else {
                StripTag::Wall
            };
            if strip.tag != tag {
                if let Some(strip) = txn.element_mut(id)?.as_strip_mut() {
                    strip.tag = tag;
                }
                debug!(?id, tag = tag.label(), "strip retagged");
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{run_in_transaction, ColumnData, HostRef};
    use crate::geometry::{Boundary, BoundaryLoop};
    use crate::math::Point3;
    use crate::operations::generation::{CreateStrips, RoomStamp};
    use crate::testing::RoomFixture;

    /// A 10 x 8 room with a 0.6 x 0.6 column standing in its south-west
    /// corner; returns the wall strips, the column faces last.
    fn room_with_column() -> (RoomFixture, Vec<ElementId>) {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let column = fx.doc.add_column(ColumnData {
            bounding_box: Aabb::new(Point3::new(4.0, 3.0, 0.0), Point3::new(4.6, 3.6, 12.0)),
        });
        let outer = fx.doc.room(fx.room).unwrap().finish_loops[0].clone();
        let around = BoundaryLoop::polygon(
            &[
                Point3::new(4.0, 3.0, 0.0),
                Point3::new(4.0, 3.6, 0.0),
                Point3::new(4.6, 3.6, 0.0),
                Point3::new(4.6, 3.0, 0.0),
            ],
            Some(HostRef::Column(column)),
        )
        .unwrap();
        let boundary = Boundary::new(BoundaryLoop::new(outer).unwrap(), vec![around]);
        let stamp = RoomStamp::for_room(&fx.doc, fx.room).unwrap();
        let op = CreateStrips::new(boundary, fx.finish_type, fx.level, 3000.0, 0.0, stamp);
        let created = run_in_transaction(&mut fx.doc, "walls", |txn| op.execute(txn))
            .unwrap()
            .created;
        (fx, created)
    }

    fn classify(fx: &mut RoomFixture, strips: &[ElementId]) -> usize {
        let op = ClassifyColumns::new(strips.to_vec());
        run_in_transaction(&mut fx.doc, "columns", |txn| op.execute(txn)).unwrap()
    }

    fn tags(fx: &RoomFixture, strips: &[ElementId]) -> Vec<StripTag> {
        strips
            .iter()
            .map(|id| fx.doc.element(*id).unwrap().as_strip().unwrap().tag)
            .collect()
    }

    #[test]
    fn column_faces_are_tagged() {
        let (mut fx, strips) = room_with_column();
        assert_eq!(strips.len(), 8);
        assert_eq!(classify(&mut fx, &strips), 4);
        let t = tags(&fx, &strips);
        assert!(t[..4].iter().all(|t| *t == StripTag::Wall));
        assert!(t[4..].iter().all(|t| *t == StripTag::Column));
    }

    #[test]
    fn classification_is_idempotent() {
        let (mut fx, strips) = room_with_column();
        classify(&mut fx, &strips);
        let first = tags(&fx, &strips);
        assert_eq!(classify(&mut fx, &strips), 0);
        assert_eq!(tags(&fx, &strips), first);
    }

    #[test]
    fn long_strips_near_columns_stay_walls() {
        let (mut fx, strips) = room_with_column();
        let op = ClassifyColumns::new(strips.clone()).with_max_length(100.0);
        let changed = run_in_transaction(&mut fx.doc, "columns", |txn| op.execute(txn)).unwrap();
        assert_eq!(changed, 0);
        assert!(tags(&fx, &strips).iter().all(|t| *t == StripTag::Wall));
    }

    #[test]
    fn column_tag_is_rederived_from_geometry() {
        let (mut fx, strips) = room_with_column();
        fx.doc.element_mut(strips[0]).unwrap().as_strip_mut().unwrap().tag = StripTag::Column;
        classify(&mut fx, &strips);
        assert_eq!(tags(&fx, &strips)[0], StripTag::Wall);
    }
}
