use tracing::{debug, warn};

use crate::document::{Document, DoorId, ElementId, GeneratedElement};
use crate::error::Result;
use crate::math::units::mm_to_internal;
use crate::math::{Aabb, Vector3};
use crate::operations::query::ElementBoundingBox;

/// Doors found near each generated element.
///
/// Entries keep the order of the elements they were computed for, and
/// each door list keeps document order. Elements without doors have no
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpeningIntersections {
    entries: Vec<(ElementId, Vec<DoorId>)>,
}

impl OpeningIntersections {
    /// Doors recorded for `element`, empty when there are none.
    #[must_use]
    pub fn doors(&self, element: ElementId) -> &[DoorId] {
        self.entries
            .iter()
            .find(|(e, _)| *e == element)
            .map_or(&[], |(_, d)| d.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &[DoorId])> {
        self.entries.iter().map(|(e, d)| (*e, d.as_slice()))
    }

    /// Number of elements with at least one door.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of element and door pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.entries.iter().map(|(_, d)| d.len()).sum()
    }
}

/// Finds the doors whose volume overlaps each element's padded volume.
///
/// Surfaces are padded vertically only; strips are padded on every axis.
/// The test is deliberately coarse: false positives are settled later by
/// the cutter.
pub struct FindIntersections {
    elements: Vec<ElementId>,
    clearance_mm: f64,
}

impl FindIntersections {
    /// Creates a new `FindIntersections` query with a 200 mm clearance.
    #[must_use]
    pub fn new(elements: Vec<ElementId>) -> Self {
        Self {
            elements,
            clearance_mm: 200.0,
        }
    }

    #[must_use]
    pub fn with_clearance(mut self, clearance_mm: f64) -> Self {
        self.clearance_mm = clearance_mm;
        self
    }

    /// Executes the query. Doors whose geometry cannot be resolved are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if an element or its type is not found.
    pub fn execute(&self, doc: &Document) -> Result<OpeningIntersections> {
        let pad = mm_to_internal(self.clearance_mm);
        let doors: Vec<(DoorId, Aabb)> = doc
            .doors()
            .filter_map(|(id, _)| match doc.door_geometry(id) {
                Ok(g) => Some((id, g.bounding_box())),
                Err(e) => {
                    warn!(door = ?id, error = %e, "door skipped");
                    None
                }
            })
            .collect();

        let mut entries = Vec::new();
        for &element in &self.elements {
            let Some(bb) = ElementBoundingBox::new(element).execute(doc)? else {
                continue;
            };
            let padded = match doc.element(element)? {
                GeneratedElement::Surface(_) => bb.expanded(Vector3::new(0.0, 0.0, pad)),
                GeneratedElement::Strip(_) => bb.padded(pad),
            };
            let hits: Vec<DoorId> = doors
                .iter()
                .filter(|(_, door_bb)| padded.overlaps(door_bb))
                .map(|(id, _)| *id)
                .collect();
            if !hits.is_empty() {
                debug!(?element, doors = hits.len(), "element intersects doors");
                entries.push((element, hits));
            }
        }
        Ok(OpeningIntersections { entries })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::run_in_transaction;
    use crate::operations::generation::{CreateStrips, CreateSurface, RoomStamp};
    use crate::operations::query::ExtractBoundary;
    use crate::testing::RoomFixture;

    fn generate(fx: &mut RoomFixture) -> Vec<ElementId> {
        let boundary = ExtractBoundary::new(fx.room).execute(&fx.doc).unwrap();
        let stamp = RoomStamp::for_room(&fx.doc, fx.room).unwrap();
        let floor = CreateSurface::new(boundary.clone(), fx.floor_type, fx.level, 0.0, stamp.clone());
        let walls = CreateStrips::new(boundary, fx.finish_type, fx.level, 3000.0, 0.0, stamp);
        run_in_transaction(&mut fx.doc, "generate", |txn| {
            let mut ids = vec![floor.execute(txn)?];
            ids.extend(walls.execute(txn)?.created);
            Ok(ids)
        })
        .unwrap()
    }

    #[test]
    fn south_door_hits_floor_and_south_wall() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let door = fx.add_south_door(5.0, 3.0);
        let ids = generate(&mut fx);
        let found = FindIntersections::new(ids.clone()).execute(&fx.doc).unwrap();
        assert_eq!(found.doors(ids[0]), &[door]);
        assert_eq!(found.doors(ids[1]), &[door]);
        // The north strip is far from the door.
        assert!(found.doors(ids[3]).is_empty());
    }

    #[test]
    fn no_doors_is_an_empty_result() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let ids = generate(&mut fx);
        let found = FindIntersections::new(ids).execute(&fx.doc).unwrap();
        assert!(found.is_empty());
        assert_eq!(found.pair_count(), 0);
    }

    #[test]
    fn larger_clearance_only_adds_doors() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        fx.add_south_door(5.0, 3.0);
        let ids = generate(&mut fx);
        let mut previous = FindIntersections::new(ids.clone())
            .with_clearance(0.0)
            .execute(&fx.doc)
            .unwrap();
        for clearance in [50.0, 200.0, 1000.0, 5000.0] {
            let current = FindIntersections::new(ids.clone())
                .with_clearance(clearance)
                .execute(&fx.doc)
                .unwrap();
            for (element, doors) in previous.iter() {
                for door in doors {
                    assert!(current.doors(element).contains(door));
                }
            }
            previous = current;
        }
    }

    #[test]
    fn deterministic() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        fx.add_south_door(3.0, 3.0);
        fx.add_south_door(7.0, 3.0);
        let ids = generate(&mut fx);
        let a = FindIntersections::new(ids.clone()).execute(&fx.doc).unwrap();
        let b = FindIntersections::new(ids).execute(&fx.doc).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.doors(a.iter().next().unwrap().0).len(), 2);
    }
}
