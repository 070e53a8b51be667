use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::ReportUnits;
use crate::document::{
    GeneratedElement, ReportField, RoomId, StripTag, SurfaceKind, Transaction,
};
use crate::error::{FinishError, MetadataError, Result};
use crate::math::units::{internal_area_to_square_meters, internal_to_meters};

/// What aggregation found for one room.
#[derive(Debug, Default)]
pub struct AggregateOutcome {
    /// Distinct type marks reported, over all sections.
    pub marks: usize,
    /// Elements counted into the report.
    pub elements: usize,
    /// Data-quality problems; the affected elements or texts were skipped.
    pub issues: Vec<FinishError>,
}

/// The report block an element contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Floors,
    Ceilings,
    Walls,
    Columns,
    Skirts,
}

impl Section {
    const ALL: [Self; 5] = [
        Self::Floors,
        Self::Ceilings,
        Self::Walls,
        Self::Columns,
        Self::Skirts,
    ];

    fn of(element: &GeneratedElement) -> Self {
        match element {
            GeneratedElement::Surface(s) => match s.kind {
                SurfaceKind::Floor => Self::Floors,
                SurfaceKind::Ceiling => Self::Ceilings,
            },
            GeneratedElement::Strip(s) => match s.tag {
                StripTag::Wall => Self::Walls,
                StripTag::Column => Self::Columns,
                StripTag::Skirt => Self::Skirts,
            },
        }
    }

    fn composition_field(self) -> ReportField {
        match self {
            Self::Floors => ReportField::FloorComposition,
            Self::Ceilings => ReportField::CeilingComposition,
            Self::Walls => ReportField::WallComposition,
            Self::Columns => ReportField::ColumnComposition,
            Self::Skirts => ReportField::SkirtComposition,
        }
    }

    fn measure_field(self) -> ReportField {
        match self {
            Self::Floors => ReportField::FloorArea,
            Self::Ceilings => ReportField::CeilingArea,
            Self::Walls => ReportField::WallArea,
            Self::Columns => ReportField::ColumnArea,
            Self::Skirts => ReportField::SkirtLength,
        }
    }

    /// Area in square metres, or length in metres for skirts.
    fn measure(self, element: &GeneratedElement) -> f64 {
        match element {
            GeneratedElement::Surface(s) => internal_area_to_square_meters(s.boundary.net_area()),
            GeneratedElement::Strip(s) if self == Self::Skirts => internal_to_meters(s.length()),
            GeneratedElement::Strip(s) => internal_area_to_square_meters(s.area()),
        }
    }
}

/// Totals of one type mark within a section.
#[derive(Debug, Default)]
struct MarkGroup {
    type_name: String,
    composition: Option<String>,
    total: f64,
    /// Ceiling height in metres, from the first ceiling seen.
    height: Option<f64>,
}

/// Writes the finish report of one room.
///
/// Every generated element stamped with the room's number on the room's
/// level is grouped by section and by the mark of its type. Each section
/// gets a composition text with one entry per mark and a text of summed
/// areas (lengths for skirts); ceilings also report their height. When
/// one mark carries different compositions the first one seen is kept.
pub struct AggregateRoom {
    room: RoomId,
    units: ReportUnits,
}

impl AggregateRoom {
    #[must_use]
    pub fn new(room: RoomId) -> Self {
        Self {
            room,
            units: ReportUnits::default(),
        }
    }

    #[must_use]
    pub fn with_units(mut self, units: ReportUnits) -> Self {
        self.units = units;
        self
    }

    /// Executes the operation inside `txn`.
    ///
    /// Elements whose type has no mark are left out and reported in the
    /// outcome; a mark without composition is reported and listed without
    /// composition text.
    ///
    /// # Errors
    ///
    /// Returns an error if the room or a referenced type is not found.
    pub fn execute(&self, txn: &mut Transaction<'_>) -> Result<AggregateOutcome> {
        let room = txn.room(self.room)?;
        let (number, level) = (room.number.clone(), room.level);

        let mut outcome = AggregateOutcome::default();
        let mut sections: BTreeMap<Section, BTreeMap<String, MarkGroup>> = BTreeMap::new();
        for (id, element) in txn.elements() {
            if element.level() != level || element.room_number() != Some(number.as_str()) {
                continue;
            }
            let ty = txn.element_type(element.type_id())?;
            let Some(mark) = ty.mark() else {
                warn!(?id, type_name = %ty.name, "type has no mark; element left out of the report");
                outcome.issues.push(
                    MetadataError::MissingTypeMark {
                        type_name: ty.name.clone(),
                    }
                    .into(),
                );
                continue;
            };

            let section = Section::of(element);
            let group = sections
                .entry(section)
                .or_default()
                .entry(mark.to_owned())
                .or_insert_with(|| MarkGroup {
                    type_name: ty.name.clone(),
                    composition: ty.composition.clone(),
                    ..MarkGroup::default()
                });
            if ty.composition.is_some() && ty.composition != group.composition {
                warn!(
                    mark,
                    kept = ?group.composition,
                    ignored = ?ty.composition,
                    "conflicting compositions for one mark"
                );
            }
            group.total += section.measure(element);
            if let GeneratedElement::Surface(s) = element {
                if section == Section::Ceilings && group.height.is_none() {
                    group.height = Some(internal_to_meters(s.height_offset));
                }
            }
            outcome.elements += 1;
        }

        let mut texts: BTreeMap<ReportField, String> = ReportField::ALL
            .into_iter()
            .map(|field| (field, String::new()))
            .collect();
        for section in Section::ALL {
            let Some(groups) = sections.get(&section) else {
                continue;
            };
            let suffix = if section == Section::Skirts {
                &self.units.length_suffix
            } else {
                &self.units.area_suffix
            };
            for (mark, group) in groups {
                outcome.marks += 1;
                let composition = texts.entry(section.composition_field()).or_default();
                match &group.composition {
                    Some(text) => {
                        composition.push_str(&format!("{mark}:\n{text}\n"));
                    }
                    None => {
                        outcome.issues.push(
                            MetadataError::MissingComposition {
                                type_name: group.type_name.clone(),
                            }
                            .into(),
                        );
                        composition.push_str(&format!("{mark}:\n"));
                    }
                }
                let measure = texts.entry(section.measure_field()).or_default();
                measure.push_str(&format!("{mark}: {:.2} {suffix}\n", group.total));
                if let Some(height) = group.height {
                    let text = texts.entry(ReportField::CeilingHeight).or_default();
                    text.push_str(&format!("{mark}: {height:.2} {}\n", self.units.length_suffix));
                }
            }
        }

        let room = txn.room_mut(self.room)?;
        for (field, text) in texts {
            room.set_report(field, text);
        }
        debug!(room = %number, marks = outcome.marks, elements = outcome.elements, "room aggregated");
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{run_in_transaction, ElementTypeData, TypeId, TypeKind};
    use crate::geometry::{Boundary, BoundaryLoop};
    use crate::math::units::SQUARE_METERS_PER_SQUARE_FOOT;
    use crate::math::Point3;
    use crate::operations::generation::{CreateStrips, CreateSurface, RoomStamp};
    use crate::operations::query::ExtractBoundary;
    use crate::testing::RoomFixture;

    /// A floor of exactly `square_meters` at the origin.
    fn floor_of(fx: &mut RoomFixture, ty: TypeId, square_meters: f64) {
        let width = square_meters / SQUARE_METERS_PER_SQUARE_FOOT;
        let outline = BoundaryLoop::polygon(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(width, 0.0, 0.0),
                Point3::new(width, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            None,
        )
        .unwrap();
        let stamp = RoomStamp::for_room(&fx.doc, fx.room).unwrap();
        let op = CreateSurface::new(Boundary::new(outline, Vec::new()), ty, fx.level, 0.0, stamp);
        run_in_transaction(&mut fx.doc, "floors", |txn| op.execute(txn)).unwrap();
    }

    fn aggregate(fx: &mut RoomFixture) -> AggregateOutcome {
        let op = AggregateRoom::new(fx.room);
        run_in_transaction(&mut fx.doc, "aggregate", |txn| op.execute(txn)).unwrap()
    }

    fn report(fx: &RoomFixture, field: ReportField) -> String {
        fx.doc.room(fx.room).unwrap().report(field).unwrap().to_owned()
    }

    #[test]
    fn same_mark_areas_are_summed() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let ty = fx.floor_type;
        floor_of(&mut fx, ty, 10.0);
        floor_of(&mut fx, ty, 15.0);
        let outcome = aggregate(&mut fx);
        assert_eq!(outcome.marks, 1);
        assert!(outcome.issues.is_empty());
        assert_eq!(report(&fx, ReportField::FloorArea), "П-1: 25.00 м²\n");
        assert_eq!(report(&fx, ReportField::FloorComposition), "П-1:\nКерамогранит 10 мм\n");
    }

    #[test]
    fn first_composition_wins_for_a_shared_mark() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let first = fx.floor_type;
        let second = fx.doc.add_type(
            ElementTypeData::new("АР_Пол_Линолеум", TypeKind::Floor, 0.1)
                .with_mark("П-1")
                .with_composition("Линолеум"),
        );
        floor_of(&mut fx, first, 4.0);
        floor_of(&mut fx, second, 6.0);
        let outcome = aggregate(&mut fx);
        assert_eq!(outcome.marks, 1);
        assert_eq!(report(&fx, ReportField::FloorArea), "П-1: 10.00 м²\n");
        assert!(report(&fx, ReportField::FloorComposition).contains("Керамогранит"));
    }

    #[test]
    fn missing_mark_is_reported_and_skipped() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let unmarked = fx
            .doc
            .add_type(ElementTypeData::new("АР_Пол_Без марки", TypeKind::Floor, 0.1));
        let marked = fx.floor_type;
        floor_of(&mut fx, unmarked, 5.0);
        floor_of(&mut fx, marked, 3.0);
        let outcome = aggregate(&mut fx);
        assert_eq!(outcome.elements, 1);
        assert!(matches!(
            outcome.issues.as_slice(),
            [FinishError::Metadata(MetadataError::MissingTypeMark { .. })]
        ));
        assert_eq!(report(&fx, ReportField::FloorArea), "П-1: 3.00 м²\n");
    }

    #[test]
    fn ceilings_report_height_and_skirts_length() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let boundary = ExtractBoundary::new(fx.room).execute(&fx.doc).unwrap();
        let stamp = RoomStamp::for_room(&fx.doc, fx.room).unwrap();
        let ceiling = CreateSurface::new(
            boundary.clone(),
            fx.ceiling_type,
            fx.level,
            3000.0,
            stamp.clone(),
        );
        let skirts = CreateStrips::new(boundary, fx.skirt_type, fx.level, 80.0, 0.0, stamp)
            .with_tag(StripTag::Skirt);
        run_in_transaction(&mut fx.doc, "generate", |txn| {
            ceiling.execute(txn)?;
            skirts.execute(txn)
        })
        .unwrap();

        aggregate(&mut fx);
        assert_eq!(report(&fx, ReportField::CeilingHeight), "ПТ-1: 3.00 м\n");
        // Offsetting moves each side inward without trimming it: 36 ft.
        assert_eq!(report(&fx, ReportField::SkirtLength), "ПЛ-1: 10.97 м\n");
        assert_eq!(report(&fx, ReportField::WallArea), "");
    }

    #[test]
    fn other_rooms_are_ignored() {
        let mut fx = RoomFixture::rectangle(10.0, 8.0);
        let ty = fx.floor_type;
        floor_of(&mut fx, ty, 2.0);
        let number = fx.doc.room(fx.room).unwrap().number.clone();
        fx.doc.room_mut(fx.room).unwrap().number = format!("{number}А");
        let outcome = aggregate(&mut fx);
        assert_eq!(outcome.marks, 0);
        assert_eq!(report(&fx, ReportField::FloorArea), "");
    }
}
