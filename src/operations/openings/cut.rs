use tracing::{debug, info, warn};

use crate::document::{DoorId, ElementId, GeneratedElement, Strip, Transaction};
use crate::error::{OperationError, Result};
use crate::geometry::Curve;
use crate::math::interval::{complement_within, merge_intervals, Interval};
use crate::math::units::mm_to_internal;

use super::door_footprint;

/// What cutting did to a strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutOutcome {
    /// No door actually runs along the strip.
    Untouched,
    /// The strip was replaced by the pieces between openings, in order of
    /// increasing parameter.
    Split { replacements: Vec<ElementId> },
    /// Openings cover the whole strip; it was deleted without replacement.
    FullyAbsorbed,
}

impl CutOutcome {
    #[must_use]
    pub fn replacements(&self) -> &[ElementId] {
        match self {
            Self::Split { replacements } => replacements,
            Self::Untouched | Self::FullyAbsorbed => &[],
        }
    }
}

/// Removes door openings from a vertical strip.
///
/// Door jambs are projected onto the strip curve, overlapping footprints
/// merged, and one replacement strip created for every remaining piece
/// longer than the minimum length. Replacements inherit type, level,
/// height, tag, metadata and joins; the original is deleted.
pub struct CutAtOpenings {
    element: ElementId,
    doors: Vec<DoorId>,
    min_length_mm: f64,
    clearance_mm: f64,
}

impl CutAtOpenings {
    /// Creates a new `CutAtOpenings` operation with a 30 mm minimum piece
    /// and a 200 mm clearance.
    #[must_use]
    pub fn new(element: ElementId, doors: Vec<DoorId>) -> Self {
        Self {
            element,
            doors,
            min_length_mm: 30.0,
            clearance_mm: 200.0,
        }
    }

    #[must_use]
    pub fn with_min_length(mut self, min_length_mm: f64) -> Self {
        self.min_length_mm = min_length_mm;
        self
    }

    /// Sets how far, beyond the host wall and the strip itself, a door
    /// centre may be from the strip and still cut it.
    #[must_use]
    pub fn with_clearance(mut self, clearance_mm: f64) -> Self {
        self.clearance_mm = clearance_mm;
        self
    }

    /// Executes the operation inside `txn`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the element is not a strip,
    /// or an error if a replacement curve cannot be built.
    pub fn execute(&self, txn: &mut Transaction<'_>) -> Result<CutOutcome> {
        let strip = txn
            .element(self.element)?
            .as_strip()
            .cloned()
            .ok_or_else(|| {
                OperationError::InvalidInput("only strips can be cut at openings".into())
            })?;
        let thickness = txn.element_type(strip.type_id)?.width;
        let length = strip.curve.length();

        let openings = self.openings(txn, &strip, thickness);
        if openings.is_empty() {
            debug!(element = ?self.element, "no door runs along the strip");
            return Ok(CutOutcome::Untouched);
        }

        let min_length = mm_to_internal(self.min_length_mm);
        let pieces: Vec<Interval> = complement_within(&openings, 0.0, length)
            .into_iter()
            .filter(|piece| piece.length() > min_length)
            .collect();

        let curves = pieces
            .iter()
            .map(|piece| strip.curve.sub_curve(piece.lo, piece.hi))
            .collect::<Result<Vec<_>>>()?;
        let joins = txn.joins_of(self.element);
        let mut replacements = Vec::with_capacity(curves.len());
        for curve in curves {
            let id = txn.insert_element(GeneratedElement::Strip(Strip {
                curve,
                ..strip.clone()
            }));
            for wall in &joins {
                txn.join_geometry(id, *wall);
            }
            replacements.push(id);
        }
        txn.remove_element(self.element)?;

        if replacements.is_empty() {
            info!(element = ?self.element, "strip fully absorbed by openings");
            Ok(CutOutcome::FullyAbsorbed)
        } else {
            debug!(
                element = ?self.element,
                pieces = replacements.len(),
                "strip split at openings"
            );
            Ok(CutOutcome::Split { replacements })
        }
    }

    /// Merged door footprints along the strip, in increasing parameter order.
    fn openings(&self, txn: &Transaction<'_>, strip: &Strip, thickness: f64) -> Vec<Interval> {
        let clearance = mm_to_internal(self.clearance_mm);
        let footprints = self
            .doors
            .iter()
            .filter_map(|&door| match txn.door_geometry(door) {
                Ok(g) => {
                    let reach = g.depth / 2.0 + thickness + clearance;
                    door_footprint(&strip.curve, &g, reach)
                }
                Err(e) => {
                    warn!(?door, error = %e, "door skipped");
                    None
                }
            })
            .collect();
        merge_intervals(footprints)
    }
}
