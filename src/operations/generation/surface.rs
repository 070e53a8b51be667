use tracing::debug;

use crate::document::{
    ElementId, GeneratedElement, LevelId, Surface, SurfaceKind, Transaction, TypeId, TypeKind,
};
use crate::error::{DocumentError, Result};
use crate::geometry::Boundary;
use crate::math::units::mm_to_internal;

use super::RoomStamp;

/// Creates one floor or ceiling bounded by a room outline.
///
/// The outer loop becomes the contour and every other loop an opening.
/// The surface kind follows the kind of the chosen type.
pub struct CreateSurface {
    boundary: Boundary,
    type_id: TypeId,
    level: LevelId,
    offset_mm: f64,
    stamp: RoomStamp,
}

impl CreateSurface {
    /// Creates a new `CreateSurface` operation. `offset_mm` is the height
    /// of the top face above the level, in millimetres.
    #[must_use]
    pub fn new(
        boundary: Boundary,
        type_id: TypeId,
        level: LevelId,
        offset_mm: f64,
        stamp: RoomStamp,
    ) -> Self {
        Self {
            boundary,
            type_id,
            level,
            offset_mm,
            stamp,
        }
    }

    /// Executes the operation inside `txn`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateLoop` if any loop has fewer than
    /// three segments or no length, and `DocumentError::WrongTypeKind` if the
    /// type is neither a floor nor a ceiling type.
    pub fn execute(&self, txn: &mut Transaction<'_>) -> Result<ElementId> {
        let ty = txn.element_type(self.type_id)?;
        let kind = match ty.kind {
            TypeKind::Floor => SurfaceKind::Floor,
            TypeKind::Ceiling => SurfaceKind::Ceiling,
            other => {
                return Err(DocumentError::WrongTypeKind {
                    name: ty.name.clone(),
                    expected: "floor or ceiling",
                    actual: other.label(),
                }
                .into())
            }
        };
        for l in self.boundary.loops() {
            l.validate_for_surface()?;
        }

        let height_offset = mm_to_internal(self.offset_mm);
        let elevation = txn.level(self.level)?.elevation + height_offset;
        let boundary = self.boundary.at_elevation(elevation)?;

        let id = txn.insert_element(GeneratedElement::Surface(Surface {
            kind,
            type_id: self.type_id,
            level: self.level,
            height_offset,
            boundary,
            metadata: self.stamp.metadata(),
        }));
        debug!(?id, ?kind, room = %self.stamp.number, "created surface");
        Ok(id)
    }
}
