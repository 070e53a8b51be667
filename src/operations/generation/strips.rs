use tracing::{debug, warn};

use crate::document::{
    Document, ElementId, GeneratedElement, HostRef, LevelId, Strip, StripTag, Transaction, TypeId,
    TypeKind,
};
use crate::error::{DocumentError, FinishError, OperationError, Result};
use crate::geometry::{Boundary, BoundarySegment};
use crate::math::units::mm_to_internal;

use super::RoomStamp;

/// Result of a strip generation pass over one boundary.
#[derive(Debug, Default)]
pub struct StripsOutcome {
    pub created: Vec<ElementId>,
    /// Segments left out on purpose: curtain walls, separation lines and
    /// hosts of other types.
    pub filtered: usize,
    /// Segments that could not be built, with the reason.
    pub failures: Vec<FinishError>,
}

/// Creates one vertical finish element per boundary segment.
///
/// Each curve is moved into the room by half the finish thickness. Loops
/// run with the room on their left, so the offset is always to the left.
pub struct CreateStrips {
    boundary: Boundary,
    type_id: TypeId,
    level: LevelId,
    height_mm: f64,
    base_offset_mm: f64,
    tag: StripTag,
    partition_prefix: String,
    stamp: RoomStamp,
}

impl CreateStrips {
    /// Creates a new `CreateStrips` operation. Heights are in millimetres.
    #[must_use]
    pub fn new(
        boundary: Boundary,
        type_id: TypeId,
        level: LevelId,
        height_mm: f64,
        base_offset_mm: f64,
        stamp: RoomStamp,
    ) -> Self {
        Self {
            boundary,
            type_id,
            level,
            height_mm,
            base_offset_mm,
            tag: StripTag::Wall,
            partition_prefix: "АР_О".into(),
            stamp,
        }
    }

    /// Sets the tag given to created strips.
    #[must_use]
    pub fn with_tag(mut self, tag: StripTag) -> Self {
        self.tag = tag;
        self
    }

    /// Sets the type-name prefix a bounding wall must carry for its
    /// segments to receive finishes.
    #[must_use]
    pub fn with_partition_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.partition_prefix = prefix.into();
        self
    }

    /// Executes the operation inside `txn`.
    ///
    /// Problems with single segments are collected in the outcome and do not
    /// stop the pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is not a wall type, the level is
    /// missing, or the height is not positive.
    pub fn execute(&self, txn: &mut Transaction<'_>) -> Result<StripsOutcome> {
        let ty = txn.element_type(self.type_id)?;
        if ty.kind != TypeKind::Wall {
            return Err(DocumentError::WrongTypeKind {
                name: ty.name.clone(),
                expected: TypeKind::Wall.label(),
                actual: ty.kind.label(),
            }
            .into());
        }
        let half_width = ty.width / 2.0;
        if self.height_mm <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "{} height must be positive, got {} mm",
                self.tag.label(),
                self.height_mm
            ))
            .into());
        }
        let elevation = txn.level(self.level)?.elevation;
        let height = mm_to_internal(self.height_mm);
        let base_offset = mm_to_internal(self.base_offset_mm);

        let mut outcome = StripsOutcome::default();
        for (index, segment) in self.boundary.segments().enumerate() {
            match self.accepts(txn, segment) {
                Ok(true) => {}
                Ok(false) => {
                    outcome.filtered += 1;
                    continue;
                }
                Err(e) => {
                    warn!(room = %self.stamp.number, index, error = %e, "skipping segment");
                    outcome.failures.push(e);
                    continue;
                }
            }
            let curve = match segment
                .curve
                .offset(half_width)
                .and_then(|c| c.at_elevation(elevation))
            {
                Ok(c) => c,
                Err(e) => {
                    warn!(room = %self.stamp.number, index, error = %e, "skipping segment");
                    outcome.failures.push(e);
                    continue;
                }
            };
            let id = txn.insert_element(GeneratedElement::Strip(Strip {
                tag: self.tag,
                type_id: self.type_id,
                level: self.level,
                curve,
                height,
                base_offset,
                metadata: self.stamp.metadata(),
            }));
            if let Some(HostRef::Wall(wall)) = segment.host {
                txn.join_geometry(id, wall);
            }
            debug!(?id, index, tag = self.tag.label(), "created strip");
            outcome.created.push(id);
        }
        Ok(outcome)
    }

    /// Whether a segment receives a finish, judged by what bounds it.
    fn accepts(&self, doc: &Document, segment: &BoundarySegment) -> Result<bool> {
        match segment.host {
            Some(HostRef::Wall(id)) => {
                let wall = doc.wall(id)?;
                if wall.is_curtain {
                    return Ok(false);
                }
                let name = &doc.element_type(wall.type_id)?.name;
                Ok(name.starts_with(&self.partition_prefix))
            }
            Some(HostRef::SeparationLine(id)) => doc.separation_line(id).map(|_| false),
            Some(HostRef::Column(_)) | None => Ok(true),
        }
    }
}
