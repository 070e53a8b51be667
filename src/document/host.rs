use crate::geometry::BoundaryCurve;
use crate::math::{Aabb, Point3, Vector3};

use super::element_type::TypeId;
use super::level::LevelId;

slotmap::new_key_type! {
    /// Unique identifier for a host (architectural) wall.
    pub struct HostWallId;
}

slotmap::new_key_type! {
    /// Unique identifier for a room-separation line.
    pub struct SeparationLineId;
}

slotmap::new_key_type! {
    /// Unique identifier for a structural column.
    pub struct ColumnId;
}

slotmap::new_key_type! {
    /// Unique identifier for a door instance.
    pub struct DoorId;
}

/// Back-reference from a boundary segment to the element that bounds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostRef {
    Wall(HostWallId),
    SeparationLine(SeparationLineId),
    Column(ColumnId),
}

/// An existing wall of the building that rooms are bounded by.
#[derive(Debug, Clone)]
pub struct HostWallData {
    pub type_id: TypeId,
    pub level: LevelId,
    /// Location line of the wall.
    pub curve: BoundaryCurve,
    /// Curtain walls carry a curtain grid and never receive finishes.
    pub is_curtain: bool,
}

/// A non-physical line that splits rooms.
#[derive(Debug, Clone)]
pub struct SeparationLineData {
    pub curve: BoundaryCurve,
}

/// A structural column, described by its bounding volume.
#[derive(Debug, Clone)]
pub struct ColumnData {
    pub bounding_box: Aabb,
}

/// A door instance.
#[derive(Debug, Clone)]
pub struct DoorData {
    pub type_id: TypeId,
    pub level: LevelId,
    /// Insertion point at the middle of the opening.
    pub position: Point3,
    /// Direction from the left jamb to the right jamb.
    pub hand_orientation: Vector3,
    pub host: Option<HostWallId>,
    /// Opening height in internal units.
    pub height: f64,
}

/// Resolved door geometry: what the opening tests work with.
#[derive(Debug, Clone, Copy)]
pub struct DoorGeometry {
    pub center: Point3,
    /// Unit vector along the opening width.
    pub hand: Vector3,
    pub width: f64,
    /// Thickness of the host wall, zero for free-standing doors.
    pub depth: f64,
    pub sill: f64,
    pub head: f64,
}

impl DoorGeometry {
    /// Left jamb point: centre minus half the width along the hand direction.
    #[must_use]
    pub fn left_edge(&self) -> Point3 {
        self.center - self.hand * (self.width / 2.0)
    }

    /// Right jamb point: centre plus half the width along the hand direction.
    #[must_use]
    pub fn right_edge(&self) -> Point3 {
        self.center + self.hand * (self.width / 2.0)
    }

    /// Unit vector across the opening, perpendicular to the hand direction.
    #[must_use]
    pub fn facing(&self) -> Vector3 {
        Vector3::new(-self.hand.y, self.hand.x, 0.0)
    }

    /// Bounding volume of the door leaf and frame within its host wall.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let across = self.facing() * (self.depth / 2.0);
        let corners = [
            self.left_edge() + across,
            self.left_edge() - across,
            self.right_edge() + across,
            self.right_edge() - across,
        ];
        let mut bb = Aabb::new(corners[0], corners[1]);
        for c in &corners[2..] {
            bb.include(c);
        }
        bb.with_z_range(self.sill, self.head)
    }
}
