use std::collections::BTreeMap;

use crate::geometry::{Boundary, BoundaryCurve, Curve, LineSegment};
use crate::math::Aabb;

use super::element_type::TypeId;
use super::host::DoorId;
use super::level::LevelId;
use super::params::MetadataField;

slotmap::new_key_type! {
    /// Unique identifier for an element created by the pipeline.
    pub struct ElementId;
}

slotmap::new_key_type! {
    /// Unique identifier for a threshold marker.
    pub struct MarkerId;
}

/// Planar element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Floor,
    Ceiling,
}

/// Role of a vertical strip in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripTag {
    Wall,
    Column,
    Skirt,
}

impl StripTag {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Column => "column",
            Self::Skirt => "skirt",
        }
    }
}

/// String metadata stamped onto a generated element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementMetadata {
    values: BTreeMap<MetadataField, String>,
}

impl ElementMetadata {
    #[must_use]
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: MetadataField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// A floor or ceiling bounded by a room outline.
#[derive(Debug, Clone)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub type_id: TypeId,
    pub level: LevelId,
    /// Offset of the top face above the level, in internal units.
    pub height_offset: f64,
    /// Outline at the element's absolute elevation.
    pub boundary: Boundary,
    pub metadata: ElementMetadata,
}

/// A vertical element following one boundary curve.
#[derive(Debug, Clone)]
pub struct Strip {
    pub tag: StripTag,
    pub type_id: TypeId,
    pub level: LevelId,
    /// Location line at the level elevation.
    pub curve: BoundaryCurve,
    /// Unconnected height in internal units.
    pub height: f64,
    /// Offset of the base above the level, in internal units.
    pub base_offset: f64,
    pub metadata: ElementMetadata,
}

impl Strip {
    /// Curve length in internal units.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.curve.length()
    }

    /// Face area in square internal units.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.length() * self.height
    }

    /// Bounding volume of the strip body for a given thickness.
    #[must_use]
    pub fn bounding_box(&self, thickness: f64) -> Aabb {
        let base = self.curve.elevation() + self.base_offset;
        self.curve
            .bounding_box()
            .padded(thickness / 2.0)
            .with_z_range(base, base + self.height)
    }
}

/// An element created by the pipeline.
#[derive(Debug, Clone)]
pub enum GeneratedElement {
    Surface(Surface),
    Strip(Strip),
}

impl GeneratedElement {
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        match self {
            Self::Surface(s) => s.type_id,
            Self::Strip(s) => s.type_id,
        }
    }

    #[must_use]
    pub fn level(&self) -> LevelId {
        match self {
            Self::Surface(s) => s.level,
            Self::Strip(s) => s.level,
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &ElementMetadata {
        match self {
            Self::Surface(s) => &s.metadata,
            Self::Strip(s) => &s.metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut ElementMetadata {
        match self {
            Self::Surface(s) => &mut s.metadata,
            Self::Strip(s) => &mut s.metadata,
        }
    }

    /// The room number this element was generated for.
    #[must_use]
    pub fn room_number(&self) -> Option<&str> {
        self.metadata().get(MetadataField::RoomNumber)
    }

    #[must_use]
    pub fn as_surface(&self) -> Option<&Surface> {
        match self {
            Self::Surface(s) => Some(s),
            Self::Strip(_) => None,
        }
    }

    #[must_use]
    pub fn as_strip(&self) -> Option<&Strip> {
        match self {
            Self::Strip(s) => Some(s),
            Self::Surface(_) => None,
        }
    }

    pub fn as_strip_mut(&mut self) -> Option<&mut Strip> {
        match self {
            Self::Strip(s) => Some(s),
            Self::Surface(_) => None,
        }
    }
}

/// A line drawn across a door threshold on a floor that was not reclipped.
#[derive(Debug, Clone)]
pub struct ThresholdMarker {
    pub floor: ElementId,
    pub door: DoorId,
    pub line: LineSegment,
}
