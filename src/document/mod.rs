pub mod element;
pub mod element_type;
pub mod host;
pub mod level;
pub mod params;
pub mod room;
pub mod transaction;

pub use element::{
    ElementId, ElementMetadata, GeneratedElement, MarkerId, StripTag, Strip, Surface, SurfaceKind,
    ThresholdMarker,
};
pub use element_type::{ElementTypeData, TypeId, TypeKind};
pub use host::{
    ColumnData, ColumnId, DoorData, DoorGeometry, DoorId, HostRef, HostWallData, HostWallId,
    SeparationLineData, SeparationLineId,
};
pub use level::{LevelData, LevelId};
pub use params::{Category, MetadataField, ParameterBindings, ParameterSchema, ReportField};
pub use room::{RoomData, RoomId};
pub use transaction::{run_in_transaction, Transaction};

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{DocumentError, GeometryError, Result};
use crate::math::{Vector3, SHORT_CURVE_TOLERANCE, TOLERANCE};

/// In-memory model of the host document.
///
/// Host entities (levels, types, walls, doors, rooms) are placed by the
/// caller; generated elements and markers are only created through a
/// [`Transaction`].
#[derive(Debug, Clone, Default)]
pub struct Document {
    levels: SlotMap<LevelId, LevelData>,
    types: SlotMap<TypeId, ElementTypeData>,
    walls: SlotMap<HostWallId, HostWallData>,
    separation_lines: SlotMap<SeparationLineId, SeparationLineData>,
    columns: SlotMap<ColumnId, ColumnData>,
    doors: SlotMap<DoorId, DoorData>,
    rooms: SlotMap<RoomId, RoomData>,
    elements: SlotMap<ElementId, GeneratedElement>,
    markers: SlotMap<MarkerId, ThresholdMarker>,
    joins: Vec<(ElementId, HostWallId)>,
    bindings: ParameterBindings,
    read_only: bool,
}

impl Document {
    /// Creates a new, empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    #[must_use]
    pub fn bindings(&self) -> &ParameterBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut ParameterBindings {
        &mut self.bindings
    }

    // --- Levels ---

    /// Inserts a level and returns its ID.
    pub fn add_level(&mut self, data: LevelData) -> LevelId {
        self.levels.insert(data)
    }

    /// Returns the level data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn level(&self, id: LevelId) -> Result<&LevelData> {
        self.levels
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound("level".into()).into())
    }

    // --- Element types ---

    /// Inserts an element type and returns its ID.
    pub fn add_type(&mut self, data: ElementTypeData) -> TypeId {
        self.types.insert(data)
    }

    /// Returns the element type data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn element_type(&self, id: TypeId) -> Result<&ElementTypeData> {
        self.types
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound("element type".into()).into())
    }

    /// All element types in the document's type library.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &ElementTypeData)> {
        self.types.iter()
    }

    // --- Host walls, separation lines, columns ---

    /// Inserts a host wall and returns its ID.
    pub fn add_wall(&mut self, data: HostWallData) -> HostWallId {
        self.walls.insert(data)
    }

    /// Returns the host wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn wall(&self, id: HostWallId) -> Result<&HostWallData> {
        self.walls
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound("host wall".into()).into())
    }

    /// Inserts a room-separation line and returns its ID.
    pub fn add_separation_line(&mut self, data: SeparationLineData) -> SeparationLineId {
        self.separation_lines.insert(data)
    }

    /// Returns the separation line data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn separation_line(&self, id: SeparationLineId) -> Result<&SeparationLineData> {
        self.separation_lines
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound("separation line".into()).into())
    }

    /// Inserts a structural column and returns its ID.
    pub fn add_column(&mut self, data: ColumnData) -> ColumnId {
        self.columns.insert(data)
    }

    /// Returns the column data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn column(&self, id: ColumnId) -> Result<&ColumnData> {
        self.columns
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound("column".into()).into())
    }

    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &ColumnData)> {
        self.columns.iter()
    }

    // --- Doors ---

    /// Inserts a door and returns its ID.
    pub fn add_door(&mut self, data: DoorData) -> DoorId {
        self.doors.insert(data)
    }

    /// Returns the door data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn door(&self, id: DoorId) -> Result<&DoorData> {
        self.doors
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound("door".into()).into())
    }

    pub fn doors(&self) -> impl Iterator<Item = (DoorId, &DoorData)> {
        self.doors.iter()
    }

    /// Resolves a door's width from its type and its depth from its host
    /// wall's type.
    ///
    /// # Errors
    ///
    /// Returns an error if the door, its type or its host is missing, or
    /// if its hand orientation has no plan component.
    pub fn door_geometry(&self, id: DoorId) -> Result<DoorGeometry> {
        let door = self.door(id)?;
        let width = self.element_type(door.type_id)?.width;
        let depth = match door.host {
            Some(wall) => self.element_type(self.wall(wall)?.type_id)?.width,
            None => 0.0,
        };
        let plan = Vector3::new(door.hand_orientation.x, door.hand_orientation.y, 0.0);
        let hand = plan.try_normalize(TOLERANCE).ok_or(GeometryError::ZeroVector)?;
        Ok(DoorGeometry {
            center: door.position,
            hand,
            width,
            depth,
            sill: door.position.z,
            head: door.position.z + door.height,
        })
    }

    // --- Rooms ---

    /// Inserts a room and returns its ID.
    pub fn add_room(&mut self, data: RoomData) -> RoomId {
        self.rooms.insert(data)
    }

    /// Returns the room data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn room(&self, id: RoomId) -> Result<&RoomData> {
        self.rooms
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound("room".into()).into())
    }

    pub(crate) fn room_mut(&mut self, id: RoomId) -> Result<&mut RoomData> {
        self.rooms
            .get_mut(id)
            .ok_or_else(|| DocumentError::EntityNotFound("room".into()).into())
    }

    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &RoomData)> {
        self.rooms.iter()
    }

    // --- Generated elements ---

    /// Returns the generated element, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn element(&self, id: ElementId) -> Result<&GeneratedElement> {
        self.elements
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound("element".into()).into())
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &GeneratedElement)> {
        self.elements.iter()
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn insert_element(&mut self, element: GeneratedElement) -> ElementId {
        self.elements.insert(element)
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Result<&mut GeneratedElement> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| DocumentError::EntityNotFound("element".into()).into())
    }

    /// Deletes an element together with its joins and threshold markers.
    pub(crate) fn remove_element(&mut self, id: ElementId) -> Result<GeneratedElement> {
        let removed = self
            .elements
            .remove(id)
            .ok_or_else(|| DocumentError::EntityNotFound("element".into()))?;
        self.joins.retain(|(e, _)| *e != id);
        self.markers.retain(|_, m| m.floor != id);
        Ok(removed)
    }

    // --- Markers and joins ---

    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &ThresholdMarker)> {
        self.markers.iter()
    }

    pub(crate) fn insert_marker(&mut self, marker: ThresholdMarker) -> MarkerId {
        self.markers.insert(marker)
    }

    /// Joins a generated element to a host wall.
    pub(crate) fn join_geometry(&mut self, element: ElementId, wall: HostWallId) {
        if !self.joins.contains(&(element, wall)) {
            debug!(?element, ?wall, "joined geometry");
            self.joins.push((element, wall));
        }
    }

    /// Host walls a generated element is joined to.
    #[must_use]
    pub fn joins_of(&self, element: ElementId) -> Vec<HostWallId> {
        self.joins
            .iter()
            .filter(|(e, _)| *e == element)
            .map(|(_, w)| *w)
            .collect()
    }

    /// Checks that every generated element references live types and
    /// levels and that every surface lies in a single plane.
    ///
    /// # Errors
    ///
    /// Returns a description of the first dangling reference or
    /// non-planar surface found.
    pub(crate) fn validate_references(&self) -> std::result::Result<(), String> {
        for (id, element) in &self.elements {
            if !self.types.contains_key(element.type_id()) {
                return Err(format!("element {id:?} references a deleted type"));
            }
            if !self.levels.contains_key(element.level()) {
                return Err(format!("element {id:?} references a deleted level"));
            }
            if let GeneratedElement::Surface(surface) = element {
                let z = surface.boundary.outer().elevation();
                let off_plane = surface.boundary.segments().any(|s| {
                    (s.curve.start().z - z).abs() > SHORT_CURVE_TOLERANCE
                        || (s.curve.end().z - z).abs() > SHORT_CURVE_TOLERANCE
                });
                if off_plane {
                    return Err(format!("surface {id:?} is not planar"));
                }
            }
        }
        for (element, wall) in &self.joins {
            if !self.elements.contains_key(*element) || !self.walls.contains_key(*wall) {
                return Err("join references a deleted element".into());
            }
        }
        for (id, marker) in &self.markers {
            if !self.elements.contains_key(marker.floor) || !self.doors.contains_key(marker.door) {
                return Err(format!("marker {id:?} references a deleted element"));
            }
        }
        Ok(())
    }
}
