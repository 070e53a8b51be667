//! Shared document fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use crate::document::{
    DoorData, DoorId, Document, ElementTypeData, HostRef, HostWallData, HostWallId, LevelData,
    LevelId, ParameterBindings, RoomData, RoomId, TypeId, TypeKind,
};
use crate::geometry::{BoundaryCurve, BoundarySegment};
use crate::math::{Point3, Vector3};

pub(crate) const HOST_WALL_WIDTH: f64 = 0.5;

/// A rectangular room `[0, width] x [0, depth]` on level `L_01`, bounded
/// by four host walls (south, east, north, west) and with one type of
/// each finish kind in the library.
pub(crate) struct RoomFixture {
    pub doc: Document,
    pub level: LevelId,
    pub room: RoomId,
    pub walls: [HostWallId; 4],
    pub floor_type: TypeId,
    pub ceiling_type: TypeId,
    pub finish_type: TypeId,
    pub skirt_type: TypeId,
}

impl RoomFixture {
    pub fn rectangle(width: f64, depth: f64) -> Self {
        let mut doc = Document::new();
        *doc.bindings_mut() = ParameterBindings::complete();
        let level = doc.add_level(LevelData::new("L_01", 0.0));
        let host_type = doc.add_type(ElementTypeData::new(
            "АР_О_Основа",
            TypeKind::Wall,
            HOST_WALL_WIDTH,
        ));
        let floor_type = doc.add_type(
            ElementTypeData::new("АР_Пол_Плитка", TypeKind::Floor, 0.2)
                .with_mark("П-1")
                .with_composition("Керамогранит 10 мм"),
        );
        let ceiling_type = doc.add_type(
            ElementTypeData::new("АР_Потолок_ГКЛ", TypeKind::Ceiling, 0.1)
                .with_mark("ПТ-1")
                .with_composition("ГКЛ 12.5 мм"),
        );
        let finish_type = doc.add_type(
            ElementTypeData::new("АР_О_Штукатурка", TypeKind::Wall, 0.1)
                .with_mark("С-1")
                .with_composition("Штукатурка 20 мм"),
        );
        let skirt_type = doc.add_type(
            ElementTypeData::new("АР_О_Плинтус", TypeKind::Wall, 0.05)
                .with_mark("ПЛ-1")
                .with_composition("Плинтус МДФ"),
        );

        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, depth, 0.0),
            Point3::new(0.0, depth, 0.0),
        ];
        let mut walls = Vec::with_capacity(4);
        let mut segments = Vec::with_capacity(4);
        for i in 0..4 {
            let face = BoundaryCurve::line(corners[i], corners[(i + 1) % 4]).unwrap();
            let wall = doc.add_wall(HostWallData {
                type_id: host_type,
                level,
                curve: face.offset(-HOST_WALL_WIDTH / 2.0).unwrap(),
                is_curtain: false,
            });
            walls.push(wall);
            segments.push(BoundarySegment::new(face, Some(HostRef::Wall(wall))));
        }
        let room = doc.add_room(RoomData::new("Кабинет", "101", level).with_finish_loops(vec![segments]));

        Self {
            doc,
            level,
            room,
            walls: [walls[0], walls[1], walls[2], walls[3]],
            floor_type,
            ceiling_type,
            finish_type,
            skirt_type,
        }
    }

    /// Places a door of `width` in the south wall, centred at `x`.
    pub fn add_south_door(&mut self, x: f64, width: f64) -> DoorId {
        let door_type = self
            .doc
            .add_type(ElementTypeData::new(format!("Дверь {width}"), TypeKind::Door, width));
        self.doc.add_door(DoorData {
            type_id: door_type,
            level: self.level,
            position: Point3::new(x, -HOST_WALL_WIDTH / 2.0, 0.0),
            hand_orientation: Vector3::x(),
            host: Some(self.walls[0]),
            height: 7.0,
        })
    }
}
