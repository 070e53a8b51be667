use std::collections::BTreeMap;

use crate::geometry::BoundarySegment;

use super::level::LevelId;
use super::params::ReportField;

slotmap::new_key_type! {
    /// Unique identifier for a room.
    pub struct RoomId;
}

/// A room placed by the host. Read-only to the pipeline except for its
/// report parameters.
#[derive(Debug, Clone)]
pub struct RoomData {
    pub name: String,
    /// Room number, unique per level.
    pub number: String,
    pub level: LevelId,
    /// Offset of the room's base above its level, in internal units.
    pub lower_offset: f64,
    /// Boundary loops measured to finish faces, as the host computed them.
    pub finish_loops: Vec<Vec<BoundarySegment>>,
    report: BTreeMap<ReportField, String>,
}

impl RoomData {
    #[must_use]
    pub fn new(name: impl Into<String>, number: impl Into<String>, level: LevelId) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            level,
            lower_offset: 0.0,
            finish_loops: Vec::new(),
            report: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_finish_loops(mut self, loops: Vec<Vec<BoundarySegment>>) -> Self {
        self.finish_loops = loops;
        self
    }

    #[must_use]
    pub fn with_lower_offset(mut self, offset: f64) -> Self {
        self.lower_offset = offset;
        self
    }

    /// Reads a report parameter.
    #[must_use]
    pub fn report(&self, field: ReportField) -> Option<&str> {
        self.report.get(&field).map(String::as_str)
    }

    pub(crate) fn set_report(&mut self, field: ReportField, text: String) {
        self.report.insert(field, text);
    }
}
