mod strips;
mod surface;

pub use strips::{CreateStrips, StripsOutcome};
pub use surface::CreateSurface;

use crate::document::{Document, ElementMetadata, MetadataField, RoomId};
use crate::error::Result;

/// Room metadata stamped onto every element generated for a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomStamp {
    pub name: String,
    pub number: String,
    pub level_code: String,
}

impl RoomStamp {
    /// Reads the stamp values of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the room or its level is not found.
    pub fn for_room(doc: &Document, room: RoomId) -> Result<Self> {
        let room = doc.room(room)?;
        let level = doc.level(room.level)?;
        Ok(Self {
            name: room.name.clone(),
            number: room.number.clone(),
            level_code: level.code().to_owned(),
        })
    }

    pub(crate) fn metadata(&self) -> ElementMetadata {
        let mut metadata = ElementMetadata::default();
        metadata.set(MetadataField::RoomName, self.name.as_str());
        metadata.set(MetadataField::RoomNumber, self.number.as_str());
        metadata.set(MetadataField::LevelCode, self.level_code.as_str());
        metadata
    }
}
