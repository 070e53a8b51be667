use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::document::{ElementId, MetadataField, Transaction, TypeId};
use crate::error::Result;

/// Stamps every generated element with the rooms its type is used in.
///
/// Room numbers and names are collected per type over all generated
/// elements of the document, deduplicated, sorted and joined with `", "`.
#[derive(Debug, Clone, Default)]
pub struct StampTypeRoomLists;

impl StampTypeRoomLists {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation inside `txn` and returns the number of
    /// elements written.
    ///
    /// # Errors
    ///
    /// Returns an error if an element disappears while it is written.
    pub fn execute(&self, txn: &mut Transaction<'_>) -> Result<usize> {
        let mut rooms: BTreeMap<TypeId, (BTreeSet<String>, BTreeSet<String>)> = BTreeMap::new();
        let mut members: Vec<(ElementId, TypeId)> = Vec::new();
        for (id, element) in txn.elements() {
            let (numbers, names) = rooms.entry(element.type_id()).or_default();
            let metadata = element.metadata();
            if let Some(number) = metadata.get(MetadataField::RoomNumber) {
                numbers.insert(number.to_owned());
            }
            if let Some(name) = metadata.get(MetadataField::RoomName) {
                names.insert(name.to_owned());
            }
            members.push((id, element.type_id()));
        }

        let lists: BTreeMap<TypeId, (String, String)> = rooms
            .into_iter()
            .map(|(ty, (numbers, names))| (ty, (join(&numbers), join(&names))))
            .collect();
        for (id, ty) in &members {
            let Some((numbers, names)) = lists.get(ty) else {
                continue;
            };
            let metadata = txn.element_mut(*id)?.metadata_mut();
            metadata.set(MetadataField::RoomNumbers, numbers.as_str());
            metadata.set(MetadataField::RoomNames, names.as_str());
        }
        debug!(types = lists.len(), elements = members.len(), "type room lists stamped");
        Ok(members.len())
    }
}

fn join(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
