use crate::config::CatalogPrefixes;
use crate::document::{Document, TypeId, TypeKind};

/// A type offered for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: TypeId,
    pub name: String,
}

/// The finish types of a document, filtered by naming convention and
/// ordered by name.
///
/// Floors and ceilings carry the organisation prefix; walls and skirts
/// additionally carry the partition sub-prefix. An empty list is valid.
#[derive(Debug, Clone, Default)]
pub struct ElementTypeCatalog {
    floors: Vec<CatalogEntry>,
    ceilings: Vec<CatalogEntry>,
    walls: Vec<CatalogEntry>,
}

impl ElementTypeCatalog {
    #[must_use]
    pub fn from_document(doc: &Document, prefixes: &CatalogPrefixes) -> Self {
        let partition = prefixes.partition_prefix();
        let collect = |kind: TypeKind, prefix: &str| {
            let mut entries: Vec<_> = doc
                .types()
                .filter(|(_, t)| t.kind == kind && t.name.starts_with(prefix))
                .map(|(id, t)| CatalogEntry {
                    id,
                    name: t.name.clone(),
                })
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            entries
        };
        Self {
            floors: collect(TypeKind::Floor, &prefixes.organization),
            ceilings: collect(TypeKind::Ceiling, &prefixes.organization),
            walls: collect(TypeKind::Wall, &partition),
        }
    }

    #[must_use]
    pub fn floors(&self) -> &[CatalogEntry] {
        &self.floors
    }

    #[must_use]
    pub fn ceilings(&self) -> &[CatalogEntry] {
        &self.ceilings
    }

    /// Types usable for both wall finishes and skirts.
    #[must_use]
    pub fn walls(&self) -> &[CatalogEntry] {
        &self.walls
    }

    /// Looks up an entry by exact name in the list for `kind`.
    #[must_use]
    pub fn find(&self, kind: TypeKind, name: &str) -> Option<TypeId> {
        let list = match kind {
            TypeKind::Floor => &self.floors,
            TypeKind::Ceiling => &self.ceilings,
            TypeKind::Wall => &self.walls,
            TypeKind::Door => return None,
        };
        list.iter().find(|e| e.name == name).map(|e| e.id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floors.is_empty() && self.ceilings.is_empty() && self.walls.is_empty()
    }
}
