slotmap::new_key_type! {
    /// Unique identifier for an element type in the document.
    pub struct TypeId;
}

/// The category of elements a type can be instantiated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Floor,
    Ceiling,
    Wall,
    Door,
}

impl TypeKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
            Self::Wall => "wall",
            Self::Door => "door",
        }
    }
}

/// Data associated with an element type.
///
/// `type_mark` and `composition` only feed report text; they never affect
/// geometry.
#[derive(Debug, Clone)]
pub struct ElementTypeData {
    pub name: String,
    pub kind: TypeKind,
    /// Thickness for floors, ceilings and walls; opening width for doors.
    pub width: f64,
    pub type_mark: Option<String>,
    pub composition: Option<String>,
}

impl ElementTypeData {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind, width: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            width,
            type_mark: None,
            composition: None,
        }
    }

    #[must_use]
    pub fn with_mark(mut self, mark: impl Into<String>) -> Self {
        self.type_mark = Some(mark.into());
        self
    }

    #[must_use]
    pub fn with_composition(mut self, composition: impl Into<String>) -> Self {
        self.composition = Some(composition.into());
        self
    }

    /// The type mark, treating an empty string as absent.
    #[must_use]
    pub fn mark(&self) -> Option<&str> {
        self.type_mark.as_deref().filter(|m| !m.is_empty())
    }
}
