slotmap::new_key_type! {
    /// Unique identifier for a level in the document.
    pub struct LevelId;
}

/// A named horizontal datum that rooms and elements are placed on.
#[derive(Debug, Clone)]
pub struct LevelData {
    /// Level name, conventionally `<prefix>_<code>`.
    pub name: String,
    /// Elevation in internal units.
    pub elevation: f64,
}

impl LevelData {
    #[must_use]
    pub fn new(name: impl Into<String>, elevation: f64) -> Self {
        Self {
            name: name.into(),
            elevation,
        }
    }

    /// The level code stamped onto generated elements: the part of the name
    /// after the first `_`, or the whole name when there is none.
    #[must_use]
    pub fn code(&self) -> &str {
        self.name
            .split_once('_')
            .map_or(self.name.as_str(), |(_, code)| code)
    }
}
