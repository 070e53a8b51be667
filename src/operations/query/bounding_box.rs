use crate::document::{Document, ElementId, GeneratedElement};
use crate::error::Result;
use crate::math::Aabb;

/// Computes the axis-aligned bounding volume of a generated element.
///
/// Surfaces extend downward from their top face by the type thickness.
/// Strips extend sideways by half the type thickness and upward over
/// their height.
pub struct ElementBoundingBox {
    element: ElementId,
}

impl ElementBoundingBox {
    /// Creates a new `ElementBoundingBox` query.
    #[must_use]
    pub fn new(element: ElementId) -> Self {
        Self { element }
    }

    /// Executes the query, returning the AABB, or `None` for a surface
    /// with an empty outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the element or its type is not found.
    pub fn execute(&self, doc: &Document) -> Result<Option<Aabb>> {
        let element = doc.element(self.element)?;
        let thickness = doc.element_type(element.type_id())?.width;
        Ok(match element {
            GeneratedElement::Surface(surface) => {
                let top = surface.boundary.outer().elevation();
                surface
                    .boundary
                    .bounding_box()
                    .map(|bb| bb.with_z_range(top - thickness, top))
            }
            GeneratedElement::Strip(strip) => Some(strip.bounding_box(thickness)),
        })
    }
}
