mod bounding_box;
mod extract_boundary;

pub use bounding_box::ElementBoundingBox;
pub use extract_boundary::ExtractBoundary;
