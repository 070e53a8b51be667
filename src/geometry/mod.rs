pub mod boundary;
pub mod curve;

pub use boundary::{Boundary, BoundaryLoop, BoundarySegment};
pub use curve::{Arc, BoundaryCurve, Curve, CurveDomain, CurveProjection, LineSegment};
