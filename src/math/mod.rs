pub mod aabb;
pub mod distance_2d;
pub mod interval;
pub mod polygon_2d;
pub mod units;

/// 3D point type. Plan geometry lives in the XY plane at a level elevation.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// Shortest curve the host accepts, in internal units (1/32 inch).
pub const SHORT_CURVE_TOLERANCE: f64 = 1.0 / 384.0;

pub use aabb::Aabb;
