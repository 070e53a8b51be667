//! Conversions between display units and the host's internal length unit (feet).

/// Millimetres in one internal length unit.
pub const MM_PER_FOOT: f64 = 304.8;

/// Metres in one internal length unit.
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Square metres in one internal area unit.
pub const SQUARE_METERS_PER_SQUARE_FOOT: f64 = 0.092_903;

/// Converts millimetres to internal length units.
#[must_use]
pub fn mm_to_internal(mm: f64) -> f64 {
    mm / MM_PER_FOOT
}

/// Converts internal length units to millimetres.
#[must_use]
pub fn internal_to_mm(value: f64) -> f64 {
    value * MM_PER_FOOT
}

/// Converts internal length units to metres.
#[must_use]
pub fn internal_to_meters(value: f64) -> f64 {
    value * METERS_PER_FOOT
}

/// Converts internal area units to square metres.
#[must_use]
pub fn internal_area_to_square_meters(value: f64) -> f64 {
    value * SQUARE_METERS_PER_SQUARE_FOOT
}
