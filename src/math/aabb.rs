use super::{Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: &Point3) {
        self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut bb = *self;
        bb.include(&other.min);
        bb.include(&other.max);
        bb
    }

    /// Returns the box grown by `pad` on both sides of each axis.
    #[must_use]
    pub fn expanded(&self, pad: Vector3) -> Self {
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Returns the box grown by `pad` on every side.
    #[must_use]
    pub fn padded(&self, pad: f64) -> Self {
        self.expanded(Vector3::new(pad, pad, pad))
    }

    /// Returns the box with its Z extent replaced by `[z0, z1]`.
    #[must_use]
    pub fn with_z_range(&self, z0: f64, z1: f64) -> Self {
        Self {
            min: Point3::new(self.min.x, self.min.y, z0.min(z1)),
            max: Point3::new(self.max.x, self.max.y, z0.max(z1)),
        }
    }

    /// Closed interval overlap on all three axes. Touching boxes overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn touching_boxes_overlap() {
        let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let b = Aabb::new(p(1.0, 0.0, 0.0), p(2.0, 1.0, 1.0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn separated_on_one_axis_does_not_overlap() {
        let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let b = Aabb::new(p(0.0, 0.0, 1.5), p(1.0, 1.0, 2.0));
        assert!(!a.overlaps(&b));
        assert!(a.expanded(Vector3::new(0.0, 0.0, 0.5)).overlaps(&b));
    }

    #[test]
    fn padding_only_grows() {
        let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let big = a.padded(0.25);
        assert_eq!(big.min, p(-0.25, -0.25, -0.25));
        assert_eq!(a.union(&big), big);
    }
}
