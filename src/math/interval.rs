use super::TOLERANCE;

/// A closed parameter interval `[lo, hi]` along a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    /// Creates an interval, swapping the bounds if they are given in reverse.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.hi - self.lo
    }

    /// Clips the interval to `[lo, hi]`, returning `None` when nothing of
    /// positive length is left.
    #[must_use]
    pub fn clip(&self, lo: f64, hi: f64) -> Option<Self> {
        let clipped = Self {
            lo: self.lo.max(lo),
            hi: self.hi.min(hi),
        };
        (clipped.length() > TOLERANCE).then_some(clipped)
    }
}

/// Sorts intervals by their start and merges every pair that overlaps or touches.
///
/// The result is ordered by increasing parameter and pairwise disjoint, so a
/// second merge is a no-op.
#[must_use]
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by(|a, b| a.lo.total_cmp(&b.lo));
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if iv.lo <= last.hi + TOLERANCE => last.hi = last.hi.max(iv.hi),
            _ => merged.push(iv),
        }
    }
    merged
}

/// Returns the parts of `[lo, hi]` not covered by the sorted, disjoint `covered` list.
#[must_use]
pub fn complement_within(covered: &[Interval], lo: f64, hi: f64) -> Vec<Interval> {
    let mut gaps = Vec::with_capacity(covered.len() + 1);
    let mut cursor = lo;
    for iv in covered {
        if iv.hi <= cursor {
            continue;
        }
        if iv.lo >= hi {
            break;
        }
        if iv.lo > cursor {
            gaps.push(Interval::new(cursor, iv.lo));
        }
        cursor = cursor.max(iv.hi);
    }
    if hi > cursor {
        gaps.push(Interval::new(cursor, hi));
    }
    gaps
}
